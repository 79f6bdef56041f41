//! The validated contact record and the reasons a raw row can be rejected.
//!
//! A `ContactRecord` can only be obtained through `ContactRecord::new` (or by
//! deserializing, which runs the same checks), so every value in circulation
//! has a non-blank name and a phone that matches the loose phone pattern.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Optional leading `+`, then ASCII digits, whitespace and hyphens.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s-]+$").expect("phone pattern compiles"));

/// Why a raw row could not become a `ContactRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactError {
    #[error("missing required fields")]
    MissingRequiredFields,
    #[error("invalid phone format")]
    InvalidPhoneFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ContactFields")]
pub struct ContactRecord {
    first_name: String,
    phone: String,
    notes: String,
}

impl ContactRecord {
    /// Builds a record from raw cell values.
    ///
    /// The phone pattern is tested against the raw value, before trimming.
    pub fn new(first_name: &str, phone: &str, notes: Option<&str>) -> Result<Self, ContactError> {
        let first_name = first_name.trim();
        if first_name.is_empty() || phone.trim().is_empty() {
            return Err(ContactError::MissingRequiredFields);
        }
        if !PHONE_RE.is_match(phone) {
            return Err(ContactError::InvalidPhoneFormat);
        }

        Ok(Self {
            first_name: first_name.to_string(),
            phone: phone.trim().to_string(),
            notes: notes.map(str::trim).unwrap_or_default().to_string(),
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactFields {
    first_name: String,
    phone: String,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<ContactFields> for ContactRecord {
    type Error = ContactError;

    fn try_from(fields: ContactFields) -> Result<Self, Self::Error> {
        ContactRecord::new(&fields.first_name, &fields.phone, fields.notes.as_deref())
    }
}

/// Diagnostic for one CSV data row that failed validation.
///
/// `row` is 1-based and counts data rows only (the header is not row 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRejection {
    pub row: usize,
    pub reason: ContactError,
    pub message: String,
}

impl RowRejection {
    pub fn new(row: usize, reason: ContactError, phone: Option<&str>) -> Self {
        let message = match (reason, phone) {
            (ContactError::InvalidPhoneFormat, Some(phone)) => {
                format!("Invalid phone number format in row {}: {}", row, phone)
            }
            _ => format!("Row {}: {}", row, reason),
        };
        Self {
            row,
            reason,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_every_field() {
        let record = ContactRecord::new("  Ada ", " +44 20-7946 ", Some("  call after 5 "));
        assert!(record.is_err(), "leading space before '+' breaks the raw pattern");

        let record = ContactRecord::new("  Ada ", "44 20-7946 ", Some("  call after 5 ")).unwrap();
        assert_eq!(record.first_name(), "Ada");
        assert_eq!(record.phone(), "44 20-7946");
        assert_eq!(record.notes(), "call after 5");
    }

    #[test]
    fn missing_notes_become_empty() {
        let record = ContactRecord::new("Ada", "12345", None).unwrap();
        assert_eq!(record.notes(), "");
    }

    #[test]
    fn blank_name_or_phone_is_missing() {
        assert_eq!(
            ContactRecord::new("", "123", None),
            Err(ContactError::MissingRequiredFields)
        );
        assert_eq!(
            ContactRecord::new("   ", "123", None),
            Err(ContactError::MissingRequiredFields)
        );
        assert_eq!(
            ContactRecord::new("Ada", "", None),
            Err(ContactError::MissingRequiredFields)
        );
    }

    #[test]
    fn phone_pattern() {
        assert!(ContactRecord::new("Ada", "12-34 56", None).is_ok());
        assert!(ContactRecord::new("Ada", "+15550100", None).is_ok());
        assert_eq!(
            ContactRecord::new("Ada", "abc123", None),
            Err(ContactError::InvalidPhoneFormat)
        );
        assert_eq!(
            ContactRecord::new("Ada", "12+34", None),
            Err(ContactError::InvalidPhoneFormat)
        );
        assert_eq!(
            ContactRecord::new("Ada", "(555) 0100", None),
            Err(ContactError::InvalidPhoneFormat)
        );
    }

    #[test]
    fn revalidating_a_record_is_stable() {
        let record = ContactRecord::new(" Ada", "+1 555-0100 ", Some(" vip ")).unwrap();
        let again =
            ContactRecord::new(record.first_name(), record.phone(), Some(record.notes())).unwrap();
        assert_eq!(record, again);
    }

    #[test]
    fn deserializing_runs_validation() {
        let ok: ContactRecord =
            serde_json::from_str(r#"{"firstName":" Ada ","phone":"123"}"#).unwrap();
        assert_eq!(ok.first_name(), "Ada");

        let bad = serde_json::from_str::<ContactRecord>(r#"{"firstName":"Ada","phone":"x"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn rejection_messages() {
        let phone = RowRejection::new(3, ContactError::InvalidPhoneFormat, Some("abc123"));
        assert_eq!(phone.message, "Invalid phone number format in row 3: abc123");

        let missing = RowRejection::new(7, ContactError::MissingRequiredFields, None);
        assert_eq!(missing.message, "Row 7: missing required fields");
    }
}
