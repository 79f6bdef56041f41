//! Row validation: raw CSV rows in, contact records and diagnostics out.

use common::model::contact::{ContactError, ContactRecord, RowRejection};
use std::collections::HashMap;

pub const FIRST_NAME_COLUMN: &str = "FirstName";
pub const PHONE_COLUMN: &str = "Phone";
pub const NOTES_COLUMN: &str = "Notes";

/// One parsed CSV row: column name to cell value.
pub type RawRow = HashMap<String, String>;

#[derive(Debug, Default)]
pub struct ValidatedRows {
    pub records: Vec<ContactRecord>,
    pub rejections: Vec<RowRejection>,
}

fn cell<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    row.get(column).map(String::as_str)
}

pub fn validate_row(row: &RawRow) -> Result<ContactRecord, ContactError> {
    ContactRecord::new(
        cell(row, FIRST_NAME_COLUMN).unwrap_or_default(),
        cell(row, PHONE_COLUMN).unwrap_or_default(),
        cell(row, NOTES_COLUMN),
    )
}

/// Validates every row, keeping input order in both outputs.
pub fn validate_rows<I>(rows: I) -> ValidatedRows
where
    I: IntoIterator<Item = RawRow>,
{
    let mut out = ValidatedRows::default();
    for (idx, row) in rows.into_iter().enumerate() {
        match validate_row(&row) {
            Ok(record) => out.records.push(record),
            Err(reason) => out.rejections.push(RowRejection::new(
                idx + 1,
                reason,
                cell(&row, PHONE_COLUMN),
            )),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn valid_row_is_normalized() {
        let record = validate_row(&row(&[
            ("FirstName", " Grace "),
            ("Phone", "12-34 56"),
            ("Notes", " follow up "),
        ]))
        .unwrap();
        assert_eq!(record.first_name(), "Grace");
        assert_eq!(record.phone(), "12-34 56");
        assert_eq!(record.notes(), "follow up");
    }

    #[test]
    fn missing_columns_are_reported() {
        assert_eq!(
            validate_row(&row(&[("FirstName", "Grace")])),
            Err(ContactError::MissingRequiredFields)
        );
        assert_eq!(
            validate_row(&row(&[("Phone", "123")])),
            Err(ContactError::MissingRequiredFields)
        );
    }

    #[test]
    fn bad_phone_is_reported() {
        assert_eq!(
            validate_row(&row(&[("FirstName", "Grace"), ("Phone", "abc123")])),
            Err(ContactError::InvalidPhoneFormat)
        );
    }

    #[test]
    fn collects_records_and_rejections_in_order() {
        let out = validate_rows(vec![
            row(&[("FirstName", "A"), ("Phone", "1")]),
            row(&[("FirstName", ""), ("Phone", "2")]),
            row(&[("FirstName", "C"), ("Phone", "abc123")]),
            row(&[("FirstName", "D"), ("Phone", "+4")]),
        ]);

        let names: Vec<&str> = out.records.iter().map(|r| r.first_name()).collect();
        assert_eq!(names, vec!["A", "D"]);

        assert_eq!(out.rejections.len(), 2);
        assert_eq!(out.rejections[0].row, 2);
        assert_eq!(out.rejections[0].reason, ContactError::MissingRequiredFields);
        assert_eq!(out.rejections[1].row, 3);
        assert_eq!(out.rejections[1].reason, ContactError::InvalidPhoneFormat);
        assert!(out.rejections[1].message.contains("abc123"));
    }

    #[test]
    fn all_rows_rejected_leaves_no_records() {
        let out = validate_rows(vec![row(&[("Phone", "1")]), row(&[])]);
        assert!(out.records.is_empty());
        assert_eq!(out.rejections.len(), 2);
    }
}
