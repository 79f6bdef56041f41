use crate::model::contact::ContactRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle of an assigned contact. Items are always created `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown item status '{0}'")]
pub struct UnknownStatus(pub String);

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ItemStatus::Pending),
            "completed" => Ok(ItemStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A contact handed to one agent as part of a distribution batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedItem {
    pub id: String,
    #[serde(flatten)]
    pub contact: ContactRecord,
    pub agent_id: String,
    pub batch_id: String,
    pub status: ItemStatus,
    pub created_at: String,
}
