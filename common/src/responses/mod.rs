//! JSON envelopes returned by the API. Field names are camelCase on the wire.

use crate::model::batch::{DistributionBatch, UploadSummary};
use crate::model::contact::RowRejection;
use crate::model::item::AssignedItem;
use crate::model::user::UserProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Field(FieldError),
    Row(RowRejection),
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCreated {
    #[serde(flatten)]
    pub agent: UserProfile,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentList {
    pub agents: Vec<UserProfile>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub distribution: UploadSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<RowRejection>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionList {
    pub distributions: Vec<DistributionBatch>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyItems {
    pub items: Vec<AssignedItem>,
    pub total_items: usize,
}
