use crate::model::item::AssignedItem;
use crate::model::user::{UserProfile, UserSummary};
use serde::{Deserialize, Serialize};

/// Summary row written once per successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBatch {
    pub batch_id: String,
    pub file_name: String,
    /// MD5 of the uploaded bytes.
    pub checksum: String,
    pub total_records: usize,
    pub distributed_records: usize,
    pub uploaded_by: UserSummary,
    pub created_at: String,
}

/// What the upload endpoint reports back for a new batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub batch_id: String,
    pub total_records: usize,
    pub distributed_records: usize,
    pub agents_count: usize,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentGroup {
    pub agent: UserProfile,
    pub items: Vec<AssignedItem>,
}

/// Items of one batch, flat and grouped by agent in distribution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetail {
    pub batch_id: String,
    pub items: Vec<AssignedItem>,
    pub grouped_by_agent: Vec<AgentGroup>,
    pub total_items: usize,
}
