use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One reviewed day to write back. Dates stay raw so a malformed value
/// fails only its own entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitEntry {
    #[schema(example = "05/03/2026")]
    pub date: String,
    /// Defaults to `date`.
    #[serde(default)]
    #[schema(example = "05/03/2026")]
    pub check_in_date: Option<String>,
    #[serde(default)]
    #[schema(example = "08:00")]
    pub check_in_time: Option<String>,
    /// Defaults to `date`.
    #[serde(default)]
    #[schema(example = "05/03/2026")]
    pub check_out_date: Option<String>,
    #[serde(default)]
    #[schema(example = "17:00")]
    pub check_out_time: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommitRequest {
    pub updates: Vec<CommitEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRequest {
    #[schema(example = json!(["05/03/2026", "06/03/2026"]))]
    pub dates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EntryError {
    #[schema(example = "31/02/2026")]
    pub date: String,
    #[schema(example = "Invalid date: 31/02/2026")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub success: bool,
    #[schema(example = 2)]
    pub updated_count: usize,
    pub errors: Vec<EntryError>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    #[schema(example = 1)]
    pub deleted_count: u64,
    pub errors: Vec<EntryError>,
}
