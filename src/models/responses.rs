use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchResult, StudyGroup};

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    pub limit: usize,
}

/// Study group listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyGroupsResponse {
    pub groups: Vec<StudyGroup>,
}

/// Skills a user could start a group for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSuggestionsResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub skills: Vec<String>,
}

/// Outcome of a join or leave request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub success: bool,
    #[serde(rename = "groupId")]
    pub group_id: uuid::Uuid,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
