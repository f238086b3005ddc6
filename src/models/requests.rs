use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to find matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
    /// Skip the cache and recompute from a fresh snapshot
    #[serde(default)]
    pub refresh: bool,
}

/// Request to score a single pair of users
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScorePairRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "candidate_id", rename = "candidateId")]
    pub candidate_id: String,
}

/// Request to create a study group for a skill
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1, max = 100))]
    #[serde(alias = "skill_name", rename = "skillName")]
    pub skill_name: String,
}

/// Request to join or leave a study group
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MembershipRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}
