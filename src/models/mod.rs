// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{SkillProfile, MatchResult, StudyGroup, NewStudyGroup, ScoringWeights};
pub use requests::{FindMatchesRequest, ScorePairRequest, CreateGroupRequest, MembershipRequest};
pub use responses::{FindMatchesResponse, StudyGroupsResponse, GroupSuggestionsResponse, MembershipResponse, HealthResponse, ErrorResponse};
