// Core algorithm exports
pub mod filters;
pub mod groups;
pub mod matcher;
pub mod scoring;

pub use filters::{intersect_skills, is_eligible_candidate, has_substantial_bio};
pub use groups::{build_group, skills_without_groups};
pub use matcher::{Matcher, MatchSet, find_matches, DEFAULT_MATCH_LIMIT};
pub use scoring::{calculate_match_score, score, MAX_MATCH_SCORE};
