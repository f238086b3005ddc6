//! SkillSwap Match - skill-exchange matching service
//!
//! This library provides the matching engine used by SkillSwap: a pure scorer
//! that compares two users' teach/learn skill lists, and an aggregator that
//! ranks a population snapshot for one user. The HTTP service, profile store
//! client and study group storage are built on top of it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchSet, score, find_matches, calculate_match_score};
pub use crate::models::{SkillProfile, MatchResult, ScoringWeights, StudyGroup, FindMatchesRequest, FindMatchesResponse};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let subject = SkillProfile::new("a", "A");
        let result = score(&subject, &subject);
        assert_eq!(result.match_score, 0);
    }
}
