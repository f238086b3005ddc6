use crate::models::{SkillProfile, MatchResult, ScoringWeights};
use crate::core::{filters::is_eligible_candidate, scoring::calculate_match_score};

/// Number of matches returned when the caller does not ask for a limit
pub const DEFAULT_MATCH_LIMIT: usize = 20;

/// Result of the matching process
#[derive(Debug)]
pub struct MatchSet {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Match aggregator - scores a population against one subject
///
/// # Pipeline Stages
/// 1. Eligibility filter (not the subject, has at least one skill)
/// 2. Scoring
/// 3. Zero-score removal
/// 4. Stable descending sort and truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    default_limit: usize,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            default_limit: DEFAULT_MATCH_LIMIT,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    /// Override the cap used by [`Matcher::find_default_matches`]
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Score a single candidate against the subject
    pub fn score(&self, subject: &SkillProfile, candidate: &SkillProfile) -> MatchResult {
        calculate_match_score(subject, candidate, &self.weights)
    }

    /// Find matches for a subject within a population snapshot
    ///
    /// # Arguments
    /// * `subject` - The user asking for matches
    /// * `population` - Every known profile, the subject may be among them
    /// * `limit` - Maximum number of matches to return
    ///
    /// # Returns
    /// MatchSet with results sorted by score, highest first. Equal scores
    /// keep their population order.
    pub fn find_matches(
        &self,
        subject: &SkillProfile,
        population: &[SkillProfile],
        limit: usize,
    ) -> MatchSet {
        let total_candidates = population.len();

        let mut matches: Vec<MatchResult> = population
            .iter()
            .filter(|candidate| is_eligible_candidate(candidate, subject))
            .map(|candidate| self.score(subject, candidate))
            .filter(|result| result.match_score > 0)
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        matches.truncate(limit);

        tracing::trace!(
            "Scored {} of {} candidates for {}",
            matches.len(),
            total_candidates,
            subject.id
        );

        MatchSet {
            matches,
            total_candidates,
        }
    }

    /// Find matches capped at the configured default limit
    pub fn find_default_matches(
        &self,
        subject: &SkillProfile,
        population: &[SkillProfile],
    ) -> MatchSet {
        self.find_matches(subject, population, self.default_limit)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Rank a population for a subject with default weights and the default cap
pub fn find_matches(subject: &SkillProfile, population: &[SkillProfile]) -> Vec<MatchResult> {
    Matcher::default()
        .find_default_matches(subject, population)
        .matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn create_candidate(id: &str, teach: &[&str], learn: &[&str]) -> SkillProfile {
        SkillProfile {
            id: id.to_string(),
            name: format!("User {}", id),
            bio: None,
            avatar: None,
            skills_to_teach: skills(teach),
            skills_to_learn: skills(learn),
        }
    }

    fn create_subject() -> SkillProfile {
        create_candidate("current_user", &["Rust", "Go"], &["Python", "SQL"])
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::with_default_weights();
        let subject = create_subject();

        let population = vec![
            create_candidate("1", &["Python"], &["Rust"]), // Complementary
            create_candidate("2", &["Cooking"], &["Knitting"]), // Nothing in common
            create_candidate("3", &[], &[]),               // No skills
            subject.clone(),
        ];

        let result = matcher.find_matches(&subject, &population, 10);

        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].candidate_id(), "1");
        assert_eq!(result.total_candidates, 4);
    }

    #[test]
    fn test_matches_sorted_by_score() {
        let matcher = Matcher::with_default_weights();
        let subject = create_subject();

        let population = vec![
            create_candidate("low", &[], &["Go"]),
            create_candidate("high", &["Python", "SQL"], &["Rust"]),
        ];

        let result = matcher.find_matches(&subject, &population, 10);

        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].candidate_id(), "high");
        assert!(result.matches[0].match_score >= result.matches[1].match_score);
    }

    #[test]
    fn test_ties_keep_population_order() {
        let matcher = Matcher::with_default_weights();
        let subject = create_subject();

        let population = vec![
            create_candidate("a", &["Python"], &[]),
            create_candidate("b", &["SQL"], &[]),
            create_candidate("c", &["Python"], &[]),
        ];

        let result = matcher.find_matches(&subject, &population, 10);
        let ids: Vec<&str> = result.matches.iter().map(|m| m.candidate_id()).collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_respects_limit() {
        let matcher = Matcher::with_default_weights();
        let subject = create_subject();

        let population: Vec<SkillProfile> = (0..30)
            .map(|i| create_candidate(&i.to_string(), &["Python"], &[]))
            .collect();

        let result = matcher.find_matches(&subject, &population, 5);

        assert_eq!(result.matches.len(), 5);
    }

    #[test]
    fn test_default_limit_is_configurable() {
        let matcher = Matcher::with_default_weights().with_default_limit(3);
        let subject = create_subject();

        let population: Vec<SkillProfile> = (0..10)
            .map(|i| create_candidate(&i.to_string(), &["SQL"], &[]))
            .collect();

        assert_eq!(matcher.find_default_matches(&subject, &population).matches.len(), 3);
    }

    #[test]
    fn test_subject_without_skills_gets_nothing() {
        let subject = create_candidate("me", &[], &[]);
        let population = vec![create_candidate("1", &["Python"], &["Rust"])];

        assert!(find_matches(&subject, &population).is_empty());
    }

    #[test]
    fn test_empty_population() {
        let subject = create_subject();
        let result = Matcher::default().find_matches(&subject, &[], 20);

        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 0);
    }
}
