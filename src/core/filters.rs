use crate::models::SkillProfile;

/// Keep every entry of `source` that also appears somewhere in `other`
///
/// Scan semantics: each position of `source` is tested on its own, so a
/// skill listed twice in `source` is kept twice. Order follows `source`.
/// Inputs must not be deduplicated first, duplicates change the score.
#[inline]
pub fn intersect_skills(source: &[String], other: &[String]) -> Vec<String> {
    source
        .iter()
        .filter(|skill| other.contains(skill))
        .cloned()
        .collect()
}

/// Check if a profile may appear in the subject's match list
///
/// The subject never matches itself, and users with no skills at all are
/// never surfaced.
#[inline]
pub fn is_eligible_candidate(candidate: &SkillProfile, subject: &SkillProfile) -> bool {
    candidate.id != subject.id && candidate.has_skills()
}

/// Check if a bio is long enough to earn the bonus
///
/// Length is measured in UTF-16 code units, the way the client apps count
/// it: characters outside the Basic Multilingual Plane (most emoji) count
/// twice.
#[inline]
pub fn has_substantial_bio(profile: &SkillProfile, min_chars: usize) -> bool {
    profile
        .bio
        .as_deref()
        .map(|bio| bio.encode_utf16().count() > min_chars)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn create_test_profile(id: &str, teach: &[&str], learn: &[&str]) -> SkillProfile {
        SkillProfile {
            id: id.to_string(),
            name: format!("User {}", id),
            bio: None,
            avatar: None,
            skills_to_teach: skills(teach),
            skills_to_learn: skills(learn),
        }
    }

    #[test]
    fn test_intersection_preserves_source_order() {
        let source = skills(&["Go", "Rust", "Python"]);
        let other = skills(&["Python", "Go"]);

        assert_eq!(intersect_skills(&source, &other), skills(&["Go", "Python"]));
    }

    #[test]
    fn test_intersection_counts_duplicates() {
        let source = skills(&["Rust", "Rust", "Go"]);
        let other = skills(&["Rust"]);

        assert_eq!(intersect_skills(&source, &other), skills(&["Rust", "Rust"]));
    }

    #[test]
    fn test_intersection_is_case_sensitive() {
        let source = skills(&["rust"]);
        let other = skills(&["Rust", " rust"]);

        assert!(intersect_skills(&source, &other).is_empty());
    }

    #[test]
    fn test_self_is_not_eligible() {
        let subject = create_test_profile("1", &["Rust"], &[]);
        assert!(!is_eligible_candidate(&subject, &subject));
    }

    #[test]
    fn test_skill_less_candidate_is_not_eligible() {
        let subject = create_test_profile("1", &["Rust"], &["Go"]);
        let empty = create_test_profile("2", &[], &[]);
        let learner = create_test_profile("3", &[], &["Rust"]);

        assert!(!is_eligible_candidate(&empty, &subject));
        assert!(is_eligible_candidate(&learner, &subject));
    }

    #[test]
    fn test_bio_threshold_is_strict() {
        let mut profile = create_test_profile("1", &[], &[]);
        assert!(!has_substantial_bio(&profile, 20));

        profile.bio = Some("a".repeat(20));
        assert!(!has_substantial_bio(&profile, 20));

        profile.bio = Some("a".repeat(21));
        assert!(has_substantial_bio(&profile, 20));

        // 21 characters, 42 bytes
        profile.bio = Some("é".repeat(21));
        assert!(has_substantial_bio(&profile, 20));
    }

    #[test]
    fn test_bio_length_counts_utf16_units() {
        let mut profile = create_test_profile("1", &[], &[]);

        // 12 chars, 24 UTF-16 units
        profile.bio = Some("😀".repeat(12));
        assert!(has_substantial_bio(&profile, 20));

        // 10 chars, 20 UTF-16 units
        profile.bio = Some("😀".repeat(10));
        assert!(!has_substantial_bio(&profile, 20));
    }
}
