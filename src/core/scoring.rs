use crate::models::{SkillProfile, MatchResult, ScoringWeights};
use crate::core::filters::{has_substantial_bio, intersect_skills};

/// Highest score a match can reach
pub const MAX_MATCH_SCORE: u8 = 100;

/// Score a candidate against the subject using the default weights
pub fn score(subject: &SkillProfile, candidate: &SkillProfile) -> MatchResult {
    calculate_match_score(subject, candidate, &ScoringWeights::default())
}

/// Calculate a match score (0-100) and the skill overlap breakdown
///
/// Scoring formula:
/// score = min(100,
///     mutual_exchange * 40 +       # same skill both ways
///     can_teach_me * 25 +          # candidate teaches what subject learns
///     can_learn_from_me * 25 +     # subject teaches what candidate learns
///     common_teaching * 10 +       # both teach the same skill
///     common_learning * 15 +       # both learn the same skill
///     5 if candidate bio > 20 chars
/// )
///
/// Not symmetric: the bio bonus and `can_teach_me` ordering depend on which
/// side is the candidate. The caller is responsible for excluding
/// `subject.id == candidate.id`.
pub fn calculate_match_score(
    subject: &SkillProfile,
    candidate: &SkillProfile,
    weights: &ScoringWeights,
) -> MatchResult {
    let can_teach_me = intersect_skills(&candidate.skills_to_teach, &subject.skills_to_learn);
    let can_learn_from_me = intersect_skills(&subject.skills_to_teach, &candidate.skills_to_learn);
    let mutual_exchange = intersect_skills(&can_teach_me, &can_learn_from_me);
    let common_teaching = intersect_skills(&subject.skills_to_teach, &candidate.skills_to_teach);
    let common_learning = intersect_skills(&subject.skills_to_learn, &candidate.skills_to_learn);

    let mut raw = weighted(mutual_exchange.len(), weights.mutual_exchange)
        .saturating_add(weighted(can_teach_me.len(), weights.can_teach_me))
        .saturating_add(weighted(can_learn_from_me.len(), weights.can_learn_from_me))
        .saturating_add(weighted(common_teaching.len(), weights.common_teaching))
        .saturating_add(weighted(common_learning.len(), weights.common_learning));

    if has_substantial_bio(candidate, weights.bio_min_chars) {
        raw = raw.saturating_add(u64::from(weights.bio_bonus));
    }

    MatchResult {
        profile: candidate.clone(),
        match_score: clamp_score(raw),
        common_teaching_skills: common_teaching,
        common_learning_skills: common_learning,
        mutual_exchange_skills: mutual_exchange,
    }
}

#[inline]
fn weighted(count: usize, weight: u32) -> u64 {
    (count as u64).saturating_mul(u64::from(weight))
}

/// Clamp a raw score into [0, 100]
#[inline]
fn clamp_score(raw: u64) -> u8 {
    raw.clamp(0, u64::from(MAX_MATCH_SCORE)) as u8
}
