use serde::{Deserialize, Serialize};

/// A user's exchange-relevant attributes
///
/// Skill lists keep the order the store returned them in. Entries are
/// case-sensitive tokens and duplicates are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(rename = "skillsToTeach", default)]
    pub skills_to_teach: Vec<String>,
    #[serde(rename = "skillsToLearn", default)]
    pub skills_to_learn: Vec<String>,
}

impl SkillProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bio: None,
            avatar: None,
            skills_to_teach: Vec::new(),
            skills_to_learn: Vec::new(),
        }
    }

    /// True when the user lists at least one skill in either direction
    pub fn has_skills(&self) -> bool {
        !self.skills_to_teach.is_empty() || !self.skills_to_learn.is_empty()
    }

    /// Teach skills followed by learn skills, in stored order
    pub fn all_skills(&self) -> impl Iterator<Item = &String> {
        self.skills_to_teach.iter().chain(self.skills_to_learn.iter())
    }
}

/// Scored match for one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub profile: SkillProfile,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    #[serde(rename = "commonTeachingSkills")]
    pub common_teaching_skills: Vec<String>,
    #[serde(rename = "commonLearningSkills")]
    pub common_learning_skills: Vec<String>,
    #[serde(rename = "mutualExchangeSkills")]
    pub mutual_exchange_skills: Vec<String>,
}

impl MatchResult {
    pub fn candidate_id(&self) -> &str {
        &self.profile.id
    }
}

/// Topic-based study group keyed by a skill name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudyGroup {
    pub id: uuid::Uuid,
    #[serde(rename = "skillName")]
    pub skill_name: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "createdBy")]
    pub created_by: String,
    #[serde(rename = "memberCount")]
    pub member_count: i64,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "isMember", skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub is_member: Option<bool>,
}

/// Fields needed to insert a new study group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudyGroup {
    pub skill_name: String,
    pub name: String,
    pub description: String,
    pub created_by: String,
}

/// Scoring weights
///
/// Integer coefficients applied to the overlap counts. The defaults are the
/// production formula and should only be overridden for experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub mutual_exchange: u32,
    pub can_teach_me: u32,
    pub can_learn_from_me: u32,
    pub common_teaching: u32,
    pub common_learning: u32,
    pub bio_bonus: u32,
    /// A bio must be strictly longer than this many characters to earn the bonus
    pub bio_min_chars: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            mutual_exchange: 40,
            can_teach_me: 25,
            can_learn_from_me: 25,
            common_teaching: 10,
            common_learning: 15,
            bio_bonus: 5,
            bio_min_chars: 20,
        }
    }
}
