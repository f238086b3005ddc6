use crate::models::{NewStudyGroup, StudyGroup};

/// Display name for a group created around a skill
pub fn group_name(skill_name: &str) -> String {
    format!("{} Study Group", skill_name)
}

/// Default description for a group created around a skill
pub fn group_description(skill_name: &str) -> String {
    format!(
        "A community for learning and sharing knowledge about {}",
        skill_name
    )
}

/// Build the insert payload for a new group
///
/// The skill name is trimmed; callers reject blank names before this point.
pub fn build_group(skill_name: &str, created_by: &str) -> NewStudyGroup {
    let skill_name = skill_name.trim();
    NewStudyGroup {
        skill_name: skill_name.to_string(),
        name: group_name(skill_name),
        description: group_description(skill_name),
        created_by: created_by.to_string(),
    }
}

/// Skills that have no study group yet
///
/// Group skill names are compared case-insensitively. The result keeps the
/// order of `skills` and drops repeated entries.
pub fn skills_without_groups<'a, I>(skills: I, groups: &[StudyGroup]) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let existing: Vec<String> = groups
        .iter()
        .map(|group| group.skill_name.to_lowercase())
        .collect();

    let mut missing: Vec<String> = Vec::new();
    for skill in skills {
        let lowered = skill.to_lowercase();
        if existing.contains(&lowered) || missing.contains(skill) {
            continue;
        }
        missing.push(skill.clone());
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_group(skill: &str, member_count: i64) -> StudyGroup {
        StudyGroup {
            id: uuid::Uuid::new_v4(),
            skill_name: skill.to_string(),
            name: group_name(skill),
            description: Some(group_description(skill)),
            created_by: "owner".to_string(),
            member_count,
            created_at: Utc::now(),
            is_member: None,
        }
    }

    #[test]
    fn test_build_group() {
        let group = build_group("  Rust ", "u1");

        assert_eq!(group.skill_name, "Rust");
        assert_eq!(group.name, "Rust Study Group");
        assert_eq!(
            group.description,
            "A community for learning and sharing knowledge about Rust"
        );
        assert_eq!(group.created_by, "u1");
    }

    #[test]
    fn test_skills_without_groups_ignores_case() {
        let groups = vec![create_group("rust", 3)];
        let skills = vec!["Rust".to_string(), "Go".to_string()];

        assert_eq!(skills_without_groups(&skills, &groups), vec!["Go"]);
    }

    #[test]
    fn test_skills_without_groups_dedupes() {
        let skills = vec!["Go".to_string(), "SQL".to_string(), "Go".to_string()];

        assert_eq!(skills_without_groups(&skills, &[]), vec!["Go", "SQL"]);
    }
}
