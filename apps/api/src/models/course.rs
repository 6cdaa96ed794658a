use serde::{Deserialize, Serialize};

/// One skill a course teaches, from `min_level` (entry level expected) up to
/// `max_level_taught`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CourseSkill {
    pub name: String,
    pub min_level: u8,
    pub max_level_taught: u8,
}

/// A catalog entry. `title` is unique within the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub title: String,
    pub provider: String,
    pub domain: String,
    pub format: String,
    pub level: String,
    pub duration_weeks: u32,
    pub rating: f64,
    pub description: String,
    pub skills: Vec<CourseSkill>,
}

impl CourseRecord {
    /// Case-insensitive lookup of the skill entry this course teaches.
    pub fn teaches(&self, skill: &str) -> Option<&CourseSkill> {
        self.skills
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(skill))
    }

    /// Whether the course format matches a declared learning style
    /// (e.g. style "video" matches format "Video + Exercises").
    pub fn matches_style(&self, learning_style: &str) -> bool {
        let style = learning_style.trim().to_lowercase();
        !style.is_empty() && self.format.to_lowercase().contains(&style)
    }
}
