use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest level a skill can be rated at in an assessment or a course.
pub const MAX_SKILL_LEVEL: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub user_id: String,
    pub full_name: String,
    pub age: u32,
    pub education_level: String,
    pub current_domain: String,
    pub career_goal: String,
    pub experience_level: String,
    pub learning_style: String,
    pub weekly_study_hours: u32,
    pub registered_at: DateTime<Utc>,
}

/// Validated registration payload, before an id has been assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLearner {
    pub full_name: String,
    pub age: u32,
    pub education_level: String,
    pub current_domain: String,
    pub career_goal: String,
    pub experience_level: String,
    pub learning_style: String,
    pub weekly_study_hours: u32,
}

impl NewLearner {
    pub fn into_profile(self, user_id: String, registered_at: DateTime<Utc>) -> LearnerProfile {
        LearnerProfile {
            user_id,
            full_name: self.full_name,
            age: self.age,
            education_level: self.education_level,
            current_domain: self.current_domain,
            career_goal: self.career_goal,
            experience_level: self.experience_level,
            learning_style: self.learning_style,
            weekly_study_hours: self.weekly_study_hours,
            registered_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillRating {
    pub name: String,
    pub level: u8,
}

/// A learner's self-reported skills, in submission order. Names are unique
/// (case-insensitively) once past the request boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillAssessment {
    pub user_id: String,
    pub skills: Vec<SkillRating>,
    pub assessed_at: DateTime<Utc>,
}

impl SkillAssessment {
    pub fn total_skills(&self) -> usize {
        self.skills.len()
    }

    pub fn total_score(&self) -> u32 {
        self.skills.iter().map(|s| s.level as u32).sum()
    }

    /// Mean assessed level; 0.0 for an empty assessment.
    pub fn average_level(&self) -> f64 {
        if self.skills.is_empty() {
            return 0.0;
        }
        self.total_score() as f64 / self.skills.len() as f64
    }

    /// Case-insensitive level lookup.
    pub fn level_of(&self, skill: &str) -> Option<u8> {
        self.skills
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(skill.trim()))
            .map(|s| s.level)
    }

    pub fn summary(&self) -> AssessmentSummary {
        AssessmentSummary {
            user_id: self.user_id.clone(),
            skills: self.skills.clone(),
            total_skills: self.total_skills(),
            total_score: self.total_score(),
            average_level: round_to(self.average_level(), 2),
            assessed_at: self.assessed_at,
        }
    }
}

/// Response projection of an assessment with its derived totals.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    pub user_id: String,
    pub skills: Vec<SkillRating>,
    pub total_skills: usize,
    pub total_score: u32,
    pub average_level: f64,
    pub assessed_at: DateTime<Utc>,
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(levels: &[(&str, u8)]) -> SkillAssessment {
        SkillAssessment {
            user_id: "user_1".to_string(),
            skills: levels
                .iter()
                .map(|(name, level)| SkillRating {
                    name: name.to_string(),
                    level: *level,
                })
                .collect(),
            assessed_at: Utc::now(),
        }
    }

    #[test]
    fn test_totals_are_derived_from_levels() {
        let a = assessment(&[("JavaScript", 3), ("React", 2), ("Node.js", 1)]);
        assert_eq!(a.total_skills(), 3);
        assert_eq!(a.total_score(), 6);
        assert!((a.average_level() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_assessment_average_is_zero() {
        let a = assessment(&[]);
        assert_eq!(a.total_score(), 0);
        assert_eq!(a.average_level(), 0.0);
        assert_eq!(a.summary().average_level, 0.0);
    }

    #[test]
    fn test_summary_rounds_average_to_two_decimals() {
        let a = assessment(&[("A", 1), ("B", 1), ("C", 0)]);
        assert_eq!(a.summary().average_level, 0.67);
    }

    #[test]
    fn test_level_lookup_ignores_case() {
        let a = assessment(&[("Node.js", 4)]);
        assert_eq!(a.level_of("node.JS"), Some(4));
        assert_eq!(a.level_of("Deno"), None);
    }
}
