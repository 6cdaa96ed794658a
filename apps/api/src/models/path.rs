use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::course::CourseRecord;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub name: String,
    pub current_level: u8,
    pub required_level: u8,
    pub deficit: u8,
}

impl SkillGap {
    /// Returns `None` when the learner already meets the required level.
    pub fn between(name: &str, current_level: u8, required_level: u8) -> Option<Self> {
        let deficit = required_level.saturating_sub(current_level);
        (deficit > 0).then(|| SkillGap {
            name: name.to_string(),
            current_level,
            required_level,
            deficit,
        })
    }

    pub fn level_label(&self) -> &'static str {
        level_label(self.current_level)
    }

    pub fn priority(&self) -> &'static str {
        match self.deficit {
            d if d >= 3 => "High",
            2 => "Medium",
            _ => "Low",
        }
    }
}

/// Beginner / Intermediate / Advanced label for an assessed level.
pub fn level_label(current_level: u8) -> &'static str {
    match current_level {
        0 => "Beginner",
        1 | 2 => "Intermediate",
        _ => "Advanced",
    }
}

/// Where the required-skill list for a gap analysis came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GapSource {
    DomainTable { domain: String },
    AssessmentFallback,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    Full,
    Partial,
    Uncovered,
}

/// How a single gap is addressed by the selected courses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GapCoverage {
    pub skill: String,
    pub status: CoverageStatus,
    pub course_title: Option<String>,
    /// True when the course was already selected for an earlier gap.
    pub reused: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    Ok,
    NoRecommendations,
}

/// The learner's current recommended sequence. Regenerating replaces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub user_id: String,
    pub generated_at: DateTime<Utc>,
    pub skill_gaps: Vec<SkillGap>,
    pub courses: Vec<CourseRecord>,
    pub coverage: Vec<GapCoverage>,
    pub gap_source: GapSource,
}

impl LearningPath {
    pub fn recommendation_status(&self) -> RecommendationStatus {
        if self.courses.is_empty() {
            RecommendationStatus::NoRecommendations
        } else {
            RecommendationStatus::Ok
        }
    }
}
