use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::learners::validation::required_user_id;
use crate::models::course::CourseRecord;
use crate::models::path::{GapCoverage, GapSource, LearningPath, RecommendationStatus, SkillGap};
use crate::pathing::gap_analysis::analyze;
use crate::pathing::path_builder::BuildOptions;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePathRequest {
    pub user_id: Option<String>,
    /// Overrides the configured cap for this request.
    pub max_courses: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendedSkill {
    pub name: String,
    pub description: String,
    pub level: String,
    pub priority: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathView {
    pub user_id: String,
    pub generated_at: DateTime<Utc>,
    pub skill_gaps: Vec<SkillGap>,
    pub skills: Vec<RecommendedSkill>,
    pub courses: Vec<CourseRecord>,
    pub coverage: Vec<GapCoverage>,
    pub total_skills: usize,
    pub total_courses: usize,
    pub gap_source: GapSource,
    pub recommendation_status: RecommendationStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePathResponse {
    pub success: bool,
    pub message: String,
    pub learning_path: LearningPathView,
}

impl From<LearningPath> for LearningPathView {
    fn from(path: LearningPath) -> Self {
        let recommendation_status = path.recommendation_status();
        let skills: Vec<RecommendedSkill> = path.skill_gaps.iter().map(recommend).collect();
        LearningPathView {
            total_skills: skills.len(),
            total_courses: path.courses.len(),
            user_id: path.user_id,
            generated_at: path.generated_at,
            skill_gaps: path.skill_gaps,
            skills,
            courses: path.courses,
            coverage: path.coverage,
            gap_source: path.gap_source,
            recommendation_status,
        }
    }
}

fn recommend(gap: &SkillGap) -> RecommendedSkill {
    RecommendedSkill {
        name: gap.name.clone(),
        description: format!(
            "Develop {} skills to reach level {}",
            gap.name, gap.required_level
        ),
        level: gap.level_label().to_string(),
        priority: gap.priority().to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate-path
///
/// Gap analysis → course selection; the result replaces the learner's current
/// path. Progress already recorded is kept.
pub async fn handle_generate_path(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePathRequest>, JsonRejection>,
) -> Result<Json<GeneratePathResponse>, AppError> {
    let Json(request) = payload?;
    let user_id = required_user_id(request.user_id)?;
    let max_courses = request.max_courses.or(state.config.max_path_courses);

    let path = state.profiles.with_learner(&user_id, |record| {
        let analysis = analyze(&record.profile, record.assessment.as_ref(), &state.domains)?;
        let options = BuildOptions {
            learning_style: record.profile.learning_style.clone(),
            max_courses,
        };
        let plan = state
            .path_builder
            .build(&analysis.gaps, state.catalog.courses(), &options);

        let path = LearningPath {
            user_id: record.profile.user_id.clone(),
            generated_at: Utc::now(),
            skill_gaps: analysis.gaps,
            courses: plan.courses,
            coverage: plan.coverage,
            gap_source: analysis.source,
        };
        record.path = Some(path.clone());
        Ok(path)
    })?;

    info!(
        learner_id = %user_id,
        gaps = path.skill_gaps.len(),
        courses = path.courses.len(),
        "Learning path generated"
    );

    let message = match path.recommendation_status() {
        RecommendationStatus::Ok => "Learning path generated successfully".to_string(),
        RecommendationStatus::NoRecommendations if path.skill_gaps.is_empty() => {
            "No skill gaps found. You already meet the target levels for your goal.".to_string()
        }
        RecommendationStatus::NoRecommendations => {
            "No courses in the catalog match your skill gaps yet.".to_string()
        }
    };

    Ok(Json(GeneratePathResponse {
        success: true,
        message,
        learning_path: path.into(),
    }))
}
