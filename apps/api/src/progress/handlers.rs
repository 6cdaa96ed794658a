use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::learners::validation::required_user_id;
use crate::models::progress::{DashboardStats, UnmatchedEntry};
use crate::progress::dashboard::{
    build_dashboard, course_views, skill_views, CourseProgressView, Dashboard, SkillProgressView,
};
use crate::progress::merger::{merge, ProgressEntry, ProgressUpdate};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub user_id: Option<String>,
    pub skill_progress: Option<Vec<SkillProgressInput>>,
    pub course_progress: Option<Vec<CourseProgressInput>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillProgressInput {
    pub name: Option<String>,
    pub progress: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseProgressInput {
    pub title: Option<String>,
    pub progress: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub dashboard: Dashboard,
}

#[derive(Debug, Serialize)]
pub struct ProgressView {
    pub skills: Vec<SkillProgressView>,
    pub courses: Vec<CourseProgressView>,
}

#[derive(Debug, Serialize)]
pub struct UpdateProgressResponse {
    pub success: bool,
    pub message: String,
    pub progress: ProgressView,
    pub statistics: DashboardStats,
    pub unmatched: Vec<UnmatchedEntry>,
}

/// Checks names and progress values; out-of-range numbers are left for the
/// merger to clamp.
pub fn validate_progress_update(
    request: UpdateProgressRequest,
) -> Result<(String, ProgressUpdate), AppError> {
    let user_id = required_user_id(request.user_id)?;

    let skills = request
        .skill_progress
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, s)| progress_entry(s.name, s.progress, &format!("skillProgress[{i}]"), "name"))
        .collect::<Result<Vec<_>, _>>()?;
    let courses = request
        .course_progress
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, c)| progress_entry(c.title, c.progress, &format!("courseProgress[{i}]"), "title"))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((user_id, ProgressUpdate { skills, courses }))
}

fn progress_entry(
    name: Option<String>,
    progress: Option<f64>,
    field: &str,
    name_field: &str,
) -> Result<ProgressEntry, AppError> {
    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("Missing required field: {field}.{name_field}")))?;
    let progress = progress
        .ok_or_else(|| AppError::InvalidInput(format!("Missing required field: {field}.progress")))?;
    if !progress.is_finite() {
        return Err(AppError::InvalidInput(format!(
            "{field}.progress must be a finite number"
        )));
    }
    Ok(ProgressEntry { name, progress })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /dashboard/:user_id
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DashboardResponse>, AppError> {
    let dashboard = state.profiles.with_learner(&user_id, |record| {
        Ok(build_dashboard(
            &record.profile,
            record.path.as_ref(),
            &record.progress,
        ))
    })?;

    Ok(Json(DashboardResponse {
        success: true,
        dashboard,
    }))
}

/// POST /update-progress
///
/// Overwrites progress per key. Unknown skills/courses are stored and reported
/// back as unmatched.
pub async fn handle_update_progress(
    State(state): State<AppState>,
    payload: Result<Json<UpdateProgressRequest>, JsonRejection>,
) -> Result<Json<UpdateProgressResponse>, AppError> {
    let Json(request) = payload?;
    let (user_id, update) = validate_progress_update(request)?;

    let response = state.profiles.with_learner(&user_id, |record| {
        let outcome = merge(
            record.path.as_ref(),
            record.assessment.as_ref(),
            &record.progress,
            &update,
        );
        record.progress = outcome.record;

        Ok(UpdateProgressResponse {
            success: true,
            message: "Progress updated successfully".to_string(),
            progress: ProgressView {
                skills: skill_views(record.path.as_ref(), &record.progress),
                courses: course_views(record.path.as_ref(), &record.progress),
            },
            statistics: outcome.stats,
            unmatched: outcome.unmatched,
        })
    })?;

    info!(
        learner_id = %user_id,
        skills = update.skills.len(),
        courses = update.courses.len(),
        unmatched = response.unmatched.len(),
        overall_progress = response.statistics.overall_progress,
        "Progress merged"
    );

    Ok(Json(response))
}
