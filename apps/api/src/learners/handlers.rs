use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::learners::validation::{
    validate_assessment, validate_registration, AssessmentRequest, RegisterRequest,
};
use crate::models::learner::{AssessmentSummary, LearnerProfile, SkillAssessment};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
    pub profile: LearnerProfile,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub success: bool,
    pub message: String,
    pub assessment: AssessmentSummary,
}

/// POST /register
pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(request) = payload?;
    let new_learner = validate_registration(request)?;
    let profile = state.profiles.register(new_learner);

    info!(learner_id = %profile.user_id, domain = %profile.current_domain, "Learner registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Learner profile registered successfully".to_string(),
            user_id: profile.user_id.clone(),
            profile,
        }),
    ))
}

/// POST /assessment
///
/// Replaces any earlier assessment for the learner.
pub async fn handle_assessment(
    State(state): State<AppState>,
    payload: Result<Json<AssessmentRequest>, JsonRejection>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let Json(request) = payload?;
    let (user_id, skills) = validate_assessment(request)?;

    let assessment = state.profiles.with_learner(&user_id, |record| {
        let assessment = SkillAssessment {
            user_id: record.profile.user_id.clone(),
            skills,
            assessed_at: Utc::now(),
        };
        record.assessment = Some(assessment.clone());
        Ok(assessment)
    })?;

    info!(
        learner_id = %user_id,
        skills = assessment.total_skills(),
        total_score = assessment.total_score(),
        "Skill assessment stored"
    );

    Ok(Json(AssessmentResponse {
        success: true,
        message: "Skill assessment submitted successfully".to_string(),
        assessment: assessment.summary(),
    }))
}
