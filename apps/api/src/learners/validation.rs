//! Request boundary validation for registration and assessment payloads.
//!
//! Everything past this module can assume well-formed input.

use std::collections::HashSet;

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::learner::{NewLearner, SkillRating, MAX_SKILL_LEVEL};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: Option<String>,
    pub age: Option<i64>,
    pub education_level: Option<String>,
    pub current_domain: Option<String>,
    pub career_goal: Option<String>,
    pub experience_level: Option<String>,
    pub learning_style: Option<String>,
    pub weekly_study_hours: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub user_id: Option<String>,
    pub skills: Option<Vec<SkillInput>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillInput {
    pub name: Option<String>,
    pub level: Option<i64>,
}

pub fn validate_registration(req: RegisterRequest) -> Result<NewLearner, AppError> {
    Ok(NewLearner {
        full_name: required_text(req.full_name, "fullName")?,
        age: required_range(req.age, "age", 1, 120)?,
        education_level: required_text(req.education_level, "educationLevel")?,
        current_domain: required_text(req.current_domain, "currentDomain")?,
        career_goal: required_text(req.career_goal, "careerGoal")?,
        experience_level: required_text(req.experience_level, "experienceLevel")?,
        learning_style: required_text(req.learning_style, "learningStyle")?,
        weekly_study_hours: required_range(req.weekly_study_hours, "weeklyStudyHours", 1, 168)?,
    })
}

/// Returns the learner id and the skill list in submission order.
pub fn validate_assessment(req: AssessmentRequest) -> Result<(String, Vec<SkillRating>), AppError> {
    let user_id = required_user_id(req.user_id)?;
    let skills = req
        .skills
        .ok_or_else(|| AppError::InvalidInput("Missing or invalid skills array".to_string()))?;

    let mut seen = HashSet::new();
    let mut ratings = Vec::with_capacity(skills.len());
    for (i, skill) in skills.into_iter().enumerate() {
        let name = required_text(skill.name, &format!("skills[{i}].name"))?;
        let level: u8 = required_range(
            skill.level,
            &format!("skills[{i}].level"),
            0,
            MAX_SKILL_LEVEL as i64,
        )?;
        if !seen.insert(name.to_lowercase()) {
            return Err(AppError::InvalidInput(format!(
                "skills[{i}].name: duplicate skill '{name}'"
            )));
        }
        ratings.push(SkillRating { name, level });
    }

    Ok((user_id, ratings))
}

pub fn required_user_id(user_id: Option<String>) -> Result<String, AppError> {
    user_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing userId".to_string()))
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(AppError::InvalidInput(format!("{field} must not be empty"))),
        None => Err(AppError::InvalidInput(format!(
            "Missing required field: {field}"
        ))),
    }
}

fn required_range<T: TryFrom<i64>>(
    value: Option<i64>,
    field: &str,
    min: i64,
    max: i64,
) -> Result<T, AppError> {
    let value = value
        .ok_or_else(|| AppError::InvalidInput(format!("Missing required field: {field}")))?;
    if !(min..=max).contains(&value) {
        return Err(AppError::InvalidInput(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    T::try_from(value)
        .map_err(|_| AppError::InvalidInput(format!("{field} is out of range: {value}")))
}
