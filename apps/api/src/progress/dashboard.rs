use serde::{Deserialize, Serialize};

use crate::models::learner::{round_to, LearnerProfile};
use crate::models::path::LearningPath;
use crate::models::progress::{CourseStatus, DashboardStats, ProgressRecord};
use crate::progress::merger::compute_stats;

/// Skill progress at or above this counts as mastered.
const MASTERED_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillProgressView {
    pub name: String,
    pub progress: f64,
    pub level: String,
    pub current_level: u8,
    pub required_level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgressView {
    pub title: String,
    pub provider: String,
    pub duration_weeks: u32,
    pub progress: f64,
    pub status: CourseStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_skills: usize,
    pub mastered_skills: usize,
    pub average_skill_level: f64,
    pub hours_completed: f64,
    pub completion_rate: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user_id: String,
    pub statistics: DashboardStats,
    pub skills: Vec<SkillProgressView>,
    pub courses: Vec<CourseProgressView>,
    pub summary: DashboardSummary,
}

/// Per-skill progress for every gap on the current path, in gap order.
pub fn skill_views(path: Option<&LearningPath>, record: &ProgressRecord) -> Vec<SkillProgressView> {
    path.map(|p| {
        p.skill_gaps
            .iter()
            .map(|g| SkillProgressView {
                name: g.name.clone(),
                progress: record.skill(&g.name),
                level: g.level_label().to_string(),
                current_level: g.current_level,
                required_level: g.required_level,
            })
            .collect()
    })
    .unwrap_or_default()
}

/// Per-course progress for every course on the current path, in study order.
pub fn course_views(
    path: Option<&LearningPath>,
    record: &ProgressRecord,
) -> Vec<CourseProgressView> {
    path.map(|p| {
        p.courses
            .iter()
            .map(|c| {
                let progress = record.course(&c.title);
                CourseProgressView {
                    title: c.title.clone(),
                    provider: c.provider.clone(),
                    duration_weeks: c.duration_weeks,
                    progress,
                    status: CourseStatus::from_progress(progress),
                }
            })
            .collect()
    })
    .unwrap_or_default()
}

/// Read-only projection of a learner's path and progress.
pub fn build_dashboard(
    profile: &LearnerProfile,
    path: Option<&LearningPath>,
    record: &ProgressRecord,
) -> Dashboard {
    let statistics = compute_stats(path, record);
    let skills = skill_views(path, record);
    let courses = course_views(path, record);

    let total_skills = skills.len();
    let mastered_skills = skills
        .iter()
        .filter(|s| s.progress >= MASTERED_THRESHOLD)
        .count();
    let average_skill_level = if total_skills > 0 {
        let total: f64 = skills
            .iter()
            .map(|s| level_value(s.current_level))
            .sum();
        round_to(total / total_skills as f64, 1)
    } else {
        0.0
    };
    let hours_completed = round_to(
        courses
            .iter()
            .map(|c| {
                c.progress / 100.0 * c.duration_weeks as f64 * profile.weekly_study_hours as f64
            })
            .sum(),
        1,
    );

    let message = summary_message(&statistics, total_skills, mastered_skills);

    Dashboard {
        user_id: profile.user_id.clone(),
        statistics,
        skills,
        courses,
        summary: DashboardSummary {
            total_skills,
            mastered_skills,
            average_skill_level,
            hours_completed,
            completion_rate: statistics.overall_progress,
            message,
        },
    }
}

/// Beginner (0) = 1, Intermediate (1-2) = 2, Advanced = 3.
fn level_value(current_level: u8) -> f64 {
    match current_level {
        0 => 1.0,
        1 | 2 => 2.0,
        _ => 3.0,
    }
}

fn summary_message(stats: &DashboardStats, total_skills: usize, mastered: usize) -> String {
    if stats.total_courses == 0 {
        return "No courses on your learning path yet. Generate a path to start tracking progress."
            .to_string();
    }
    if stats.completed_courses == stats.total_courses {
        return format!(
            "All {} courses completed. {mastered} of {total_skills} skills mastered.",
            stats.total_courses
        );
    }
    format!(
        "{} of {} courses completed, {} in progress ({}% overall). {mastered} of {total_skills} skills mastered.",
        stats.completed_courses, stats.total_courses, stats.in_progress_courses, stats.overall_progress
    )
}
