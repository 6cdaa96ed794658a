//! Progress Merger: folds a batch of progress updates into a learner's record.
//!
//! Overwrite semantics: the last value for a key in a batch wins and values
//! are clamped to [0, 100], so applying the same batch twice leaves the same
//! stored state as applying it once.

use serde::{Deserialize, Serialize};

use crate::models::learner::{round_to, SkillAssessment};
use crate::models::path::LearningPath;
use crate::models::progress::{DashboardStats, ProgressKind, ProgressRecord, UnmatchedEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    pub name: String,
    pub progress: f64,
}

/// A validated update batch, in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressUpdate {
    pub skills: Vec<ProgressEntry>,
    pub courses: Vec<ProgressEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MergeOutcome {
    pub record: ProgressRecord,
    pub stats: DashboardStats,
    pub unmatched: Vec<UnmatchedEntry>,
}

/// Applies `update` on top of `prior` and recomputes the dashboard stats.
///
/// Skill names are recognized when they name a gap on the current path or an
/// assessed skill; course titles when they name a course on the current path.
/// Matching is case-insensitive and the stored key takes the canonical
/// spelling. Anything else is stored under its submitted name and reported in
/// `unmatched`.
pub fn merge(
    path: Option<&LearningPath>,
    assessment: Option<&SkillAssessment>,
    prior: &ProgressRecord,
    update: &ProgressUpdate,
) -> MergeOutcome {
    let mut record = prior.clone();
    let mut unmatched: Vec<UnmatchedEntry> = Vec::new();

    for entry in &update.skills {
        let known = path
            .and_then(|p| {
                p.skill_gaps
                    .iter()
                    .find(|g| g.name.eq_ignore_ascii_case(&entry.name))
                    .map(|g| g.name.clone())
            })
            .or_else(|| {
                assessment.and_then(|a| {
                    a.skills
                        .iter()
                        .find(|s| s.name.eq_ignore_ascii_case(&entry.name))
                        .map(|s| s.name.clone())
                })
            });
        let key = resolve_key(known, entry, ProgressKind::Skill, &mut unmatched);
        record.set_skill(key, clamp_progress(entry.progress));
    }

    for entry in &update.courses {
        let known = path.and_then(|p| {
            p.courses
                .iter()
                .find(|c| c.title.eq_ignore_ascii_case(&entry.name))
                .map(|c| c.title.clone())
        });
        let key = resolve_key(known, entry, ProgressKind::Course, &mut unmatched);
        record.set_course(key, clamp_progress(entry.progress));
    }

    let stats = compute_stats(path, &record);
    MergeOutcome {
        record,
        stats,
        unmatched,
    }
}

fn resolve_key(
    known: Option<String>,
    entry: &ProgressEntry,
    kind: ProgressKind,
    unmatched: &mut Vec<UnmatchedEntry>,
) -> String {
    known.unwrap_or_else(|| {
        let flagged = UnmatchedEntry {
            kind,
            name: entry.name.clone(),
        };
        if !unmatched.contains(&flagged) {
            unmatched.push(flagged);
        }
        entry.name.clone()
    })
}

pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 100.0)
}

/// Stats over the courses on the current path only; progress stored for
/// other titles does not count.
pub fn compute_stats(path: Option<&LearningPath>, record: &ProgressRecord) -> DashboardStats {
    let values: Vec<f64> = path
        .map(|p| p.courses.iter().map(|c| record.course(&c.title)).collect())
        .unwrap_or_default();

    let total_courses = values.len();
    let completed_courses = values.iter().filter(|v| **v >= 100.0).count();
    let in_progress_courses = values.iter().filter(|v| **v > 0.0 && **v < 100.0).count();
    let overall_progress = if total_courses > 0 {
        round_to(values.iter().sum::<f64>() / total_courses as f64, 1)
    } else {
        0.0
    };

    DashboardStats {
        total_courses,
        completed_courses,
        in_progress_courses,
        overall_progress,
    }
}
