use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-learner progress percentages, keyed by skill name and course title.
/// Values are always within [0, 100]. Keys are unique ignoring ASCII case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProgressRecord {
    pub skills: BTreeMap<String, f64>,
    pub courses: BTreeMap<String, f64>,
}

impl ProgressRecord {
    /// Case-insensitive; missing skills read as 0.
    pub fn skill(&self, name: &str) -> f64 {
        lookup(&self.skills, name)
    }

    /// Case-insensitive; missing courses read as 0.
    pub fn course(&self, title: &str) -> f64 {
        lookup(&self.courses, title)
    }

    pub fn set_skill(&mut self, name: String, progress: f64) {
        upsert(&mut self.skills, name, progress);
    }

    pub fn set_course(&mut self, title: String, progress: f64) {
        upsert(&mut self.courses, title, progress);
    }
}

fn lookup(map: &BTreeMap<String, f64>, key: &str) -> f64 {
    map.get(key)
        .or_else(|| {
            map.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
        .copied()
        .unwrap_or(0.0)
}

/// Replaces any spelling variant of `key` so a later lookup cannot hit a
/// stale value.
fn upsert(map: &mut BTreeMap<String, f64>, key: String, value: f64) {
    map.retain(|k, _| k == &key || !k.eq_ignore_ascii_case(&key));
    map.insert(key, value);
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_courses: usize,
    pub completed_courses: usize,
    pub in_progress_courses: usize,
    pub overall_progress: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CourseStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl CourseStatus {
    pub fn from_progress(progress: f64) -> Self {
        if progress >= 100.0 {
            CourseStatus::Completed
        } else if progress > 0.0 {
            CourseStatus::InProgress
        } else {
            CourseStatus::NotStarted
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressKind {
    Skill,
    Course,
}

/// An update entry that names neither a path/assessment skill nor a path course.
/// It is still stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnmatchedEntry {
    pub kind: ProgressKind,
    pub name: String,
}
