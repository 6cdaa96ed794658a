//! Optional sample learner data.
//!
//! Schema: `learner_id,full_name,age,education_level,current_domain,career_goal,
//! experience_level,learning_style,weekly_study_hours,skills` where `skills`
//! is an optional `Skill:level;...` list that seeds an assessment.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::learners::store::ProfileStore;
use crate::models::learner::{LearnerProfile, SkillAssessment, SkillRating, MAX_SKILL_LEVEL};

#[derive(Debug, Deserialize)]
struct ProfileRow {
    #[serde(default)]
    learner_id: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    age: String,
    #[serde(default)]
    education_level: String,
    #[serde(default)]
    current_domain: String,
    #[serde(default)]
    career_goal: String,
    #[serde(default)]
    experience_level: String,
    #[serde(default)]
    learning_style: String,
    #[serde(default)]
    weekly_study_hours: String,
    #[serde(default)]
    skills: String,
}

/// Seeds `store` from a CSV file. A missing file seeds nothing.
/// Returns the number of learners added.
pub fn seed_profiles(store: &ProfileStore, path: &Path) -> Result<usize> {
    if !path.exists() {
        debug!(path = %path.display(), "No sample profile file, skipping seed");
        return Ok(0);
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open profiles {}", path.display()))?;
    read_profiles(store, file, &path.display().to_string())
}

pub fn read_profiles<R: Read>(store: &ProfileStore, reader: R, source: &str) -> Result<usize> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .with_context(|| format!("profiles {source} has no readable header row"))?
        .clone();

    let mut added = 0usize;
    let mut skipped = 0usize;

    for record in csv_reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                skipped += 1;
                warn!(source, error = %e, "Skipping unreadable profile row");
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let parsed = record
            .deserialize::<ProfileRow>(Some(&headers))
            .map_err(|e| e.to_string())
            .and_then(parse_profile_row);

        match parsed {
            Ok((profile, assessment)) => {
                let user_id = profile.user_id.clone();
                if store.seed(profile, assessment) {
                    added += 1;
                } else {
                    skipped += 1;
                    warn!(source, line, user_id = %user_id, "Skipping profile row: duplicate learner_id");
                }
            }
            Err(reason) => {
                skipped += 1;
                warn!(source, line, reason = %reason, "Skipping malformed profile row");
            }
        }
    }

    info!(source, added, skipped, "Sample profiles loaded");
    Ok(added)
}

fn parse_profile_row(
    row: ProfileRow,
) -> Result<(LearnerProfile, Option<SkillAssessment>), String> {
    if row.learner_id.is_empty() {
        return Err("missing learner_id".to_string());
    }
    if row.full_name.is_empty() {
        return Err("missing full_name".to_string());
    }
    let age = row
        .age
        .parse::<u32>()
        .ok()
        .filter(|a| (1..=120).contains(a))
        .ok_or_else(|| format!("invalid age '{}'", row.age))?;
    let weekly_study_hours = row
        .weekly_study_hours
        .parse::<u32>()
        .ok()
        .filter(|h| (1..=168).contains(h))
        .ok_or_else(|| format!("invalid weekly_study_hours '{}'", row.weekly_study_hours))?;

    let now = Utc::now();
    let assessment = parse_ratings(&row.skills)?.map(|skills| SkillAssessment {
        user_id: row.learner_id.clone(),
        skills,
        assessed_at: now,
    });

    let profile = LearnerProfile {
        user_id: row.learner_id,
        full_name: row.full_name,
        age,
        education_level: row.education_level,
        current_domain: row.current_domain,
        career_goal: row.career_goal,
        experience_level: row.experience_level,
        learning_style: row.learning_style,
        weekly_study_hours,
        registered_at: now,
    };
    Ok((profile, assessment))
}

/// Parses `Python:3;Statistics:2`. An empty column means "no assessment".
fn parse_ratings(raw: &str) -> Result<Option<Vec<SkillRating>>, String> {
    let mut seen = HashSet::new();
    let mut ratings = Vec::new();
    for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, level) = part
            .rsplit_once(':')
            .ok_or_else(|| format!("skill entry '{part}' is not Name:level"))?;
        let name = name.trim();
        let level = level
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|l| *l <= MAX_SKILL_LEVEL)
            .ok_or_else(|| format!("skill entry '{part}' has an invalid level"))?;
        if name.is_empty() || !seen.insert(name.to_lowercase()) {
            return Err(format!("skill entry '{part}' has an empty or repeated name"));
        }
        ratings.push(SkillRating {
            name: name.to_string(),
            level,
        });
    }
    Ok((!ratings.is_empty()).then_some(ratings))
}
