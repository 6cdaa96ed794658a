//! Catalog CSV ingestion.
//!
//! Schema: `title,provider,domain,format,level,duration_weeks,rating,description,skills`
//! where `skills` is `Skill:min-max` entries separated by `;`.
//! Malformed rows are skipped with a warning; they never abort startup.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::CatalogStore;
use crate::models::course::{CourseRecord, CourseSkill};
use crate::models::learner::MAX_SKILL_LEVEL;

#[derive(Debug, Deserialize)]
struct CourseRow {
    #[serde(default)]
    title: String,
    #[serde(default)]
    provider: String,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    format: String,
    #[serde(default)]
    level: String,
    #[serde(default)]
    duration_weeks: String,
    #[serde(default)]
    rating: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    skills: String,
}

/// Loads the catalog from disk. A missing file yields an empty catalog.
pub fn load_catalog(path: &Path) -> Result<CatalogStore> {
    if !path.exists() {
        warn!(path = %path.display(), "Catalog file not found, starting with an empty catalog");
        return Ok(CatalogStore::default());
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open catalog {}", path.display()))?;
    read_catalog(file, &path.display().to_string())
}

pub fn read_catalog<R: Read>(reader: R, source: &str) -> Result<CatalogStore> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .with_context(|| format!("catalog {source} has no readable header row"))?
        .clone();

    let mut courses: Vec<CourseRecord> = Vec::new();
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut skipped = 0usize;

    for record in csv_reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                skipped += 1;
                warn!(source, error = %e, "Skipping unreadable catalog row");
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let parsed = record
            .deserialize::<CourseRow>(Some(&headers))
            .map_err(|e| e.to_string())
            .and_then(parse_course_row);

        match parsed {
            Ok(course) if seen_titles.contains(&course.title) => {
                skipped += 1;
                warn!(source, line, title = %course.title, "Skipping catalog row: duplicate title");
            }
            Ok(course) => {
                seen_titles.insert(course.title.clone());
                courses.push(course);
            }
            Err(reason) => {
                skipped += 1;
                warn!(source, line, reason = %reason, "Skipping malformed catalog row");
            }
        }
    }

    info!(source, loaded = courses.len(), skipped, "Course catalog loaded");
    Ok(CatalogStore::from_courses(courses))
}

fn parse_course_row(row: CourseRow) -> Result<CourseRecord, String> {
    if row.title.is_empty() {
        return Err("missing title".to_string());
    }
    let duration_weeks = row
        .duration_weeks
        .parse::<u32>()
        .map_err(|_| format!("invalid duration_weeks '{}'", row.duration_weeks))?;
    let rating = if row.rating.is_empty() {
        0.0
    } else {
        row.rating
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .ok_or_else(|| format!("invalid rating '{}'", row.rating))?
    };
    let skills = parse_skill_spec(&row.skills)?;

    Ok(CourseRecord {
        title: row.title,
        provider: if row.provider.is_empty() {
            "Unknown".to_string()
        } else {
            row.provider
        },
        domain: row.domain,
        format: row.format,
        level: row.level,
        duration_weeks,
        rating,
        description: row.description,
        skills,
    })
}

/// Parses `React:0-3;JavaScript:2-4`.
pub fn parse_skill_spec(raw: &str) -> Result<Vec<CourseSkill>, String> {
    let mut skills: Vec<CourseSkill> = Vec::new();

    for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, range) = part
            .rsplit_once(':')
            .ok_or_else(|| format!("skill entry '{part}' is not Name:min-max"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("skill entry '{part}' has no name"));
        }
        let (min, max) = range
            .split_once('-')
            .ok_or_else(|| format!("skill entry '{part}' has no level range"))?;
        let min_level = parse_level(min, part)?;
        let max_level_taught = parse_level(max, part)?;
        if min_level > max_level_taught {
            return Err(format!("skill entry '{part}' has min level above max level"));
        }
        if skills.iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
            return Err(format!("skill '{name}' listed twice"));
        }
        skills.push(CourseSkill {
            name: name.to_string(),
            min_level,
            max_level_taught,
        });
    }

    if skills.is_empty() {
        return Err("no skills listed".to_string());
    }
    Ok(skills)
}

fn parse_level(raw: &str, part: &str) -> Result<u8, String> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|l| *l <= MAX_SKILL_LEVEL)
        .ok_or_else(|| format!("skill entry '{part}' has level '{}' outside 0-{MAX_SKILL_LEVEL}", raw.trim()))
}
