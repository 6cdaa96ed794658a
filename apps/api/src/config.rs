use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub catalog_path: PathBuf,
    pub profiles_path: PathBuf,
    /// When unset, the compiled-in domain table is used.
    pub domain_table_path: Option<PathBuf>,
    /// Cap on courses per generated path. `None` means unbounded.
    pub max_path_courses: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            catalog_path: std::env::var("CATALOG_PATH")
                .unwrap_or_else(|_| "data/courses.csv".to_string())
                .into(),
            profiles_path: std::env::var("PROFILES_PATH")
                .unwrap_or_else(|_| "data/students.csv".to_string())
                .into(),
            domain_table_path: optional_env("DOMAIN_TABLE_PATH").map(PathBuf::from),
            max_path_courses: optional_env("MAX_PATH_COURSES")
                .map(|v| {
                    v.parse::<usize>()
                        .context("MAX_PATH_COURSES must be a non-negative integer")
                })
                .transpose()?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
