//! Domain → required-skills table.
//!
//! Loaded from TOML so new domains need no code change. A default table ships
//! inside the binary; `DOMAIN_TABLE_PATH` replaces it wholesale.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::learner::{LearnerProfile, MAX_SKILL_LEVEL};

const BUILTIN_TABLE: &str = include_str!("../../data/domains.toml");

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RequiredSkill {
    pub name: String,
    pub level: u8,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DomainRequirements {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Declaration order is the tie-break order for equal deficits.
    pub skills: Vec<RequiredSkill>,
}

#[derive(Debug, Deserialize)]
struct DomainTableFile {
    #[serde(rename = "domain", default)]
    domains: Vec<DomainRequirements>,
}

#[derive(Debug, Clone, Default)]
pub struct DomainTable {
    domains: Vec<DomainRequirements>,
}

impl DomainTable {
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_TABLE).context("built-in domain table is invalid")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read domain table {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid domain table {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: DomainTableFile = toml::from_str(raw)?;
        Self::new(file.domains)
    }

    pub fn new(domains: Vec<DomainRequirements>) -> Result<Self> {
        for domain in &domains {
            if normalize(&domain.name).is_empty() {
                bail!("domain with empty name");
            }
            let mut seen = HashSet::new();
            for skill in &domain.skills {
                if skill.level > MAX_SKILL_LEVEL {
                    bail!(
                        "domain '{}': skill '{}' requires level {} (max {MAX_SKILL_LEVEL})",
                        domain.name,
                        skill.name,
                        skill.level
                    );
                }
                if !seen.insert(skill.name.to_lowercase()) {
                    bail!("domain '{}': duplicate skill '{}'", domain.name, skill.name);
                }
            }
        }
        Ok(DomainTable { domains })
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Finds the requirements for a learner.
    ///
    /// 1. exact name/alias match on `current_domain`, then `career_goal`
    /// 2. token-contiguous containment in either direction, same field order
    ///
    /// Returns `None` when nothing matches; callers fall back to the
    /// learner's own assessment.
    pub fn resolve(&self, profile: &LearnerProfile) -> Option<&DomainRequirements> {
        let keys = [
            normalize(&profile.current_domain),
            normalize(&profile.career_goal),
        ];

        for key in keys.iter().filter(|k| !k.is_empty()) {
            if let Some(domain) = self.domains.iter().find(|d| d.keys().any(|n| n == *key)) {
                return Some(domain);
            }
        }

        for key in keys.iter().filter(|k| !k.is_empty()) {
            let key_tokens: Vec<&str> = key.split('-').collect();
            let found = self.domains.iter().find(|d| {
                d.keys().any(|n| {
                    let name_tokens: Vec<&str> = n.split('-').collect();
                    contains_tokens(&key_tokens, &name_tokens)
                        || contains_tokens(&name_tokens, &key_tokens)
                })
            });
            if found.is_some() {
                return found;
            }
        }

        None
    }
}

impl DomainRequirements {
    fn keys(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(normalize(&self.name)).chain(self.aliases.iter().map(|a| normalize(a)))
    }
}

/// Lowercases, trims, and joins whitespace-separated words with `-`.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

fn contains_tokens(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(domain: &str, goal: &str) -> LearnerProfile {
        LearnerProfile {
            user_id: "user_1".to_string(),
            full_name: "Test User".to_string(),
            age: 22,
            education_level: "Bachelor's Degree".to_string(),
            current_domain: domain.to_string(),
            career_goal: goal.to_string(),
            experience_level: "intermediate".to_string(),
            learning_style: "video".to_string(),
            weekly_study_hours: 10,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn test_builtin_table_loads_all_domains() {
        let table = DomainTable::builtin().unwrap();
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn test_exact_match_after_normalization() {
        let table = DomainTable::builtin().unwrap();
        let d = table.resolve(&profile("  Web Development ", "")).unwrap();
        assert_eq!(d.name, "web-development");
    }

    #[test]
    fn test_alias_match() {
        let table = DomainTable::builtin().unwrap();
        let d = table.resolve(&profile("Cybersecurity", "")).unwrap();
        assert_eq!(d.name, "cybersecurity");
        let d = table.resolve(&profile("infosec", "")).unwrap();
        assert_eq!(d.name, "cybersecurity");
    }

    #[test]
    fn test_career_goal_used_when_domain_unknown() {
        let table = DomainTable::builtin().unwrap();
        let d = table
            .resolve(&profile("basket weaving", "Become a full stack developer"))
            .unwrap();
        assert_eq!(d.name, "web-development");
    }

    #[test]
    fn test_token_match_does_not_match_inside_words() {
        let table = DomainTable::builtin().unwrap();
        // "ux" must not match inside "linux"
        assert!(table.resolve(&profile("linux administration", "")).is_none());
    }

    #[test]
    fn test_unknown_domain_resolves_to_none() {
        let table = DomainTable::builtin().unwrap();
        assert!(table.resolve(&profile("culinary-arts", "chef")).is_none());
    }

    #[test]
    fn test_declared_skill_order_is_preserved() {
        let table = DomainTable::from_toml_str(
            r#"
            [[domain]]
            name = "web-development"
            skills = [
                { name = "CSS", level = 3 },
                { name = "Node.js", level = 3 },
                { name = "React", level = 4 },
            ]
            "#,
        )
        .unwrap();
        let d = table.resolve(&profile("web-development", "")).unwrap();
        let names: Vec<_> = d.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["CSS", "Node.js", "React"]);
    }

    #[test]
    fn test_level_above_max_rejected() {
        let err = DomainTable::from_toml_str(
            r#"
            [[domain]]
            name = "x"
            skills = [{ name = "A", level = 6 }]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("level 6"));
    }

    #[test]
    fn test_duplicate_skill_rejected() {
        let err = DomainTable::from_toml_str(
            r#"
            [[domain]]
            name = "x"
            skills = [{ name = "A", level = 1 }, { name = "a", level = 2 }]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains.toml");
        std::fs::write(
            &path,
            "[[domain]]\nname = \"gardening\"\nskills = [{ name = \"Botany\", level = 2 }]\n",
        )
        .unwrap();
        let table = DomainTable::load(&path).unwrap();
        assert_eq!(table.len(), 1);
    }
}
