//! Path Builder: turns a ranked gap list into an ordered course sequence.
//!
//! Pluggable behind the `PathBuilder` trait; `AppState` holds an
//! `Arc<dyn PathBuilder>`. The default `RuleBasedPathBuilder` is deterministic
//! and explainable: every selection is recorded in the coverage list.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::course::CourseRecord;
use crate::models::path::{CoverageStatus, GapCoverage, SkillGap};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Used as a tie-break: matching formats are preferred.
    pub learning_style: String,
    /// `None` means no cap.
    pub max_courses: Option<usize>,
}

/// Courses in recommended study order plus one coverage entry per gap.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathPlan {
    pub courses: Vec<CourseRecord>,
    pub coverage: Vec<GapCoverage>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

pub trait PathBuilder: Send + Sync {
    fn build(&self, gaps: &[SkillGap], catalog: &[CourseRecord], options: &BuildOptions)
        -> PathPlan;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedPathBuilder
// ────────────────────────────────────────────────────────────────────────────

/// Greedy, gap-priority-ordered selection.
///
/// For each gap, in order:
/// 1. a course already selected that closes the gap → reuse it (full)
/// 2. otherwise, if under the cap, the best course that closes the gap in one
///    pass: `min_level ≤ current` and `max_level_taught ≥ required`, ranked by
///    smallest overshoot of `required`, shorter duration, learning-style match,
///    then title
/// 3. otherwise the course teaching the skill furthest (`max_level_taught`
///    highest) that still starts at or below the current level → partial.
///    An already-selected course that teaches as far is reused instead of
///    adding a new one; only already-selected courses are considered once
///    the cap is reached
/// 4. otherwise the gap is uncovered
pub struct RuleBasedPathBuilder;

impl PathBuilder for RuleBasedPathBuilder {
    fn build(
        &self,
        gaps: &[SkillGap],
        catalog: &[CourseRecord],
        options: &BuildOptions,
    ) -> PathPlan {
        build_path(gaps, catalog, options)
    }
}

fn build_path(gaps: &[SkillGap], catalog: &[CourseRecord], options: &BuildOptions) -> PathPlan {
    let mut selected: Vec<&CourseRecord> = Vec::new();
    let mut coverage = Vec::with_capacity(gaps.len());

    for gap in gaps {
        let at_cap = options
            .max_courses
            .is_some_and(|max| selected.len() >= max);

        if let Some(existing) = selected.iter().find(|c| closes_gap(c, gap)) {
            coverage.push(covered(gap, CoverageStatus::Full, existing, true));
            continue;
        }

        if !at_cap {
            if let Some(best) = best_full_match(gap, catalog.iter(), &options.learning_style) {
                coverage.push(covered(gap, CoverageStatus::Full, best, false));
                selected.push(best);
                continue;
            }
        }

        let existing = best_partial_match(gap, selected.iter().copied(), &options.learning_style);
        let partial = if at_cap {
            existing
        } else {
            let fresh = best_partial_match(gap, catalog.iter(), &options.learning_style);
            match (existing, fresh) {
                // an existing selection that teaches as far wins over a new course
                (Some(e), Some(f)) if max_taught(e, gap) >= max_taught(f, gap) => Some(e),
                (e, None) => e,
                (_, f) => f,
            }
        };

        match partial {
            Some(course) => {
                let reused = selected.iter().any(|c| c.title == course.title);
                coverage.push(covered(gap, CoverageStatus::Partial, course, reused));
                if !reused {
                    selected.push(course);
                }
            }
            None => coverage.push(GapCoverage {
                skill: gap.name.clone(),
                status: CoverageStatus::Uncovered,
                course_title: None,
                reused: false,
            }),
        }
    }

    PathPlan {
        courses: selected.into_iter().cloned().collect(),
        coverage,
    }
}

fn covered(
    gap: &SkillGap,
    status: CoverageStatus,
    course: &CourseRecord,
    reused: bool,
) -> GapCoverage {
    GapCoverage {
        skill: gap.name.clone(),
        status,
        course_title: Some(course.title.clone()),
        reused,
    }
}

/// The course can be started now and reaches the required level.
fn closes_gap(course: &CourseRecord, gap: &SkillGap) -> bool {
    course.teaches(&gap.name).is_some_and(|s| {
        s.min_level <= gap.current_level && s.max_level_taught >= gap.required_level
    })
}

/// The course can be started now and teaches beyond the current level.
fn advances_gap(course: &CourseRecord, gap: &SkillGap) -> bool {
    course.teaches(&gap.name).is_some_and(|s| {
        s.min_level <= gap.current_level && s.max_level_taught > gap.current_level
    })
}

fn best_full_match<'a>(
    gap: &SkillGap,
    candidates: impl Iterator<Item = &'a CourseRecord>,
    learning_style: &str,
) -> Option<&'a CourseRecord> {
    candidates
        .filter(|c| closes_gap(c, gap))
        .min_by(|a, b| {
            overshoot(a, gap)
                .cmp(&overshoot(b, gap))
                .then_with(|| secondary_order(a, b, learning_style))
        })
}

fn best_partial_match<'a>(
    gap: &SkillGap,
    candidates: impl Iterator<Item = &'a CourseRecord>,
    learning_style: &str,
) -> Option<&'a CourseRecord> {
    candidates
        .filter(|c| advances_gap(c, gap))
        .min_by(|a, b| {
            max_taught(b, gap)
                .cmp(&max_taught(a, gap))
                .then_with(|| secondary_order(a, b, learning_style))
        })
}

/// How far past the required level the course teaches.
fn overshoot(course: &CourseRecord, gap: &SkillGap) -> u8 {
    max_taught(course, gap).saturating_sub(gap.required_level)
}

fn max_taught(course: &CourseRecord, gap: &SkillGap) -> u8 {
    course
        .teaches(&gap.name)
        .map(|s| s.max_level_taught)
        .unwrap_or(0)
}

/// Shorter first, then style match first, then title.
fn secondary_order(a: &CourseRecord, b: &CourseRecord, learning_style: &str) -> Ordering {
    a.duration_weeks
        .cmp(&b.duration_weeks)
        .then_with(|| {
            b.matches_style(learning_style)
                .cmp(&a.matches_style(learning_style))
        })
        .then_with(|| a.title.cmp(&b.title))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::course::CourseSkill;
    use std::collections::HashSet;

    fn course(title: &str, weeks: u32, format: &str, skills: &[(&str, u8, u8)]) -> CourseRecord {
        CourseRecord {
            title: title.to_string(),
            provider: "Test".to_string(),
            domain: "web-development".to_string(),
            format: format.to_string(),
            level: "Beginner".to_string(),
            duration_weeks: weeks,
            rating: 4.5,
            description: String::new(),
            skills: skills
                .iter()
                .map(|(name, min, max)| CourseSkill {
                    name: name.to_string(),
                    min_level: *min,
                    max_level_taught: *max,
                })
                .collect(),
        }
    }

    fn gap(name: &str, current: u8, required: u8) -> SkillGap {
        SkillGap::between(name, current, required).unwrap()
    }

    fn options(style: &str, max: Option<usize>) -> BuildOptions {
        BuildOptions {
            learning_style: style.to_string(),
            max_courses: max,
        }
    }

    fn titles(plan: &PathPlan) -> Vec<&str> {
        plan.courses.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_prefers_closest_max_level() {
        let catalog = vec![
            course("Overkill", 2, "video", &[("CSS", 0, 5)]),
            course("Exact", 6, "video", &[("CSS", 0, 3)]),
            course("One Over", 4, "video", &[("CSS", 0, 4)]),
        ];
        let plan = build_path(&[gap("CSS", 0, 3)], &catalog, &options("video", None));
        assert_eq!(titles(&plan), vec!["Exact"]);
        assert_eq!(plan.coverage[0].status, CoverageStatus::Full);
    }

    #[test]
    fn test_one_level_over_beats_far_over() {
        let catalog = vec![
            course("Far Over", 1, "video", &[("CSS", 0, 5)]),
            course("One Over", 8, "video", &[("CSS", 0, 4)]),
        ];
        let plan = build_path(&[gap("CSS", 0, 3)], &catalog, &options("video", None));
        assert_eq!(titles(&plan), vec!["One Over"]);
    }

    #[test]
    fn test_course_must_start_at_or_below_current_level() {
        let catalog = vec![
            course("Too Advanced", 1, "video", &[("CSS", 2, 3)]),
            course("Accessible", 9, "video", &[("CSS", 0, 3)]),
        ];
        let plan = build_path(&[gap("CSS", 1, 3)], &catalog, &options("video", None));
        assert_eq!(titles(&plan), vec!["Accessible"]);
    }

    #[test]
    fn test_tie_break_order_duration_then_style_then_title() {
        let catalog = vec![
            course("B Reading", 4, "Reading", &[("CSS", 0, 3)]),
            course("A Reading", 4, "Reading", &[("CSS", 0, 3)]),
            course("C Video", 4, "Video Course", &[("CSS", 0, 3)]),
            course("D Long Video", 5, "Video Course", &[("CSS", 0, 3)]),
        ];
        let g = [gap("CSS", 0, 3)];

        // equal duration: style match wins
        let plan = build_path(&g, &catalog, &options("video", None));
        assert_eq!(titles(&plan), vec!["C Video"]);

        // no style match: lexicographic title
        let plan = build_path(&g, &catalog, &options("audio", None));
        assert_eq!(titles(&plan), vec!["A Reading"]);

        // shorter duration beats style
        let catalog = vec![
            course("Short Reading", 3, "Reading", &[("CSS", 0, 3)]),
            course("Long Video", 4, "Video", &[("CSS", 0, 3)]),
        ];
        let plan = build_path(&g, &catalog, &options("video", None));
        assert_eq!(titles(&plan), vec!["Short Reading"]);
    }

    #[test]
    fn test_partial_coverage_picks_highest_max() {
        let catalog = vec![
            course("Intro", 2, "video", &[("React", 0, 2)]),
            course("Intermediate", 5, "video", &[("React", 0, 3)]),
            course("Advanced Only", 3, "video", &[("React", 3, 5)]),
        ];
        let plan = build_path(&[gap("React", 0, 4)], &catalog, &options("video", None));
        assert_eq!(titles(&plan), vec!["Intermediate"]);
        assert_eq!(plan.coverage[0].status, CoverageStatus::Partial);
        assert_eq!(plan.coverage[0].course_title.as_deref(), Some("Intermediate"));
    }

    #[test]
    fn test_course_covering_two_gaps_selected_once() {
        let catalog = vec![
            course("Full Stack", 8, "video", &[("Node.js", 0, 3), ("JavaScript", 2, 4)]),
            course("JS Only", 2, "video", &[("JavaScript", 0, 4)]),
        ];
        let gaps = [gap("Node.js", 1, 3), gap("JavaScript", 3, 4)];
        let plan = build_path(&gaps, &catalog, &options("video", None));

        assert_eq!(titles(&plan), vec!["Full Stack"]);
        assert_eq!(plan.coverage[1].course_title.as_deref(), Some("Full Stack"));
        assert!(plan.coverage[1].reused);
        assert_eq!(plan.coverage[1].status, CoverageStatus::Full);
    }

    #[test]
    fn test_partial_reuses_existing_selection() {
        let catalog = vec![course(
            "Combo",
            4,
            "video",
            &[("CSS", 0, 3), ("HTML", 0, 2)],
        )];
        let gaps = [gap("CSS", 0, 3), gap("HTML", 0, 4)];
        let plan = build_path(&gaps, &catalog, &options("video", None));
        assert_eq!(titles(&plan), vec!["Combo"]);
        assert_eq!(plan.coverage[1].status, CoverageStatus::Partial);
        assert!(plan.coverage[1].reused);
    }

    #[test]
    fn test_partial_prefers_existing_selection_over_shorter_course() {
        let catalog = vec![
            course("Combo", 4, "video", &[("CSS", 0, 3), ("HTML", 0, 2)]),
            course("HTML Short", 1, "video", &[("HTML", 0, 2)]),
        ];
        let gaps = [gap("CSS", 0, 3), gap("HTML", 0, 4)];
        let plan = build_path(&gaps, &catalog, &options("video", None));

        assert_eq!(titles(&plan), vec!["Combo"]);
        assert_eq!(plan.coverage[1].status, CoverageStatus::Partial);
        assert_eq!(plan.coverage[1].course_title.as_deref(), Some("Combo"));
        assert!(plan.coverage[1].reused);
    }

    #[test]
    fn test_partial_takes_new_course_when_it_teaches_further() {
        let catalog = vec![
            course("Combo", 4, "video", &[("CSS", 0, 3), ("HTML", 0, 2)]),
            course("HTML Deep", 6, "video", &[("HTML", 0, 3)]),
        ];
        let gaps = [gap("CSS", 0, 3), gap("HTML", 0, 4)];
        let plan = build_path(&gaps, &catalog, &options("video", None));

        assert_eq!(titles(&plan), vec!["Combo", "HTML Deep"]);
        assert!(!plan.coverage[1].reused);
    }

    #[test]
    fn test_cap_limits_new_selections() {
        let catalog = vec![
            course("CSS 101", 2, "video", &[("CSS", 0, 3)]),
            course("Node 101", 2, "video", &[("Node.js", 0, 3)]),
            course("React 101", 2, "video", &[("React", 0, 4), ("CSS", 0, 3)]),
        ];
        let gaps = [gap("CSS", 0, 3), gap("Node.js", 1, 3), gap("React", 2, 4)];
        let plan = build_path(&gaps, &catalog, &options("video", Some(1)));

        assert_eq!(titles(&plan), vec!["CSS 101"]);
        assert_eq!(plan.coverage.len(), 3);
        assert_eq!(plan.coverage[1].status, CoverageStatus::Uncovered);
        assert_eq!(plan.coverage[2].status, CoverageStatus::Uncovered);
    }

    #[test]
    fn test_cap_still_links_existing_courses() {
        let catalog = vec![course(
            "Web Basics",
            6,
            "video",
            &[("HTML", 0, 3), ("CSS", 0, 3)],
        )];
        let gaps = [gap("HTML", 0, 3), gap("CSS", 0, 3)];
        let plan = build_path(&gaps, &catalog, &options("video", Some(1)));
        assert_eq!(titles(&plan), vec!["Web Basics"]);
        assert_eq!(plan.coverage[1].status, CoverageStatus::Full);
        assert!(plan.coverage[1].reused);
    }

    #[test]
    fn test_zero_cap_selects_nothing() {
        let catalog = vec![course("CSS 101", 2, "video", &[("CSS", 0, 3)])];
        let plan = build_path(&[gap("CSS", 0, 3)], &catalog, &options("video", Some(0)));
        assert!(plan.courses.is_empty());
        assert_eq!(plan.coverage[0].status, CoverageStatus::Uncovered);
    }

    #[test]
    fn test_no_matching_courses_is_empty_not_error() {
        let catalog = vec![course("Pottery", 2, "video", &[("Clay", 0, 3)])];
        let plan = build_path(&[gap("CSS", 0, 3)], &catalog, &options("video", None));
        assert!(plan.courses.is_empty());
        assert_eq!(plan.coverage[0].course_title, None);

        let plan = build_path(&[gap("CSS", 0, 3)], &[], &options("video", None));
        assert!(plan.courses.is_empty());
    }

    #[test]
    fn test_skill_names_match_case_insensitively() {
        let catalog = vec![course("Node Course", 3, "video", &[("node.js", 0, 3)])];
        let plan = build_path(&[gap("Node.js", 0, 3)], &catalog, &options("video", None));
        assert_eq!(titles(&plan), vec!["Node Course"]);
    }

    #[test]
    fn test_selection_order_follows_gap_priority_and_never_repeats() {
        let catalog = vec![
            course("A", 1, "video", &[("CSS", 0, 3), ("HTML", 0, 3), ("React", 0, 4)]),
            course("B", 2, "video", &[("Node.js", 0, 3)]),
            course("C", 3, "video", &[("React", 2, 4), ("Node.js", 0, 2)]),
            course("D", 1, "video", &[("JavaScript", 0, 2)]),
        ];
        let gaps = [
            gap("Node.js", 0, 3),
            gap("CSS", 0, 3),
            gap("React", 2, 4),
            gap("HTML", 0, 3),
            gap("JavaScript", 1, 4),
        ];
        let plan = build_path(&gaps, &catalog, &options("video", None));
        assert_eq!(titles(&plan), vec!["B", "A", "D"]);

        let unique: HashSet<_> = plan.courses.iter().map(|c| &c.title).collect();
        assert_eq!(unique.len(), plan.courses.len());
        assert_eq!(plan.coverage.len(), gaps.len());
    }

    #[test]
    fn test_rule_based_builder_via_trait() {
        let builder: Box<dyn PathBuilder> = Box::new(RuleBasedPathBuilder);
        let catalog = vec![course("CSS 101", 2, "video", &[("CSS", 0, 3)])];
        let plan = builder.build(&[gap("CSS", 0, 3)], &catalog, &BuildOptions::default());
        assert_eq!(plan.courses.len(), 1);
    }
}
