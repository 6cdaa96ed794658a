//! Gap Analyzer: compares assessed levels with the levels a learner's domain
//! requires and ranks the deficient skills.
//!
//! Ordering: deficit descending; equal deficits keep the domain table's
//! declared order (or assessment submission order in the fallback). The sort
//! is stable, so repeated runs on identical input give identical output.

use serde::{Deserialize, Serialize};

use crate::catalog::domains::{DomainRequirements, DomainTable};
use crate::errors::AppError;
use crate::models::learner::{LearnerProfile, SkillAssessment};
use crate::models::path::{GapSource, SkillGap};

/// Target level assumed for every assessed skill when the learner's domain
/// has no configured requirements.
pub const FALLBACK_REQUIRED_LEVEL: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GapAnalysis {
    pub gaps: Vec<SkillGap>,
    pub source: GapSource,
}

/// Fails with `NoAssessment` when nothing has been assessed yet, and with
/// `UnknownLearner` when the assessment belongs to someone else.
pub fn analyze(
    profile: &LearnerProfile,
    assessment: Option<&SkillAssessment>,
    table: &DomainTable,
) -> Result<GapAnalysis, AppError> {
    let assessment =
        assessment.ok_or_else(|| AppError::NoAssessment(profile.user_id.clone()))?;
    if assessment.user_id != profile.user_id {
        return Err(AppError::UnknownLearner(assessment.user_id.clone()));
    }

    let analysis = match table.resolve(profile) {
        Some(domain) => GapAnalysis {
            gaps: domain_gaps(domain, assessment),
            source: GapSource::DomainTable {
                domain: domain.name.clone(),
            },
        },
        None => GapAnalysis {
            gaps: fallback_gaps(assessment),
            source: GapSource::AssessmentFallback,
        },
    };
    Ok(analysis)
}

fn domain_gaps(domain: &DomainRequirements, assessment: &SkillAssessment) -> Vec<SkillGap> {
    let gaps = domain
        .skills
        .iter()
        .filter_map(|required| {
            let current = assessment.level_of(&required.name).unwrap_or(0);
            SkillGap::between(&required.name, current, required.level)
        })
        .collect();
    rank(gaps)
}

fn fallback_gaps(assessment: &SkillAssessment) -> Vec<SkillGap> {
    let gaps = assessment
        .skills
        .iter()
        .filter_map(|s| SkillGap::between(&s.name, s.level, FALLBACK_REQUIRED_LEVEL))
        .collect();
    rank(gaps)
}

fn rank(mut gaps: Vec<SkillGap>) -> Vec<SkillGap> {
    // sort_by is stable: ties keep their declared order
    gaps.sort_by(|a, b| b.deficit.cmp(&a.deficit));
    gaps
}
