//! In-memory Profile Store.
//!
//! Every learner's mutable state sits behind its own mutex. The outer map lock
//! is only held long enough to find or insert a learner, so operations on
//! different learners run in parallel while operations on the same learner
//! are serialized.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::learner::{LearnerProfile, NewLearner, SkillAssessment};
use crate::models::path::LearningPath;
use crate::models::progress::ProgressRecord;

/// Everything the service holds for one learner.
#[derive(Debug, Clone)]
pub struct LearnerRecord {
    pub profile: LearnerProfile,
    pub assessment: Option<SkillAssessment>,
    pub path: Option<LearningPath>,
    pub progress: ProgressRecord,
}

impl LearnerRecord {
    fn new(profile: LearnerProfile) -> Self {
        LearnerRecord {
            profile,
            assessment: None,
            path: None,
            progress: ProgressRecord::default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProfileStore {
    learners: RwLock<HashMap<String, Arc<Mutex<LearnerRecord>>>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a learner under a freshly generated id.
    pub fn register(&self, new_learner: NewLearner) -> LearnerProfile {
        let now = Utc::now();
        let mut learners = self.learners.write();

        let mut user_id = generate_learner_id(now);
        while learners.contains_key(&user_id) {
            user_id = generate_learner_id(now);
        }

        let profile = new_learner.into_profile(user_id.clone(), now);
        learners.insert(
            user_id,
            Arc::new(Mutex::new(LearnerRecord::new(profile.clone()))),
        );
        profile
    }

    /// Inserts a pre-built learner (sample data). Returns `false` and leaves
    /// the store untouched when the id is already taken.
    pub fn seed(&self, profile: LearnerProfile, assessment: Option<SkillAssessment>) -> bool {
        let mut learners = self.learners.write();
        if learners.contains_key(&profile.user_id) {
            return false;
        }
        let user_id = profile.user_id.clone();
        let mut record = LearnerRecord::new(profile);
        record.assessment = assessment;
        learners.insert(user_id, Arc::new(Mutex::new(record)));
        true
    }

    /// Runs `f` with exclusive access to one learner's record.
    pub fn with_learner<T>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut LearnerRecord) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let slot = self
            .learners
            .read()
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::UnknownLearner(user_id.to_string()))?;
        let mut record = slot.lock();
        f(&mut record)
    }

    pub fn len(&self) -> usize {
        self.learners.read().len()
    }
}

/// `user_<YYYYMMDDHHMMSS>_<8 hex>`: timestamp-derived, unique per call.
pub fn generate_learner_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("user_{}_{}", now.format("%Y%m%d%H%M%S"), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::learner::SkillRating;
    use std::collections::HashSet;

    fn new_learner() -> NewLearner {
        NewLearner {
            full_name: "Test User".to_string(),
            age: 22,
            education_level: "Bachelor's Degree".to_string(),
            current_domain: "web-development".to_string(),
            career_goal: "Become a full-stack developer".to_string(),
            experience_level: "intermediate".to_string(),
            learning_style: "video".to_string(),
            weekly_study_hours: 10,
        }
    }

    #[test]
    fn test_register_generates_unique_timestamped_ids() {
        let store = ProfileStore::new();
        let ids: HashSet<String> = (0..50)
            .map(|_| store.register(new_learner()).user_id)
            .collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(store.len(), 50);
        for id in &ids {
            assert!(id.starts_with("user_"));
            // user_ + 14 digit timestamp + _ + 8 hex
            assert_eq!(id.len(), 5 + 14 + 1 + 8);
        }
    }

    #[test]
    fn test_unknown_learner() {
        let store = ProfileStore::new();
        let err = store.with_learner("nobody", |_| Ok(())).unwrap_err();
        assert!(matches!(err, AppError::UnknownLearner(id) if id == "nobody"));
    }

    #[test]
    fn test_with_learner_mutates_record() {
        let store = ProfileStore::new();
        let profile = store.register(new_learner());
        store
            .with_learner(&profile.user_id, |rec| {
                rec.assessment = Some(SkillAssessment {
                    user_id: rec.profile.user_id.clone(),
                    skills: vec![SkillRating {
                        name: "CSS".to_string(),
                        level: 2,
                    }],
                    assessed_at: Utc::now(),
                });
                Ok(())
            })
            .unwrap();
        let total = store
            .with_learner(&profile.user_id, |rec| {
                Ok(rec.assessment.as_ref().map(|a| a.total_score()))
            })
            .unwrap();
        assert_eq!(total, Some(2));
    }

    #[test]
    fn test_seed_rejects_duplicate_id() {
        let store = ProfileStore::new();
        let profile = store.register(new_learner());
        assert!(!store.seed(profile.clone(), None));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_learner_updates_are_serialized() {
        let store = Arc::new(ProfileStore::new());
        let user_id = store.register(new_learner()).user_id;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let user_id = user_id.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..250 {
                    store
                        .with_learner(&user_id, |rec| {
                            // read-modify-write that would lose updates if interleaved
                            let current = rec.progress.course("counter");
                            rec.progress
                                .courses
                                .insert("counter".to_string(), current + 1.0);
                            Ok(())
                        })
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let count = store
            .with_learner(&user_id, |rec| Ok(rec.progress.course("counter")))
            .unwrap();
        assert_eq!(count, 2000.0);
    }
}
