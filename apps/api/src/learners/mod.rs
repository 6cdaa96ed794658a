// Learner profiles, assessments and per-learner mutable state.

pub mod handlers;
pub mod ingest;
pub mod store;
pub mod validation;
