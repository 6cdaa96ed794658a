// Skill-gap analysis and learning-path construction.
// Both are pure functions over in-memory data; handlers own the locking.

pub mod gap_analysis;
pub mod handlers;
pub mod path_builder;
