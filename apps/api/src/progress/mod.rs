// Progress tracking: merging learner-submitted updates and projecting the dashboard.

pub mod dashboard;
pub mod handlers;
pub mod merger;
