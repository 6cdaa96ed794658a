pub mod course;
pub mod learner;
pub mod path;
pub mod progress;
