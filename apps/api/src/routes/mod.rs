pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::learners::handlers as learners;
use crate::pathing::handlers as pathing;
use crate::progress::handlers as progress;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index_handler))
        .route("/health", get(health::health_handler))
        // Learners
        .route("/register", post(learners::handle_register))
        .route("/assessment", post(learners::handle_assessment))
        // Paths
        .route("/generate-path", post(pathing::handle_generate_path))
        // Progress
        .route("/dashboard/:user_id", get(progress::handle_dashboard))
        .route("/update-progress", post(progress::handle_update_progress))
        .with_state(state)
}
