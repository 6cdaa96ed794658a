use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and store sizes.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "learnpath-api",
        "courses": state.catalog.len(),
        "learners": state.profiles.len()
    }))
}

/// GET /
/// Lists the available endpoints.
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "Personalized Learning Path Generator API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /register": "Register learner profile",
            "POST /assessment": "Submit skill assessment",
            "POST /generate-path": "Generate personalized learning path",
            "GET /dashboard/:user_id": "Get dashboard data",
            "POST /update-progress": "Update skill or course progress"
        }
    }))
}
