use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Static liveness body; identical on every call.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "message": "Grader service is running"
    }))
}
