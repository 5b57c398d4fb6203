use crate::AppState;
use axum::{Json, extract::State};
use chrono::Utc;

/// GET /health
/// Response: 200 OK with JSON
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mode = if state.demo_mode() { "demo" } else { "live" };

    Json(serde_json::json!({
      "status": "healthy",
      "mode": mode,
      "timestamp": Utc::now().timestamp()
    }))
}
