use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::AppState;

/// Liveness plus a summary of what the scorer was loaded with.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let scorer = &state.scorer;
    (
        [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        Json(json!({
            "status": "ok",
            "interactionsLoaded": scorer.database().len(),
            "evidenceWeighting": scorer.config().evidence_weighting.as_str(),
            "backendConfigured": state.recorder.is_some(),
        })),
    )
}
