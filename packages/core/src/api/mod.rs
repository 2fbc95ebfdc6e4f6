//! HTTP API
//!
//! The router is stateless apart from the shared, read-only scorer: every
//! request is scored independently.

pub mod assessments;
pub mod headers;
pub mod health;
pub mod interactions;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::interactions::InteractionRiskScorer;
use crate::metrics::AppMetrics;
use assessments::AssessmentRecorder;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<InteractionRiskScorer>,
    pub metrics: Arc<AppMetrics>,
    pub recorder: Option<Arc<dyn AssessmentRecorder + Send + Sync>>,
}

/// Assemble the full application router.
pub fn create_router(state: AppState) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(render_metrics))
        .route("/interactions", get(interactions::list_interactions))
        .route("/interactions/assess", post(interactions::assess))
        .route("/interactions/documentation", post(interactions::documentation))
        .route("/drugs", get(interactions::known_drugs))
        .route(
            "/assessments",
            post(assessments::record_assessment).get(assessments::list_assessments),
        )
        .layer(middleware::from_fn_with_state(metrics, track_http_metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /metrics` in Prometheus text exposition format.
async fn render_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
            .body(Body::from(body))
            .expect("metrics response should be valid"),
        Err(err) => {
            tracing::error!("Failed to render metrics: {}", err);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::from("metrics error"))
                .expect("metrics error response should be valid")
        }
    }
}

/// Count and time every request, labelled by its route template.
async fn track_http_metrics(
    State(metrics): State<Arc<AppMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    metrics
        .http_requests_total
        .with_label_values(&[method.as_str(), path.as_str(), response.status().as_str()])
        .inc();
    metrics
        .http_request_duration
        .observe(started.elapsed().as_secs_f64());

    response
}
