//! Recording of completed assessments in the hosted backend.
//!
//! Routes:
//! - `POST /assessments` - score a combination and store its documentation
//! - `GET  /assessments` - list stored assessments
//!
//! Both answer 503 when no backend is configured.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::interactions::{render_documentation, InteractionReport, OverallRisk};
use crate::services::backend::BackendClient;
use super::interactions::{evaluate_request, AssessmentRequest};
use super::AppState;

/// Row written to the backend for each recorded assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub selected_drugs: Vec<String>,
    pub overall_risk: OverallRisk,
    pub risk_score: f64,
    pub contraindications_found: bool,
    pub interaction_count: usize,
    pub documentation: String,
    pub created_at: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn from_report(report: &InteractionReport, created_at: DateTime<Utc>) -> Self {
        Self {
            selected_drugs: report.selected_drugs.clone(),
            overall_risk: report.assessment.overall_risk,
            risk_score: report.assessment.risk_score,
            contraindications_found: report.assessment.contraindications_found,
            interaction_count: report.interaction_count,
            documentation: render_documentation(report),
            created_at,
        }
    }
}

/// Destination for recorded assessments
#[async_trait]
pub trait AssessmentRecorder {
    async fn record(&self, record: &AssessmentRecord) -> Result<Value, AppError>;

    async fn list(&self) -> Result<Vec<Value>, AppError>;
}

/// [`BackendClient`] bound to the collection assessments are stored in.
#[derive(Clone)]
pub struct BackendRecorder {
    client: BackendClient,
    collection: String,
}

impl BackendRecorder {
    pub fn new(client: BackendClient, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl AssessmentRecorder for BackendRecorder {
    async fn record(&self, record: &AssessmentRecord) -> Result<Value, AppError> {
        self.client.insert_row(&self.collection, record).await
    }

    async fn list(&self) -> Result<Vec<Value>, AppError> {
        self.client.list_rows(&self.collection).await
    }
}

fn recorder(state: &AppState) -> Result<&Arc<dyn AssessmentRecorder + Send + Sync>, AppError> {
    state
        .recorder
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("no assessment backend is configured".to_string()))
}

/// `POST /assessments`
pub async fn record_assessment(
    State(state): State<AppState>,
    Json(body): Json<AssessmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let recorder = recorder(&state)?;
    let report = evaluate_request(&state, &body)?;
    let record = AssessmentRecord::from_report(&report, Utc::now());

    let stored = recorder.record(&record).await.map_err(|err| {
        state.metrics.backend_errors_total.inc();
        err
    })?;

    tracing::info!(
        overall_risk = %record.overall_risk,
        drugs = record.selected_drugs.len(),
        "Assessment recorded"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /assessments`
pub async fn list_assessments(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let recorder = recorder(&state)?;
    let rows = recorder.list().await.map_err(|err| {
        state.metrics.backend_errors_total.inc();
        err
    })?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_state;
    use std::sync::Mutex as StdMutex;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
        routing::post,
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    #[derive(Default)]
    struct MemoryRecorder {
        rows: StdMutex<Vec<AssessmentRecord>>,
    }

    #[async_trait]
    impl AssessmentRecorder for MemoryRecorder {
        async fn record(&self, record: &AssessmentRecord) -> Result<Value, AppError> {
            let mut rows = self.rows.lock().expect("memory recorder lock poisoned");
            rows.push(record.clone());
            let mut stored = serde_json::to_value(record).map_err(|e| AppError::Parse(e.to_string()))?;
            stored["id"] = json!(rows.len());
            Ok(stored)
        }

        async fn list(&self) -> Result<Vec<Value>, AppError> {
            let rows = self.rows.lock().expect("memory recorder lock poisoned");
            rows.iter()
                .map(|row| serde_json::to_value(row).map_err(|e| AppError::Parse(e.to_string())))
                .collect()
        }
    }

    struct FailingRecorder;

    #[async_trait]
    impl AssessmentRecorder for FailingRecorder {
        async fn record(&self, _record: &AssessmentRecord) -> Result<Value, AppError> {
            Err(AppError::Network("backend down".to_string()))
        }

        async fn list(&self) -> Result<Vec<Value>, AppError> {
            Err(AppError::Network("backend down".to_string()))
        }
    }

    fn app(recorder: Option<Arc<dyn AssessmentRecorder + Send + Sync>>) -> Router {
        Router::new()
            .route("/assessments", post(record_assessment).get(list_assessments))
            .with_state(test_state(recorder))
    }

    fn post_assessment(drugs: &[&str]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/assessments")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "drugs": drugs }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn record_stores_documentation_and_returns_201() {
        let recorder = Arc::new(MemoryRecorder::default());
        let app = app(Some(recorder.clone()));

        let response = app
            .clone()
            .oneshot(post_assessment(&["warfarin", "fluconazole"]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let stored: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(stored["id"], 1);
        assert_eq!(stored["overallRisk"], "high");

        let rows = recorder.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].documentation.contains("Risk Level: HIGH"));
    }

    #[tokio::test]
    async fn list_returns_recorded_rows() {
        let recorder = Arc::new(MemoryRecorder::default());
        let app = app(Some(recorder));

        app.clone()
            .oneshot(post_assessment(&["ceftriaxone", "calcium"]))
            .await
            .unwrap();

        let response = app
            .oneshot(Request::builder().uri("/assessments").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let rows: Vec<AssessmentRecord> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].overall_risk, OverallRisk::Critical);
        assert!(rows[0].contraindications_found);
    }

    #[tokio::test]
    async fn insufficient_drugs_are_not_recorded() {
        let recorder = Arc::new(MemoryRecorder::default());
        let app = app(Some(recorder.clone()));

        let response = app.oneshot(post_assessment(&["warfarin"])).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(recorder.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_backend_is_503() {
        let response = app(None)
            .oneshot(post_assessment(&["warfarin", "fluconazole"]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn backend_failure_is_502() {
        let response = app(Some(Arc::new(FailingRecorder)))
            .oneshot(post_assessment(&["warfarin", "fluconazole"]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
