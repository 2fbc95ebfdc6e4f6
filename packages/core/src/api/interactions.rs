//! Interaction scoring and catalog endpoints
//!
//! Routes:
//! - `POST /interactions/assess`        - score a drug combination (JSON report)
//! - `POST /interactions/documentation` - same, rendered as the plain-text block
//! - `GET  /interactions?drug=NAME`     - catalog records involving a drug
//! - `GET  /drugs`                      - every drug name the catalog knows

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::interactions::{
    render_documentation, InteractionRecord, InteractionReport, PatientFactors, ScoringError,
    SelectedDrugs,
};
use super::headers::{conditional_json, CachePolicy};
use super::AppState;

/// The catalog never changes while the process runs.
const CATALOG_CACHE: CachePolicy = CachePolicy {
    max_age: 300,
    stale_while_revalidate: 600,
};

/// Body shared by every endpoint that scores a combination
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub drugs: Vec<String>,
    #[serde(default)]
    pub patient_factors: Option<PatientFactors>,
}

#[derive(Debug, Deserialize)]
pub struct InteractionsQuery {
    pub drug: Option<String>,
}

/// Validate the selection and score it.
///
/// Fewer than two distinct drugs never reaches the scorer; the caller gets
/// an `InsufficientDrugs` error to show instead of a score.
pub fn evaluate_request(state: &AppState, request: &AssessmentRequest) -> Result<InteractionReport, AppError> {
    let selected = SelectedDrugs::new(&request.drugs).map_err(|err| {
        if matches!(err, ScoringError::InsufficientDrugs { .. }) {
            state.metrics.insufficient_input_total.inc();
        }
        err
    })?;

    let report = state
        .scorer
        .evaluate(&selected, request.patient_factors.as_ref());
    state.metrics.record_assessment(&report);
    Ok(report)
}

/// `POST /interactions/assess`
pub async fn assess(
    State(state): State<AppState>,
    Json(body): Json<AssessmentRequest>,
) -> Result<Json<InteractionReport>, AppError> {
    let report = evaluate_request(&state, &body)?;
    Ok(Json(report))
}

/// `POST /interactions/documentation`
pub async fn documentation(
    State(state): State<AppState>,
    Json(body): Json<AssessmentRequest>,
) -> Result<Response, AppError> {
    let report = evaluate_request(&state, &body)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_documentation(&report),
    )
        .into_response())
}

/// `GET /interactions` - all records, or only those naming `drug`.
pub async fn list_interactions(
    State(state): State<AppState>,
    Query(params): Query<InteractionsQuery>,
    request_headers: HeaderMap,
) -> Result<Response, AppError> {
    let database = state.scorer.database();
    let records: Vec<&InteractionRecord> = match params.drug.as_deref() {
        Some(drug) if !drug.trim().is_empty() => database.interactions_for(drug),
        _ => database.records().iter().collect(),
    };

    let body = serde_json::to_vec(&records).map_err(|err| AppError::Parse(err.to_string()))?;
    Ok(conditional_json(
        &request_headers,
        body,
        CATALOG_CACHE,
        database.loaded_at(),
    ))
}

/// `GET /drugs`
pub async fn known_drugs(
    State(state): State<AppState>,
    request_headers: HeaderMap,
) -> Result<Response, AppError> {
    let database = state.scorer.database();
    let body = serde_json::to_vec(&database.known_drugs())
        .map_err(|err| AppError::Parse(err.to_string()))?;
    Ok(conditional_json(
        &request_headers,
        body,
        CATALOG_CACHE,
        database.loaded_at(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_state;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/interactions", get(list_interactions))
            .route("/interactions/assess", post(assess))
            .route("/interactions/documentation", post(documentation))
            .route("/drugs", get(known_drugs))
            .with_state(test_state(None))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn assess_returns_report_for_known_pair() {
        let response = app()
            .oneshot(post_json(
                "/interactions/assess",
                json!({ "drugs": ["warfarin", "fluconazole"] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["assessment"]["overallRisk"], "high");
        assert_eq!(json["assessment"]["riskScore"], 60.0);
        assert_eq!(json["interactionCount"], 1);
        assert_eq!(json["interactions"][0]["severity"], "major");
    }

    #[tokio::test]
    async fn assess_applies_patient_factors() {
        let response = app()
            .oneshot(post_json(
                "/interactions/assess",
                json!({
                    "drugs": ["warfarin", "fluconazole"],
                    "patientFactors": { "age": 70, "renalFunction": "severe", "pregnancy": true }
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["assessment"]["overallRisk"], "critical");
        assert_eq!(json["assessment"]["riskScore"], 100.0);
        assert!(json["rawScore"].as_f64().unwrap() > 100.0);
    }

    #[tokio::test]
    async fn assess_with_single_drug_is_422() {
        let response = app()
            .oneshot(post_json("/interactions/assess", json!({ "drugs": ["warfarin"] })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_body(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("at least two distinct medications"));
    }

    #[tokio::test]
    async fn documentation_is_plain_text() {
        let response = app()
            .oneshot(post_json(
                "/interactions/documentation",
                json!({ "drugs": ["ceftriaxone", "calcium"] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("Selected Medications: ceftriaxone, calcium"));
        assert!(text.contains("Risk Level: CRITICAL"));
        assert!(text.contains("Risk Score: 100/100"));
        assert!(text.contains("WARNING: CONTRAINDICATED COMBINATION DETECTED"));
    }

    #[tokio::test]
    async fn documentation_score_matches_report_score() {
        let body = json!({
            "drugs": ["linezolid", "sertraline"],
            "patientFactors": { "hepaticFunction": "mild" }
        });

        let assessed = app()
            .oneshot(post_json("/interactions/assess", body.clone()))
            .await
            .unwrap();
        let json = json_body(assessed).await;
        assert_eq!(json["assessment"]["riskScore"], 62.5);

        let documented = app()
            .oneshot(post_json("/interactions/documentation", body))
            .await
            .unwrap();
        let bytes = to_bytes(documented.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("Risk Score: 62.5/100"));
    }

    #[tokio::test]
    async fn fractional_age_over_threshold_is_elderly() {
        let response = app()
            .oneshot(post_json(
                "/interactions/assess",
                json!({
                    "drugs": ["warfarin", "fluconazole"],
                    "patientFactors": { "age": 65.5 }
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        // 60 * 1.15
        let raw = json["rawScore"].as_f64().unwrap();
        assert!((raw - 69.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn list_interactions_filters_by_drug() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/interactions?drug=Gentamicin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r["drugA"] == "gentamicin" || r["drugB"] == "gentamicin"));
    }

    #[tokio::test]
    async fn known_drugs_honours_if_none_match() {
        let first = app()
            .oneshot(Request::builder().uri("/drugs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let etag = first
            .headers()
            .get("etag")
            .expect("missing etag header")
            .to_str()
            .unwrap()
            .to_string();
        let json = json_body(first).await;
        assert!(json
            .as_array()
            .unwrap()
            .iter()
            .any(|name| name == "warfarin"));

        let second = app()
            .oneshot(
                Request::builder()
                    .uri("/drugs")
                    .header("if-none-match", etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }
}
