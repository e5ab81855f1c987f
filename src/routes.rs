//! HTTP surface for the scholarship core.

use crate::agents::{self, TrustedAgentView};
use crate::applications::{ApplicationTracker, ApplicationView};
use crate::error::AppError;
use crate::matching::{MatchEngine, MatchOutcome};
use crate::prep;
use crate::recommendations::RecommendationRecorder;
use crate::store::{ApplicationStatus, PrepQuestion, RecordStore, StudentProfile};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub engine: Arc<MatchEngine>,
    pub tracker: Arc<ApplicationTracker>,
    pub recorder: Arc<RecommendationRecorder>,
    pub readiness: Arc<AtomicBool>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>, metrics: PrometheusHandle) -> Self {
        Self {
            engine: Arc::new(MatchEngine::default()),
            tracker: Arc::new(ApplicationTracker::new(store.clone())),
            recorder: Arc::new(RecommendationRecorder::new(store.clone())),
            readiness: Arc::new(AtomicBool::new(false)),
            metrics,
            store,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationRequest {
    pub(crate) profile: StudentProfile,
    #[serde(default)]
    pub(crate) profile_id: Option<String>,
    /// When set alongside `profile_id`, the shortlist is appended to the
    /// recommendation log before responding.
    #[serde(default)]
    pub(crate) save: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationRequest {
    pub(crate) profile_id: String,
    pub(crate) scholarship_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationUpdateRequest {
    pub(crate) application_id: String,
    pub(crate) status: ApplicationStatus,
    #[serde(default)]
    pub(crate) notes: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PrepParams {
    pub(crate) category: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/recommendations", post(recommendations_endpoint))
        .route(
            "/api/v1/applications",
            post(add_application_endpoint).put(update_application_endpoint),
        )
        .route(
            "/api/v1/applications/:profile_id",
            get(list_applications_endpoint),
        )
        .route("/api/v1/agents/trusted", get(trusted_agents_endpoint))
        .route("/api/v1/interview-prep", get(interview_prep_endpoint))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn recommendations_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<RecommendationRequest>,
) -> Result<Json<MatchOutcome>, AppError> {
    let catalog = state.store.scholarships();
    let outcome = state.engine.score(&payload.profile, &catalog);

    if payload.save {
        match payload.profile_id.as_deref() {
            Some(profile_id) => state.recorder.record(profile_id, &outcome.matches)?,
            None => warn!("save requested without a profile_id; skipping recommendation log"),
        }
    }

    Ok(Json(outcome))
}

pub(crate) async fn add_application_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<ApplicationRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .tracker
        .add(&payload.profile_id, &payload.scholarship_id)?;
    Ok(Json(json!({ "message": outcome.message() })))
}

pub(crate) async fn list_applications_endpoint(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Json<Vec<ApplicationView>> {
    Json(state.tracker.list(&profile_id))
}

pub(crate) async fn update_application_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<ApplicationUpdateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .tracker
        .update(&payload.application_id, payload.status, &payload.notes)?;
    Ok(Json(json!({ "message": "Updated successfully" })))
}

pub(crate) async fn trusted_agents_endpoint(
    State(state): State<AppState>,
) -> Json<Vec<TrustedAgentView>> {
    Json(agents::trusted_agents(&state.store))
}

pub(crate) async fn interview_prep_endpoint(
    State(state): State<AppState>,
    Query(params): Query<PrepParams>,
) -> Json<Vec<PrepQuestion>> {
    Json(prep::prep_questions(&state.store, params.category.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new()
            .build_recorder();
        let handle = recorder.handle();
        AppState::new(Arc::new(RecordStore::load(dir.path())), handle)
    }

    fn seed_scholarships(dir: &tempfile::TempDir) {
        std::fs::write(
            dir.path().join("scholarships.csv"),
            "Scholarship_ID,Scholarship_Name,Country,Degree_Level,Field,Funding_Type,Deadline,Min_CGPA,IELTS_Required,Min_IELTS_Band\n\
             SCH-001,Chevening,UK,Masters,Computer Science,Fully Funded,Open,3.5,Yes,6.5\n",
        )
        .expect("fixture written");
    }

    #[tokio::test]
    async fn recommendations_endpoint_scores_the_catalog() {
        let dir = tempfile::tempdir().expect("temp dir");
        seed_scholarships(&dir);
        let app = router(test_state(&dir));

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/recommendations")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{
                    "profile": {
                        "target_degree": "Masters",
                        "field_of_study": "Computer Science",
                        "preferred_countries": "Any",
                        "cgpa": 3.8,
                        "ielts_band": 7.0
                    }
                }"#,
            ))
            .expect("request builds");

        let response = app.oneshot(request).await.expect("handler responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("body is json");
        assert_eq!(body["matches"][0]["score"], 110);
        assert_eq!(body["matches"][0]["eligible"], true);
        assert_eq!(body["stats"]["rejected_degree"], 0);
    }

    #[tokio::test]
    async fn update_of_unknown_application_returns_404() {
        let dir = tempfile::tempdir().expect("temp dir");
        let app = router(test_state(&dir));

        let request = Request::builder()
            .method("PUT")
            .uri("/api/v1/applications")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{ "application_id": "does-not-exist", "status": "Applied", "notes": "" }"#,
            ))
            .expect("request builds");

        let response = app.oneshot(request).await.expect("handler responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }
}
