mod jobs;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use dealscout_scraper::{JobError, Orchestrator};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// The job the error refers to; on `conflict`, the id of the job
    /// already running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        job_id: Option<Uuid>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                job_id,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "conflict" => StatusCode::CONFLICT,
            "not_ready" | "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps orchestrator errors onto the wire error envelope. The messages
/// are human-readable and never carry internals beyond the job id.
pub(super) fn map_job_error(request_id: String, error: &JobError) -> ApiError {
    match error {
        JobError::Conflict { job_id } => ApiError::new(
            request_id,
            "conflict",
            "a scraping job is already in progress",
            Some(*job_id),
        ),
        JobError::NotFound { job_id } => {
            ApiError::new(request_id, "not_found", "unknown job id", Some(*job_id))
        }
        JobError::NotReady { job_id, status } => ApiError::new(
            request_id,
            "not_ready",
            format!("job is {status}; results are not ready"),
            Some(*job_id),
        ),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/jobs", post(jobs::submit_job))
        .route("/api/v1/jobs/{job_id}", get(jobs::get_job_status))
        .route("/api/v1/jobs/{job_id}/deals", get(jobs::get_job_deals))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409_with_the_running_job_id() {
        let running = Uuid::new_v4();
        let api_error = map_job_error(
            "req-1".to_owned(),
            &JobError::Conflict { job_id: running },
        );
        assert_eq!(api_error.error.code, "conflict");
        assert_eq!(api_error.error.job_id, Some(running));
        let response = api_error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_maps_to_404() {
        let api_error = map_job_error(
            "req-1".to_owned(),
            &JobError::NotFound {
                job_id: Uuid::new_v4(),
            },
        );
        let response = api_error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_ready_maps_to_400_and_names_the_status() {
        let api_error = map_job_error(
            "req-1".to_owned(),
            &JobError::NotReady {
                job_id: Uuid::new_v4(),
                status: dealscout_core::JobStatus::Running,
            },
        );
        assert!(api_error.error.message.contains("running"));
        let response = api_error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_body_omits_job_id_when_absent() {
        let api_error = ApiError::new("req-1", "internal_error", "boom", None);
        let json = serde_json::to_string(&api_error).expect("serialize error");
        assert!(!json.contains("job_id"));
        assert!(json.contains("\"code\":\"internal_error\""));
    }
}
