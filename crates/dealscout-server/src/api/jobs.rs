use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dealscout_core::{DealRecord, Job, JobStatus};

use crate::middleware::RequestId;

use super::{map_job_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SubmitJobRequest {
    /// Cap on successfully extracted cards. Absent means "as many as the
    /// server allows"; the orchestrator clamps to its configured maximum.
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct SubmitJobData {
    job_id: Uuid,
    status: JobStatus,
}

#[derive(Debug, Serialize)]
pub(super) struct JobDealsData {
    job_id: Uuid,
    total: usize,
    deals: Vec<DealRecord>,
}

/// `POST /api/v1/jobs`: starts a scraping job and returns immediately.
pub(super) async fn submit_job(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SubmitJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = body.limit.unwrap_or(u32::MAX);
    let job_id = state
        .orchestrator
        .submit(limit)
        .map_err(|e| map_job_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: SubmitJobData {
                job_id,
                status: JobStatus::Running,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// `GET /api/v1/jobs/{job_id}`: current status and counters.
pub(super) async fn get_job_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Job>>, ApiError> {
    let job = state
        .orchestrator
        .status(job_id)
        .map_err(|e| map_job_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: job,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/jobs/{job_id}/deals`: the completed job's deal sequence.
pub(super) async fn get_job_deals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ApiResponse<JobDealsData>>, ApiError> {
    let deals = state
        .orchestrator
        .results(job_id)
        .map_err(|e| map_job_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: JobDealsData {
            job_id,
            total: deals.len(),
            deals,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_limit_is_optional() {
        let body: SubmitJobRequest = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(body.limit, None);

        let body: SubmitJobRequest =
            serde_json::from_str(r#"{"limit": 25}"#).expect("deserialize");
        assert_eq!(body.limit, Some(25));
    }

    #[test]
    fn submit_data_serializes_job_id_and_status() {
        let data = SubmitJobData {
            job_id: Uuid::new_v4(),
            status: JobStatus::Running,
        };
        let json = serde_json::to_string(&data).expect("serialize");
        assert!(json.contains("\"status\":\"running\""));
        assert!(json.contains("\"job_id\""));
    }

    #[test]
    fn deals_payload_reports_the_record_count() {
        let data = JobDealsData {
            job_id: Uuid::new_v4(),
            total: 0,
            deals: Vec::new(),
        };
        let json = serde_json::to_string(&data).expect("serialize");
        assert!(json.contains("\"total\":0"));
        assert!(json.contains("\"deals\":[]"));
    }
}
