//! Job introspection handlers.

use axum::Json;
use axum::extract::{Path, State};

use defdeploy_jobs::JobSummary;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/jobs
pub async fn list_jobs(State(state): State<AppState>) -> Json<ApiResponse<Vec<JobSummary>>> {
    Json(ApiResponse::ok(state.registry.list()))
}

/// GET /api/jobs/{name}
pub async fn get_job(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<JobSummary>>> {
    let job = state.registry.get(&name)?;
    Ok(Json(ApiResponse::ok(job.summary())))
}
