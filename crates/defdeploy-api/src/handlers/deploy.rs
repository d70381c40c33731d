//! Definition deployment handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use defdeploy_core::error::AppError;
use defdeploy_core::types::Locale;
use defdeploy_service::DeploymentRequest;

use crate::dto::request::{DeployDefinitionsRequest, JobStatusRequest};
use crate::dto::response::{DeployDefinitionsResponse, DeploymentStatusResponse};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/deploy-definitions
///
/// The batch runs on its own task so a dropped connection cannot stop it
/// between categories.
pub async fn deploy_definitions(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<DeployDefinitionsRequest>,
) -> ApiResult<Json<DeployDefinitionsResponse>> {
    let locale = match req.locale.as_deref() {
        Some(tag) => Locale::new(tag),
        None => Locale::new(&state.config.deployment.default_locale),
    };
    let names = req.definition_types.into_names()?;
    let request = DeploymentRequest::from_names(&names, locale, req.publish_taxonomies);

    let handler = Arc::clone(&state.request_handler);
    let response = tokio::spawn(async move { handler.handle(request).await })
        .await
        .map_err(|e| AppError::internal(format!("Deployment task failed: {e}")))??;

    Ok(Json(DeployDefinitionsResponse {
        success: true,
        job_name: response.job_name,
    }))
}

/// POST /api/deploy-definitions/status
pub async fn deployment_status(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<JobStatusRequest>,
) -> ApiResult<Json<DeploymentStatusResponse>> {
    let status = state.request_handler.status(&req.job_name)?;

    Ok(Json(DeploymentStatusResponse {
        completed: status.completed,
    }))
}
