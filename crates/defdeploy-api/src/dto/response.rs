//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Deploy definitions response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployDefinitionsResponse {
    /// Always true; failures are reported through the error body.
    pub success: bool,
    /// Name of the taxonomy job, empty when none was started.
    pub job_name: String,
}

/// Deployment status response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeploymentStatusResponse {
    /// Whether the job has completed.
    pub completed: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Jobs currently held by the registry.
    pub registered_jobs: usize,
}
