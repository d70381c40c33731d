//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use defdeploy_core::config::AppConfig;
use defdeploy_jobs::JobRegistry;
use defdeploy_service::DeploymentRequestHandler;

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Registry of started jobs.
    pub registry: Arc<JobRegistry>,
    /// Deploy request orchestration.
    pub request_handler: Arc<DeploymentRequestHandler>,
    /// Process start time.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build state around a request handler; the registry is taken from it.
    pub fn new(config: AppConfig, request_handler: DeploymentRequestHandler) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::clone(request_handler.registry()),
            request_handler: Arc::new(request_handler),
            started_at: Utc::now(),
        }
    }
}
