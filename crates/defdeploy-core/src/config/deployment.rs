//! Deployment backend configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Well-known identifier of the taxonomy root item.
pub const DEFAULT_TAXONOMY_ROOT_ID: Uuid = Uuid::from_u128(0x8f1e_4c2b_b2a1_4d0e_9c57_3a6e_1f0b_7d24);

/// Settings for the definition and taxonomy deployment backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Backend provider: `"memory"` or `"http"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Base URL of the remote deployment manager (required for `"http"`).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Timeout in seconds for a single backend call.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Locale used when a request does not specify one. Empty is invariant.
    #[serde(default)]
    pub default_locale: String,
    /// Site (execution context) recorded on started jobs.
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Root item deployed by the taxonomy job.
    #[serde(default = "default_taxonomy_root_id")]
    pub taxonomy_root_id: Uuid,
}

/// A checked backend provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentProvider<'a> {
    /// In-process stores.
    Memory,
    /// Remote deployment manager at `endpoint`.
    Http { endpoint: &'a str },
}

impl DeploymentConfig {
    /// Resolve the configured provider, rejecting unknown names and a
    /// missing or blank endpoint for `"http"`.
    pub fn provider_kind(&self) -> Result<DeploymentProvider<'_>, AppError> {
        match self.provider.as_str() {
            "memory" => Ok(DeploymentProvider::Memory),
            "http" => self
                .endpoint
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(|endpoint| DeploymentProvider::Http { endpoint })
                .ok_or_else(|| {
                    AppError::configuration(
                        "deployment.endpoint is required when deployment.provider = \"http\"",
                    )
                }),
            other => Err(AppError::configuration(format!(
                "Unknown deployment provider: '{other}'. Supported: memory, http"
            ))),
        }
    }
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: None,
            request_timeout_seconds: default_request_timeout(),
            default_locale: String::new(),
            site_name: default_site_name(),
            taxonomy_root_id: default_taxonomy_root_id(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_request_timeout() -> u64 {
    600
}

fn default_site_name() -> String {
    "shell".to_string()
}

fn default_taxonomy_root_id() -> Uuid {
    DEFAULT_TAXONOMY_ROOT_ID
}
