//! Deployment backends and provider selection.

pub mod http;
pub mod memory;

use std::sync::Arc;

use tracing::info;

use defdeploy_core::config::{DeploymentConfig, DeploymentProvider};
use defdeploy_core::result::AppResult;
use defdeploy_core::traits::TaxonomyDeployer;

use crate::deployer::DeploymentBackends;

pub use http::{HttpDeploymentBackend, HttpTaxonomyDeployer};
pub use memory::{InMemoryDefinitionStore, InMemoryTaxonomyStore};

/// The definition and taxonomy backends selected by configuration.
#[derive(Debug, Clone)]
pub struct Backends {
    /// Per-category definition backends.
    pub definitions: DeploymentBackends,
    /// Taxonomy publisher used by the taxonomy job.
    pub taxonomy: Arc<dyn TaxonomyDeployer>,
}

impl Backends {
    /// Build the backends for the configured provider.
    pub fn from_config(config: &DeploymentConfig) -> AppResult<Self> {
        match config.provider_kind()? {
            DeploymentProvider::Memory => {
                info!("Initializing in-memory deployment backends");
                Ok(Self {
                    definitions: DeploymentBackends::uniform(Arc::new(
                        InMemoryDefinitionStore::new(),
                    )),
                    taxonomy: Arc::new(InMemoryTaxonomyStore::new()),
                })
            }
            DeploymentProvider::Http { endpoint } => {
                info!("Initializing HTTP deployment backends ({})", endpoint);
                Ok(Self {
                    definitions: DeploymentBackends::uniform(Arc::new(
                        HttpDeploymentBackend::new(endpoint, config.request_timeout_seconds)?,
                    )),
                    taxonomy: Arc::new(HttpTaxonomyDeployer::new(
                        endpoint,
                        config.request_timeout_seconds,
                    )?),
                })
            }
        }
    }
}
