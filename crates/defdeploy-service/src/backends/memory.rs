//! In-memory deployment backends that record what was deployed.

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use defdeploy_core::result::AppResult;
use defdeploy_core::traits::{DefinitionDeploymentBackend, TaxonomyDeployer};
use defdeploy_core::types::{DeploymentCategory, Locale};

/// Records every deploy-all call in arrival order.
#[derive(Debug, Default)]
pub struct InMemoryDefinitionStore {
    deployments: Mutex<Vec<(DeploymentCategory, Locale)>>,
}

impl InMemoryDefinitionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deployments recorded so far, oldest first.
    pub async fn deployments(&self) -> Vec<(DeploymentCategory, Locale)> {
        self.deployments.lock().await.clone()
    }
}

#[async_trait]
impl DefinitionDeploymentBackend for InMemoryDefinitionStore {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn deploy_all(&self, category: DeploymentCategory, locale: &Locale) -> AppResult<()> {
        self.deployments.lock().await.push((category, locale.clone()));
        Ok(())
    }
}

/// Records every deployed taxonomy root.
#[derive(Debug, Default)]
pub struct InMemoryTaxonomyStore {
    roots: Mutex<Vec<Uuid>>,
}

impl InMemoryTaxonomyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots deployed so far, oldest first.
    pub async fn deployed_roots(&self) -> Vec<Uuid> {
        self.roots.lock().await.clone()
    }
}

#[async_trait]
impl TaxonomyDeployer for InMemoryTaxonomyStore {
    async fn deploy(&self, root_id: Uuid) -> AppResult<()> {
        tracing::debug!("Deploying taxonomy root {}", root_id);
        self.roots.lock().await.push(root_id);
        Ok(())
    }
}
