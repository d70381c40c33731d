//! Deployment backend traits for pluggable definition and taxonomy stores.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;
use crate::types::{DeploymentCategory, Locale};

/// Pushes every authored definition of a category into the runtime store.
///
/// Implementations exist for an in-memory recorder and a remote HTTP
/// deployment manager in `defdeploy-service`. A backend is assumed to
/// serialize its own writes; callers never run two deployments of one
/// request concurrently.
#[async_trait]
pub trait DefinitionDeploymentBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "memory", "http").
    fn backend_type(&self) -> &str;

    /// Deploy all definitions of `category` for `locale`.
    async fn deploy_all(&self, category: DeploymentCategory, locale: &Locale) -> AppResult<()>;
}

/// Publishes a taxonomy tree starting at a root item.
#[async_trait]
pub trait TaxonomyDeployer: Send + Sync + std::fmt::Debug + 'static {
    /// Deploy the taxonomy rooted at `root_id`.
    async fn deploy(&self, root_id: Uuid) -> AppResult<()>;
}
