//! Taxonomy publishing job.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use defdeploy_core::traits::TaxonomyDeployer;
use defdeploy_jobs::{JobExecutionError, JobHandler};

/// Job type of the taxonomy publishing job.
pub const TAXONOMY_JOB_TYPE: &str = "deploy_taxonomies";

/// Arguments of the taxonomy publishing job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyJobArgs {
    /// Root item of the taxonomy tree to deploy.
    pub root_id: Uuid,
}

/// Runs a taxonomy deploy as a background job
#[derive(Debug)]
pub struct TaxonomyDeployJobHandler {
    /// Taxonomy publisher
    deployer: Arc<dyn TaxonomyDeployer>,
}

impl TaxonomyDeployJobHandler {
    /// Create a new taxonomy job handler
    pub fn new(deployer: Arc<dyn TaxonomyDeployer>) -> Self {
        Self { deployer }
    }
}

#[async_trait]
impl JobHandler for TaxonomyDeployJobHandler {
    fn job_type(&self) -> &str {
        TAXONOMY_JOB_TYPE
    }

    async fn execute(&self, args: &Value) -> Result<Option<Value>, JobExecutionError> {
        let args: TaxonomyJobArgs = serde_json::from_value(args.clone())
            .map_err(|e| JobExecutionError::InvalidArguments(e.to_string()))?;

        tracing::info!("Deploying all taxonomies from root {}", args.root_id);
        self.deployer.deploy(args.root_id).await?;
        tracing::debug!("All taxonomies were deployed");

        Ok(Some(serde_json::json!({ "rootId": args.root_id })))
    }
}
