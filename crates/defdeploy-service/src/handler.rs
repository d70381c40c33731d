//! Deploy request orchestration and job status polling.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use defdeploy_core::config::AppConfig;
use defdeploy_core::result::AppResult;
use defdeploy_core::traits::{VisitTracker, cancel_active_page};
use defdeploy_core::types::{DeploymentCategory, Locale};
use defdeploy_jobs::{JobDescriptor, JobHandle, JobHandler, JobRegistry};

use crate::deployer::{DefinitionDeployer, parse_categories};
use crate::taxonomy::TaxonomyJobArgs;

/// One deploy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// Categories to deploy, in order.
    pub categories: Vec<DeploymentCategory>,
    /// Locale of the deploy calls.
    pub locale: Locale,
    /// Whether to start the taxonomy publishing job afterwards.
    pub publish_taxonomies: bool,
}

impl DeploymentRequest {
    /// Build a request from raw category names; unknown names are skipped.
    pub fn from_names<S: AsRef<str>>(names: &[S], locale: Locale, publish_taxonomies: bool) -> Self {
        Self {
            categories: parse_categories(names),
            locale,
            publish_taxonomies,
        }
    }
}

/// Result of a deploy request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResponse {
    /// Name of the started taxonomy job, empty when none was started.
    pub job_name: String,
    /// Categories that were deployed.
    pub deployed: Vec<DeploymentCategory>,
}

/// Completion of a started job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStatus {
    /// Whether the job's handler has returned.
    pub completed: bool,
}

/// Identity and target settings applied to started jobs.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    /// Agent recorded on started jobs.
    pub agent: String,
    /// Site recorded on started jobs.
    pub site_name: String,
    /// Root item deployed by the taxonomy job.
    pub taxonomy_root_id: Uuid,
}

impl HandlerSettings {
    /// Settings taken from the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            agent: config.jobs.agent.clone(),
            site_name: config.deployment.site_name.clone(),
            taxonomy_root_id: config.deployment.taxonomy_root_id,
        }
    }
}

/// Orchestrates deploy requests.
#[derive(Debug, Clone)]
pub struct DeploymentRequestHandler {
    /// Category dispatcher.
    deployer: Arc<DefinitionDeployer>,
    /// Job registry shared with the status endpoint.
    registry: Arc<JobRegistry>,
    /// Target of the taxonomy job.
    taxonomy_job: Arc<dyn JobHandler>,
    /// Visit-tracking session of the request context.
    tracker: Arc<dyn VisitTracker>,
    /// Job identity settings.
    settings: HandlerSettings,
}

impl DeploymentRequestHandler {
    /// Creates a new request handler.
    pub fn new(
        deployer: Arc<DefinitionDeployer>,
        registry: Arc<JobRegistry>,
        taxonomy_job: Arc<dyn JobHandler>,
        tracker: Arc<dyn VisitTracker>,
        settings: HandlerSettings,
    ) -> Self {
        Self {
            deployer,
            registry,
            taxonomy_job,
            tracker,
            settings,
        }
    }

    /// The job registry this handler starts jobs in.
    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Deploy the requested categories in order, then optionally start
    /// the taxonomy job.
    ///
    /// The first failing category aborts the rest of the batch and fails
    /// the request; categories deployed before it stay deployed.
    pub async fn handle(&self, request: DeploymentRequest) -> AppResult<DeploymentResponse> {
        cancel_active_page(self.tracker.as_ref());

        tracing::info!(
            categories = request.categories.len(),
            locale = %request.locale,
            publish_taxonomies = request.publish_taxonomies,
            "Deploying marketing definitions"
        );

        let report = self
            .deployer
            .deploy_categories(&request.categories, &request.locale)
            .await?;

        let job_name = if request.publish_taxonomies {
            self.start_taxonomy_job()?.name().to_string()
        } else {
            String::new()
        };

        Ok(DeploymentResponse {
            job_name,
            deployed: report.deployed,
        })
    }

    /// Report whether the named job has completed.
    pub fn status(&self, job_name: &str) -> AppResult<DeploymentStatus> {
        cancel_active_page(self.tracker.as_ref());

        let job = self.registry.get(job_name)?;
        let completed = self.registry.is_done(&job);
        if completed {
            tracing::debug!(job = %job_name, "All taxonomies were deployed");
        }

        Ok(DeploymentStatus { completed })
    }

    /// Start the taxonomy job for the configured site.
    pub fn start_taxonomy_job(&self) -> AppResult<JobHandle> {
        self.start_taxonomy_job_for_site(&self.settings.site_name)
    }

    /// Start the taxonomy job on behalf of `site_name`.
    pub fn start_taxonomy_job_for_site(&self, site_name: &str) -> AppResult<JobHandle> {
        let args = serde_json::to_value(TaxonomyJobArgs {
            root_id: self.settings.taxonomy_root_id,
        })?;

        let descriptor = JobDescriptor {
            name: format!(
                "Deploy all taxonomies. Deployment job id: {}.",
                Uuid::new_v4()
            ),
            agent: self.settings.agent.clone(),
            site: site_name.to_string(),
            handler: Arc::clone(&self.taxonomy_job),
            args,
        };

        tracing::debug!("Starting a job to deploy all taxonomies");
        self.registry.start(descriptor)
    }
}
