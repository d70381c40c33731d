//! Definition deployment dispatch.

use std::sync::Arc;

use defdeploy_core::error::AppError;
use defdeploy_core::result::AppResult;
use defdeploy_core::traits::DefinitionDeploymentBackend;
use defdeploy_core::types::{DeploymentCategory, Locale};

/// One backend slot per definition category.
///
/// Lookups go through an exhaustive `match`, so adding a category without
/// a slot is a compile error.
#[derive(Debug, Clone)]
pub struct DeploymentBackends {
    automation_plans: Arc<dyn DefinitionDeploymentBackend>,
    campaigns: Arc<dyn DefinitionDeploymentBackend>,
    events: Arc<dyn DefinitionDeploymentBackend>,
    funnels: Arc<dyn DefinitionDeploymentBackend>,
    goals: Arc<dyn DefinitionDeploymentBackend>,
    marketing_assets: Arc<dyn DefinitionDeploymentBackend>,
    outcomes: Arc<dyn DefinitionDeploymentBackend>,
    page_events: Arc<dyn DefinitionDeploymentBackend>,
    profiles: Arc<dyn DefinitionDeploymentBackend>,
    segments: Arc<dyn DefinitionDeploymentBackend>,
}

impl DeploymentBackends {
    /// Use the same backend for every category.
    pub fn uniform(backend: Arc<dyn DefinitionDeploymentBackend>) -> Self {
        Self {
            automation_plans: Arc::clone(&backend),
            campaigns: Arc::clone(&backend),
            events: Arc::clone(&backend),
            funnels: Arc::clone(&backend),
            goals: Arc::clone(&backend),
            marketing_assets: Arc::clone(&backend),
            outcomes: Arc::clone(&backend),
            page_events: Arc::clone(&backend),
            profiles: Arc::clone(&backend),
            segments: backend,
        }
    }

    /// Replace the backend of one category.
    pub fn with_backend(
        mut self,
        category: DeploymentCategory,
        backend: Arc<dyn DefinitionDeploymentBackend>,
    ) -> Self {
        *self.slot_mut(category) = backend;
        self
    }

    /// Backend responsible for `category`.
    pub fn backend_for(&self, category: DeploymentCategory) -> &Arc<dyn DefinitionDeploymentBackend> {
        match category {
            DeploymentCategory::AutomationPlans => &self.automation_plans,
            DeploymentCategory::Campaigns => &self.campaigns,
            DeploymentCategory::Events => &self.events,
            DeploymentCategory::Funnels => &self.funnels,
            DeploymentCategory::Goals => &self.goals,
            DeploymentCategory::MarketingAssets => &self.marketing_assets,
            DeploymentCategory::Outcomes => &self.outcomes,
            DeploymentCategory::PageEvents => &self.page_events,
            DeploymentCategory::Profiles => &self.profiles,
            DeploymentCategory::Segments => &self.segments,
        }
    }

    fn slot_mut(
        &mut self,
        category: DeploymentCategory,
    ) -> &mut Arc<dyn DefinitionDeploymentBackend> {
        match category {
            DeploymentCategory::AutomationPlans => &mut self.automation_plans,
            DeploymentCategory::Campaigns => &mut self.campaigns,
            DeploymentCategory::Events => &mut self.events,
            DeploymentCategory::Funnels => &mut self.funnels,
            DeploymentCategory::Goals => &mut self.goals,
            DeploymentCategory::MarketingAssets => &mut self.marketing_assets,
            DeploymentCategory::Outcomes => &mut self.outcomes,
            DeploymentCategory::PageEvents => &mut self.page_events,
            DeploymentCategory::Profiles => &mut self.profiles,
            DeploymentCategory::Segments => &mut self.segments,
        }
    }
}

/// Categories deployed by a successful batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReport {
    /// Deployed categories, in order.
    pub deployed: Vec<DeploymentCategory>,
    /// Locale the batch was deployed for.
    pub locale: Locale,
}

/// A batch stopped at its first failing category.
#[derive(Debug, thiserror::Error)]
#[error("Deployment of '{failed}' definitions failed: {source}")]
pub struct DeploymentFailure {
    /// Category whose backend failed.
    pub failed: DeploymentCategory,
    /// Categories committed before the failure.
    pub deployed: Vec<DeploymentCategory>,
    /// Backend error.
    #[source]
    pub source: AppError,
}

impl From<DeploymentFailure> for AppError {
    fn from(failure: DeploymentFailure) -> Self {
        let details = serde_json::json!({
            "failedCategory": failure.failed,
            "deployedCategories": failure.deployed,
        });
        let message = failure.to_string();
        AppError::with_source(
            defdeploy_core::error::ErrorKind::ExternalService,
            message,
            failure,
        )
        .with_details(details)
    }
}

/// Routes deploy-all calls to the backend of each category.
#[derive(Debug, Clone)]
pub struct DefinitionDeployer {
    /// Backend slots.
    backends: DeploymentBackends,
}

impl DefinitionDeployer {
    /// Creates a new deployer.
    pub fn new(backends: DeploymentBackends) -> Self {
        Self { backends }
    }

    /// Deploy every definition of one category.
    pub async fn deploy_all(&self, category: DeploymentCategory, locale: &Locale) -> AppResult<()> {
        let backend = self.backends.backend_for(category);
        tracing::debug!(
            category = %category,
            locale = %locale,
            backend = backend.backend_type(),
            "Deploying definition type"
        );
        backend.deploy_all(category, locale).await
    }

    /// Deploy categories one after another, stopping at the first failure.
    pub async fn deploy_categories(
        &self,
        categories: &[DeploymentCategory],
        locale: &Locale,
    ) -> Result<DeploymentReport, DeploymentFailure> {
        let mut deployed = Vec::with_capacity(categories.len());

        for &category in categories {
            if let Err(source) = self.deploy_all(category, locale).await {
                tracing::error!(
                    category = %category,
                    deployed = deployed.len(),
                    skipped = categories.len() - deployed.len() - 1,
                    error = %source,
                    "Definition deployment failed, aborting batch"
                );
                return Err(DeploymentFailure {
                    failed: category,
                    deployed,
                    source,
                });
            }
            deployed.push(category);
        }

        Ok(DeploymentReport {
            deployed,
            locale: locale.clone(),
        })
    }
}

/// Parse category names, skipping unknown ones.
pub fn parse_categories<S: AsRef<str>>(raw: &[S]) -> Vec<DeploymentCategory> {
    raw.iter()
        .filter_map(|name| match name.as_ref().parse::<DeploymentCategory>() {
            Ok(category) => Some(category),
            Err(err) => {
                tracing::warn!("Skipping definition type: {}", err);
                None
            }
        })
        .collect()
}
