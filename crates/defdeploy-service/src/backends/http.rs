//! HTTP client backends for a remote deployment manager.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use defdeploy_core::error::{AppError, ErrorKind};
use defdeploy_core::result::AppResult;
use defdeploy_core::traits::{DefinitionDeploymentBackend, TaxonomyDeployer};
use defdeploy_core::types::{DeploymentCategory, Locale};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployAllBody<'a> {
    category: DeploymentCategory,
    locale: &'a str,
}

fn build_client(timeout_seconds: u64) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to build HTTP client: {e}"),
                e,
            )
        })
}

fn request_failed(what: &str, err: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::ExternalService,
        format!("{what} request failed: {err}"),
        err,
    )
}

/// Deploys definitions by calling `POST {endpoint}/definitions/{category}/deploy`.
#[derive(Debug, Clone)]
pub struct HttpDeploymentBackend {
    client: Client,
    base_url: String,
}

impl HttpDeploymentBackend {
    /// Create a backend for the deployment manager at `endpoint`.
    pub fn new(endpoint: &str, timeout_seconds: u64) -> AppResult<Self> {
        Ok(Self {
            client: build_client(timeout_seconds)?,
            base_url: endpoint.trim_end_matches('/').to_owned(),
        })
    }

    /// URL of the deploy-all call for `category`.
    pub fn deploy_url(&self, category: DeploymentCategory) -> String {
        format!("{}/definitions/{}/deploy", self.base_url, category)
    }
}

#[async_trait]
impl DefinitionDeploymentBackend for HttpDeploymentBackend {
    fn backend_type(&self) -> &str {
        "http"
    }

    async fn deploy_all(&self, category: DeploymentCategory, locale: &Locale) -> AppResult<()> {
        let url = self.deploy_url(category);
        let response = self
            .client
            .post(&url)
            .json(&DeployAllBody {
                category,
                locale: locale.as_str(),
            })
            .send()
            .await
            .map_err(|e| request_failed("Definition deployment", e))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Deployment manager rejected '{}' deployment: {}",
                category,
                response.status()
            )));
        }

        Ok(())
    }
}

/// Publishes taxonomies by calling `POST {endpoint}/taxonomies/{root_id}/deploy`.
#[derive(Debug, Clone)]
pub struct HttpTaxonomyDeployer {
    client: Client,
    base_url: String,
}

impl HttpTaxonomyDeployer {
    /// Create a taxonomy deployer for the deployment manager at `endpoint`.
    pub fn new(endpoint: &str, timeout_seconds: u64) -> AppResult<Self> {
        Ok(Self {
            client: build_client(timeout_seconds)?,
            base_url: endpoint.trim_end_matches('/').to_owned(),
        })
    }

    /// URL of the deploy call for `root_id`.
    pub fn deploy_url(&self, root_id: Uuid) -> String {
        format!("{}/taxonomies/{}/deploy", self.base_url, root_id)
    }
}

#[async_trait]
impl TaxonomyDeployer for HttpTaxonomyDeployer {
    async fn deploy(&self, root_id: Uuid) -> AppResult<()> {
        let response = self
            .client
            .post(self.deploy_url(root_id))
            .send()
            .await
            .map_err(|e| request_failed("Taxonomy deployment", e))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Deployment manager rejected taxonomy deployment of {}: {}",
                root_id,
                response.status()
            )));
        }

        Ok(())
    }
}
