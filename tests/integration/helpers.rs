//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tokio::sync::{Mutex, Notify};
use tower::ServiceExt;
use uuid::Uuid;

use defdeploy_core::config::AppConfig;
use defdeploy_core::error::AppError;
use defdeploy_core::result::AppResult;
use defdeploy_core::traits::{DefinitionDeploymentBackend, TaxonomyDeployer, VisitTracker};
use defdeploy_core::types::{DeploymentCategory, Locale};
use defdeploy_jobs::JobRegistry;
use defdeploy_service::{Backends, DeploymentBackends};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Registry shared with the router
    pub registry: Arc<JobRegistry>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a test application over the given backends and tracker
    pub fn with(backends: Backends, tracker: Arc<dyn VisitTracker>) -> Self {
        Self::with_config(AppConfig::default(), backends, tracker)
    }

    /// Create a test application with a custom config
    pub fn with_config(
        config: AppConfig,
        backends: Backends,
        tracker: Arc<dyn VisitTracker>,
    ) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let state = defdeploy_api::build_state(
            config.clone(),
            backends,
            Arc::clone(&registry),
            tracker,
        );

        Self {
            router: defdeploy_api::build_app(state),
            registry,
            config,
        }
    }

    /// Create a test application over recording backends and an inactive tracker
    pub fn new(definitions: Arc<RecordingBackend>, taxonomy: Arc<dyn TaxonomyDeployer>) -> Self {
        Self::with(
            Backends {
                definitions: DeploymentBackends::uniform(definitions),
                taxonomy,
            },
            Arc::new(FlagTracker::inactive()),
        )
    }

    /// POST /api/deploy-definitions
    pub async fn deploy(&self, types: Value, publish_taxonomies: bool) -> TestResponse {
        self.request(
            "POST",
            "/api/deploy-definitions",
            Some(serde_json::json!({
                "definitionTypes": types,
                "publishTaxonomies": publish_taxonomies,
            })),
        )
        .await
    }

    /// POST /api/deploy-definitions/status
    pub async fn status(&self, job_name: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/deploy-definitions/status",
            Some(serde_json::json!({ "jobName": job_name })),
        )
        .await
    }

    /// Wait until the named job has finished
    pub async fn wait_for_job(&self, job_name: &str) {
        let job = self
            .registry
            .get(job_name)
            .expect("job should be registered");
        tokio::time::timeout(Duration::from_secs(5), job.wait_done())
            .await
            .expect("job did not finish in time");
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        self.request_raw(method, path, body_str).await
    }

    /// Make an HTTP request with a verbatim body
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body_str: impl Into<String>,
    ) -> TestResponse {
        let body_str = body_str.into();
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Percent-encode a job name for use as a path segment
pub fn encode_segment(name: &str) -> String {
    name.replace('%', "%25").replace(' ', "%20")
}

/// Records deploy-all calls in order and fails on one chosen category
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<(DeploymentCategory, Locale)>>,
    fail_on: Option<DeploymentCategory>,
    delay: Option<Duration>,
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(category: DeploymentCategory) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::default(),
            fail_on: Some(category),
            delay: None,
        })
    }

    /// Takes `delay` to commit each category
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    /// Categories committed so far, in order
    pub async fn deployed(&self) -> Vec<DeploymentCategory> {
        self.calls.lock().await.iter().map(|(c, _)| *c).collect()
    }

    /// Locales of the calls so far
    pub async fn locales(&self) -> Vec<Locale> {
        self.calls.lock().await.iter().map(|(_, l)| l.clone()).collect()
    }
}

#[async_trait]
impl DefinitionDeploymentBackend for RecordingBackend {
    fn backend_type(&self) -> &str {
        "recording"
    }

    async fn deploy_all(&self, category: DeploymentCategory, locale: &Locale) -> AppResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on == Some(category) {
            return Err(AppError::external_service(format!(
                "{category} store is offline"
            )));
        }
        self.calls.lock().await.push((category, locale.clone()));
        Ok(())
    }
}

/// Taxonomy deployer that blocks until released
#[derive(Debug, Default)]
pub struct GatedTaxonomyDeployer {
    gate: Notify,
    roots: Mutex<Vec<Uuid>>,
}

impl GatedTaxonomyDeployer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Let one blocked deploy proceed
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub async fn deployed_roots(&self) -> Vec<Uuid> {
        self.roots.lock().await.clone()
    }
}

#[async_trait]
impl TaxonomyDeployer for GatedTaxonomyDeployer {
    async fn deploy(&self, root_id: Uuid) -> AppResult<()> {
        self.gate.notified().await;
        self.roots.lock().await.push(root_id);
        Ok(())
    }
}

/// Taxonomy deployer that always fails
#[derive(Debug, Default)]
pub struct FailingTaxonomyDeployer;

#[async_trait]
impl TaxonomyDeployer for FailingTaxonomyDeployer {
    async fn deploy(&self, _root_id: Uuid) -> AppResult<()> {
        Err(AppError::external_service("taxonomy store is offline"))
    }
}

/// Visit tracker with settable flags that counts cancellations
#[derive(Debug, Default)]
pub struct FlagTracker {
    active: AtomicBool,
    cancelled: AtomicBool,
    cancels: AtomicUsize,
}

impl FlagTracker {
    pub fn active() -> Self {
        Self {
            active: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl VisitTracker for FlagTracker {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn is_page_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn cancel_page(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}
