//! Integration tests for definition deployment and status polling.

mod helpers;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use defdeploy_core::config::AppConfig;
use defdeploy_core::config::deployment::DEFAULT_TAXONOMY_ROOT_ID;
use defdeploy_core::types::{DeploymentCategory, Locale};
use defdeploy_service::backends::InMemoryTaxonomyStore;
use defdeploy_service::{Backends, DeploymentBackends};

use helpers::{FlagTracker, GatedTaxonomyDeployer, RecordingBackend, TestApp};

fn memory_taxonomy() -> Arc<InMemoryTaxonomyStore> {
    Arc::new(InMemoryTaxonomyStore::new())
}

/// App whose non-deploy routes time out after one second
fn short_timeout_app(backend: Arc<RecordingBackend>) -> TestApp {
    let mut config = AppConfig::default();
    config.server.request_timeout_seconds = 1;
    TestApp::with_config(
        config,
        Backends {
            definitions: DeploymentBackends::uniform(backend),
            taxonomy: memory_taxonomy(),
        },
        Arc::new(FlagTracker::inactive()),
    )
}

#[tokio::test]
async fn test_categories_deploy_in_request_order() {
    let backend = RecordingBackend::new();
    let app = TestApp::new(backend.clone(), memory_taxonomy());

    let response = app
        .deploy(json!(["segments", "Goals", "automationplans", "goals"]), false)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], json!(true));
    assert_eq!(
        backend.deployed().await,
        vec![
            DeploymentCategory::Segments,
            DeploymentCategory::Goals,
            DeploymentCategory::AutomationPlans,
            DeploymentCategory::Goals,
        ]
    );
    assert!(backend.locales().await.iter().all(Locale::is_invariant));
}

#[tokio::test]
async fn test_unknown_categories_are_skipped() {
    let backend = RecordingBackend::new();
    let app = TestApp::new(backend.clone(), memory_taxonomy());

    let response = app.deploy(json!(["bogus", "goals"]), false).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(backend.deployed().await, vec![DeploymentCategory::Goals]);
}

#[tokio::test]
async fn test_encoded_definition_types_string() {
    let backend = RecordingBackend::new();
    let app = TestApp::new(backend.clone(), memory_taxonomy());

    let response = app.deploy(json!("[\"pageevents\",\"profiles\"]"), false).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        backend.deployed().await,
        vec![DeploymentCategory::PageEvents, DeploymentCategory::Profiles]
    );
}

#[tokio::test]
async fn test_malformed_encoded_definition_types_is_rejected() {
    let backend = RecordingBackend::new();
    let app = TestApp::new(backend.clone(), memory_taxonomy());

    let response = app.deploy(json!("goals,segments"), false).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], json!("VALIDATION_ERROR"));
    assert!(backend.deployed().await.is_empty());
}

#[tokio::test]
async fn test_request_locale_is_forwarded() {
    let backend = RecordingBackend::new();
    let app = TestApp::new(backend.clone(), memory_taxonomy());

    let response = app
        .request(
            "POST",
            "/api/deploy-definitions",
            Some(json!({ "definitionTypes": ["funnels"], "locale": "da-DK" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(backend.locales().await, vec![Locale::new("da-DK")]);
}

#[tokio::test]
async fn test_without_taxonomies_no_job_is_started() {
    let app = TestApp::new(RecordingBackend::new(), memory_taxonomy());

    let response = app.deploy(json!(["goals"]), false).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["jobName"], json!(""));
    assert!(app.registry.is_empty());
}

#[tokio::test]
async fn test_with_taxonomies_job_runs_against_configured_root() {
    let taxonomy = memory_taxonomy();
    let app = TestApp::new(RecordingBackend::new(), taxonomy.clone());

    let response = app.deploy(json!(["outcomes"]), true).await;

    assert_eq!(response.status, StatusCode::OK);
    let job_name = response.body["jobName"].as_str().unwrap().to_string();
    assert!(job_name.starts_with("Deploy all taxonomies. Deployment job id: "));

    app.wait_for_job(&job_name).await;
    assert_eq!(taxonomy.deployed_roots().await, vec![DEFAULT_TAXONOMY_ROOT_ID]);
}

#[tokio::test]
async fn test_concurrent_requests_get_unique_job_names() {
    let app = TestApp::new(RecordingBackend::new(), memory_taxonomy());

    let responses =
        futures::future::join_all((0..16).map(|_| app.deploy(json!(["campaigns"]), true))).await;

    let names: HashSet<String> = responses
        .iter()
        .map(|r| {
            assert_eq!(r.status, StatusCode::OK);
            r.body["jobName"].as_str().unwrap().to_string()
        })
        .collect();

    assert_eq!(names.len(), 16);
    assert!(names.iter().all(|n| !n.is_empty()));
    assert_eq!(app.registry.len(), 16);
}

#[tokio::test]
async fn test_status_of_unknown_job_is_not_found() {
    let app = TestApp::new(RecordingBackend::new(), memory_taxonomy());

    let response = app.status("Deploy all taxonomies. Deployment job id: nope.").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_status_tracks_blocked_taxonomy_job() {
    let taxonomy = GatedTaxonomyDeployer::new();
    let app = TestApp::new(RecordingBackend::new(), taxonomy.clone());

    let response = app.deploy(json!([]), true).await;
    let job_name = response.body["jobName"].as_str().unwrap().to_string();

    let pending = app.status(&job_name).await;
    assert_eq!(pending.status, StatusCode::OK);
    assert_eq!(pending.body, json!({ "completed": false }));

    taxonomy.release();
    app.wait_for_job(&job_name).await;

    let done = app.status(&job_name).await;
    assert_eq!(done.body, json!({ "completed": true }));
    assert_eq!(taxonomy.deployed_roots().await, vec![DEFAULT_TAXONOMY_ROOT_ID]);
}

#[tokio::test]
async fn test_backend_failure_stops_remaining_categories() {
    let backend = RecordingBackend::failing_on(DeploymentCategory::Campaigns);
    let app = TestApp::new(backend.clone(), memory_taxonomy());

    let response = app
        .deploy(
            json!(["goals", "segments", "campaigns", "events", "funnels"]),
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], json!("DEPLOYMENT_FAILED"));
    assert_eq!(response.body["details"]["failedCategory"], json!("campaigns"));
    assert_eq!(
        response.body["details"]["deployedCategories"],
        json!(["goals", "segments"])
    );
    assert_eq!(
        backend.deployed().await,
        vec![DeploymentCategory::Goals, DeploymentCategory::Segments]
    );
    assert!(app.registry.is_empty());
}

#[tokio::test]
async fn test_per_category_backend_override() {
    let shared = RecordingBackend::new();
    let goals = RecordingBackend::new();
    let app = TestApp::with(
        Backends {
            definitions: DeploymentBackends::uniform(shared.clone())
                .with_backend(DeploymentCategory::Goals, goals.clone()),
            taxonomy: memory_taxonomy(),
        },
        Arc::new(FlagTracker::inactive()),
    );

    app.deploy(json!(["goals", "profiles"]), false).await;

    assert_eq!(goals.deployed().await, vec![DeploymentCategory::Goals]);
    assert_eq!(shared.deployed().await, vec![DeploymentCategory::Profiles]);
}

#[tokio::test]
async fn test_active_tracker_page_is_cancelled_once() {
    let tracker = Arc::new(FlagTracker::active());
    let app = TestApp::with(
        Backends {
            definitions: DeploymentBackends::uniform(RecordingBackend::new()),
            taxonomy: memory_taxonomy(),
        },
        tracker.clone(),
    );

    app.deploy(json!(["goals"]), false).await;
    assert_eq!(tracker.cancels(), 1);

    app.deploy(json!(["goals"]), false).await;
    assert_eq!(tracker.cancels(), 1);
}

#[tokio::test]
async fn test_inactive_tracker_is_untouched() {
    let tracker = Arc::new(FlagTracker::inactive());
    let app = TestApp::with(
        Backends {
            definitions: DeploymentBackends::uniform(RecordingBackend::new()),
            taxonomy: memory_taxonomy(),
        },
        tracker.clone(),
    );

    app.deploy(json!(["goals"]), true).await;

    assert_eq!(tracker.cancels(), 0);
}

#[tokio::test]
async fn test_wrong_body_types_are_validation_errors() {
    let backend = RecordingBackend::new();
    let app = TestApp::new(backend.clone(), memory_taxonomy());

    let bodies = [
        r#"{"definitionTypes":5}"#,
        r#"{"definitionTypes":["goals"],"publishTaxonomies":"yes"}"#,
        "not json",
    ];
    for body in bodies {
        let response = app
            .request_raw("POST", "/api/deploy-definitions", body)
            .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(response.body["error"], json!("VALIDATION_ERROR"));
        assert!(response.body["message"].is_string());
    }

    let status = app
        .request_raw("POST", "/api/deploy-definitions/status", r#"{"jobName":7}"#)
        .await;
    assert_eq!(status.status, StatusCode::BAD_REQUEST);
    assert_eq!(status.body["error"], json!("VALIDATION_ERROR"));

    assert!(backend.deployed().await.is_empty());
}

#[tokio::test]
async fn test_slow_batch_outlives_request_timeout() {
    let backend = RecordingBackend::slow(Duration::from_millis(700));
    let app = short_timeout_app(backend.clone());

    let response = app.deploy(json!(["goals", "segments", "events"]), true).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        backend.deployed().await,
        vec![
            DeploymentCategory::Goals,
            DeploymentCategory::Segments,
            DeploymentCategory::Events,
        ]
    );
    let job_name = response.body["jobName"].as_str().unwrap().to_string();
    assert_eq!(app.registry.len(), 1);
    app.wait_for_job(&job_name).await;
}

#[tokio::test]
async fn test_dropped_request_still_finishes_batch() {
    let backend = RecordingBackend::slow(Duration::from_millis(200));
    let app = Arc::new(short_timeout_app(backend.clone()));

    let client = Arc::clone(&app);
    let pending = tokio::spawn(async move {
        client
            .deploy(json!(["goals", "segments", "events"]), true)
            .await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    pending.abort();

    tokio::time::timeout(Duration::from_secs(5), async {
        while app.registry.is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("taxonomy job was not started");

    assert_eq!(
        backend.deployed().await,
        vec![
            DeploymentCategory::Goals,
            DeploymentCategory::Segments,
            DeploymentCategory::Events,
        ]
    );
}
