//! Application builder: wires services, router, middleware and state into an Axum app.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use defdeploy_core::config::AppConfig;
use defdeploy_core::result::AppResult;
use defdeploy_core::traits::VisitTracker;
use defdeploy_jobs::JobRegistry;
use defdeploy_service::{
    Backends, DefinitionDeployer, DeploymentRequestHandler, HandlerSettings,
    TaxonomyDeployJobHandler,
};

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Wires the configured backends, job registry and request handler into `AppState`.
pub fn build_state(
    config: AppConfig,
    backends: Backends,
    registry: Arc<JobRegistry>,
    tracker: Arc<dyn VisitTracker>,
) -> AppState {
    let deployer = Arc::new(DefinitionDeployer::new(backends.definitions));
    let taxonomy_job = Arc::new(TaxonomyDeployJobHandler::new(backends.taxonomy));

    let request_handler = DeploymentRequestHandler::new(
        deployer,
        registry,
        taxonomy_job,
        tracker,
        HandlerSettings::from_config(&config),
    );

    AppState::new(config, request_handler)
}

/// Same as [`build_state`], selecting backends from `config.deployment`.
pub fn build_state_from_config(
    config: AppConfig,
    registry: Arc<JobRegistry>,
    tracker: Arc<dyn VisitTracker>,
) -> AppResult<AppState> {
    tracing::info!(
        "Initializing deployment backends (provider: {})...",
        config.deployment.provider
    );
    let backends = Backends::from_config(&config.deployment)?;
    Ok(build_state(config, backends, registry, tracker))
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
