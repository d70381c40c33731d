//! Route definitions for the DefDeploy HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.
//!
//! Every route except the deploy batch is bounded by
//! `server.request_timeout_seconds`. A batch runs until every category has
//! been committed or one has failed.

use std::time::Duration;

use axum::http::StatusCode;
use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with request logging and per-route timeouts.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let bounded_routes = Router::new()
        .merge(status_routes())
        .merge(job_routes())
        .merge(health_routes())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ));

    let api_routes = Router::new()
        .merge(deploy_routes())
        .merge(bounded_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Definition deployment
fn deploy_routes() -> Router<AppState> {
    Router::new().route(
        "/deploy-definitions",
        post(handlers::deploy::deploy_definitions),
    )
}

/// Deployment status polling
fn status_routes() -> Router<AppState> {
    Router::new().route(
        "/deploy-definitions/status",
        post(handlers::deploy::deployment_status),
    )
}

/// Job introspection
fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(handlers::jobs::list_jobs))
        .route("/jobs/{name}", get(handlers::jobs::get_job))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
