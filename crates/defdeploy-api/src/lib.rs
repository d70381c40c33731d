//! # defdeploy-api
//!
//! HTTP API layer for DefDeploy built on Axum.
//!
//! Provides the deploy and status endpoints, job introspection, health,
//! middleware (CORS, compression, request logging), extractors, DTOs, and
//! error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, build_state_from_config};
pub use state::AppState;
