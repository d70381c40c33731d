//! # defdeploy-core
//!
//! Core crate for DefDeploy. Contains configuration schemas, the
//! deployment domain types, the collaborator traits implemented by
//! deployment backends, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DefDeploy crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
