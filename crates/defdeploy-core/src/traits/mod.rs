//! Collaborator traits defined in `defdeploy-core` and implemented by other crates.

pub mod deployment;
pub mod tracking;

pub use deployment::{DefinitionDeploymentBackend, TaxonomyDeployer};
pub use tracking::{VisitTracker, cancel_active_page};
