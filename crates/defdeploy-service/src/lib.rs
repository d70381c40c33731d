//! # defdeploy-service
//!
//! Deployment orchestration for DefDeploy. The [`DefinitionDeployer`]
//! routes each definition category to its backend, the
//! [`DeploymentRequestHandler`] sequences one deploy request and starts the
//! taxonomy publishing job, and `backends` holds the in-memory and HTTP
//! implementations of the deployment traits.
//!
//! Services take all their dependencies as `Arc` references
//! at construction time.

pub mod backends;
pub mod deployer;
pub mod handler;
pub mod taxonomy;
pub mod tracking;

pub use backends::Backends;
pub use deployer::{
    DefinitionDeployer, DeploymentBackends, DeploymentFailure, DeploymentReport, parse_categories,
};
pub use handler::{
    DeploymentRequest, DeploymentRequestHandler, DeploymentResponse, DeploymentStatus,
    HandlerSettings,
};
pub use taxonomy::{TAXONOMY_JOB_TYPE, TaxonomyDeployJobHandler};
pub use tracking::DisabledVisitTracker;
