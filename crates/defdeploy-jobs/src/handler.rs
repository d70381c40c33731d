//! Job handler trait, the target callable of a registered job.

use async_trait::async_trait;
use serde_json::Value;

use defdeploy_core::error::AppError;

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Get the job type this handler processes
    fn job_type(&self) -> &str;

    /// Execute the job with the arguments it was started with
    async fn execute(&self, args: &Value) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// The job was started with arguments the handler cannot use
    #[error("Invalid job arguments: {0}")]
    InvalidArguments(String),

    /// The handler ran and failed
    #[error("Job failed: {0}")]
    Failed(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}
