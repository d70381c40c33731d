//! Background job registry for DefDeploy.
//!
//! This crate provides:
//! - A process-wide, injectable registry of named jobs that can be started,
//!   looked up by name, and polled for completion
//! - The job handler trait implemented by job targets
//! - A cron-driven reaper that evicts finished jobs after a retention period

pub mod handler;
pub mod model;
pub mod reaper;
pub mod registry;

pub use handler::{JobExecutionError, JobHandler};
pub use model::{Job, JobDescriptor, JobState, JobStatus, JobSummary};
pub use reaper::JobReaper;
pub use registry::{JobHandle, JobRegistry};
