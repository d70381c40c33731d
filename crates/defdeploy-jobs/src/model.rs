//! Job model, status, and lifecycle state.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use crate::handler::JobHandler;

/// Status of a registered job.
///
/// Jobs move `Pending -> Running -> Done` exactly once. A handler error
/// still ends in `Done`; the error is kept on the job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Registered, not yet picked up by the runtime.
    Pending,
    /// The handler is executing.
    Running,
    /// The handler returned (successfully or not).
    Done,
}

impl JobStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to start a job.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    /// Unique, human-readable job name.
    pub name: String,
    /// Owning agent (category) of the job.
    pub agent: String,
    /// Execution context (site) the job was started from.
    pub site: String,
    /// Target callable.
    pub handler: Arc<dyn JobHandler>,
    /// Arguments passed to the handler.
    pub args: Value,
}

/// Mutable lifecycle state of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobState {
    /// Current status.
    pub status: JobStatus,
    /// When the handler started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the handler returned.
    pub finished_at: Option<DateTime<Utc>>,
    /// Value returned by a successful handler.
    pub result: Option<Value>,
    /// Error recorded when the handler failed.
    pub error: Option<String>,
}

impl Default for JobState {
    fn default() -> Self {
        Self {
            status: JobStatus::Pending,
            started_at: None,
            finished_at: None,
            result: None,
            error: None,
        }
    }
}

/// A registered background job.
#[derive(Debug)]
pub struct Job {
    name: String,
    agent: String,
    site: String,
    job_type: String,
    args: Value,
    created_at: DateTime<Utc>,
    state: watch::Sender<JobState>,
}

impl Job {
    pub(crate) fn new(descriptor: &JobDescriptor) -> Self {
        let (state, _) = watch::channel(JobState::default());
        Self {
            name: descriptor.name.clone(),
            agent: descriptor.agent.clone(),
            site: descriptor.site.clone(),
            job_type: descriptor.handler.job_type().to_string(),
            args: descriptor.args.clone(),
            created_at: Utc::now(),
            state,
        }
    }

    /// Unique job name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning agent.
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Site the job was started from.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Handler type that runs this job.
    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    /// Arguments the job was started with.
    pub fn args(&self) -> &Value {
        &self.args
    }

    /// When the job was registered.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current status.
    pub fn status(&self) -> JobStatus {
        self.state.borrow().status
    }

    /// Whether the handler has returned.
    pub fn is_done(&self) -> bool {
        self.status() == JobStatus::Done
    }

    /// Snapshot of the lifecycle state.
    pub fn state(&self) -> JobState {
        self.state.borrow().clone()
    }

    /// Wait until the job is done.
    pub async fn wait_done(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so the wait cannot fail.
        let _ = rx.wait_for(|s| s.status == JobStatus::Done).await;
    }

    /// Whether the job finished strictly before `cutoff`.
    pub fn finished_before(&self, cutoff: DateTime<Utc>) -> bool {
        let state = self.state.borrow();
        state.status == JobStatus::Done && state.finished_at.is_some_and(|t| t < cutoff)
    }

    /// Serializable view of the job.
    pub fn summary(&self) -> JobSummary {
        let state = self.state();
        JobSummary {
            name: self.name.clone(),
            agent: self.agent.clone(),
            site: self.site.clone(),
            job_type: self.job_type.clone(),
            status: state.status,
            created_at: self.created_at,
            started_at: state.started_at,
            finished_at: state.finished_at,
            error: state.error,
        }
    }

    pub(crate) fn mark_running(&self) {
        self.state.send_modify(|s| {
            if s.status == JobStatus::Pending {
                s.status = JobStatus::Running;
                s.started_at = Some(Utc::now());
            }
        });
    }

    pub(crate) fn mark_done(&self, outcome: Result<Option<Value>, String>) {
        self.state.send_modify(|s| {
            if s.status == JobStatus::Done {
                return;
            }
            s.status = JobStatus::Done;
            s.finished_at = Some(Utc::now());
            match outcome {
                Ok(result) => s.result = result,
                Err(error) => s.error = Some(error),
            }
        });
    }
}

/// Serializable job summary for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    /// Job name.
    pub name: String,
    /// Owning agent.
    pub agent: String,
    /// Site.
    pub site: String,
    /// Handler type.
    pub job_type: String,
    /// Status.
    pub status: JobStatus,
    /// Registered at.
    pub created_at: DateTime<Utc>,
    /// Started at.
    pub started_at: Option<DateTime<Utc>>,
    /// Finished at.
    pub finished_at: Option<DateTime<Utc>>,
    /// Recorded error, if the handler failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
