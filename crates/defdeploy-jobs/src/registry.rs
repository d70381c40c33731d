//! Job registry: the named table of background jobs.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;

use defdeploy_core::error::AppError;
use defdeploy_core::result::AppResult;

use crate::handler::{JobExecutionError, JobHandler};
use crate::model::{Job, JobDescriptor, JobSummary};

/// Handle returned when a job is started.
#[derive(Debug, Clone)]
pub struct JobHandle {
    job: Arc<Job>,
}

impl JobHandle {
    /// Name under which the job is registered.
    pub fn name(&self) -> &str {
        self.job.name()
    }

    /// The registered job.
    pub fn job(&self) -> &Arc<Job> {
        &self.job
    }

    /// Wait until the job's handler has returned.
    pub async fn wait(&self) {
        self.job.wait_done().await
    }
}

/// Process-wide table of named jobs.
///
/// Shared through `Arc`; insertion and lookup are safe under concurrent
/// access. Jobs stay registered until evicted with
/// [`JobRegistry::evict_finished`].
#[derive(Debug, Default)]
pub struct JobRegistry {
    /// Registered jobs by name
    jobs: DashMap<String, Arc<Job>>,
}

impl JobRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job and start its handler on the current tokio runtime.
    ///
    /// Returns without waiting for the handler. Fails with a conflict when
    /// the name is already registered.
    pub fn start(&self, descriptor: JobDescriptor) -> AppResult<JobHandle> {
        if descriptor.name.trim().is_empty() {
            return Err(AppError::validation("Job name must not be empty"));
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            AppError::service_unavailable(format!("No async runtime to run job on: {e}"))
        })?;

        let job = Arc::new(Job::new(&descriptor));
        match self.jobs.entry(descriptor.name.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict(format!(
                    "Job '{}' is already registered",
                    descriptor.name
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&job));
            }
        }

        tracing::info!(
            job = %descriptor.name,
            agent = %descriptor.agent,
            site = %descriptor.site,
            job_type = %job.job_type(),
            "Starting job"
        );

        runtime.spawn(run_job(
            Arc::clone(&job),
            Arc::clone(&descriptor.handler),
            descriptor.args,
        ));

        Ok(JobHandle { job })
    }

    /// Look up a job by name
    pub fn get(&self, name: &str) -> AppResult<Arc<Job>> {
        self.jobs
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AppError::not_found(format!("Job '{name}' was not found")))
    }

    /// Whether the job's handler has returned
    pub fn is_done(&self, job: &Job) -> bool {
        job.is_done()
    }

    /// Summaries of all registered jobs, oldest first
    pub fn list(&self) -> Vec<JobSummary> {
        let mut jobs: Vec<JobSummary> = self.jobs.iter().map(|e| e.value().summary()).collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        jobs
    }

    /// Number of registered jobs
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no jobs are registered
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Remove jobs that finished more than `retention` ago.
    ///
    /// Pending and running jobs are never removed. Returns the number of
    /// evicted jobs.
    pub fn evict_finished(&self, retention: chrono::Duration) -> usize {
        let cutoff = Utc::now() - retention;
        let before = self.jobs.len();
        self.jobs.retain(|_, job| !job.finished_before(cutoff));
        let evicted = before.saturating_sub(self.jobs.len());

        if evicted > 0 {
            tracing::debug!("Evicted {} finished job(s)", evicted);
        }
        evicted
    }
}

/// Run a job's handler and record its outcome
async fn run_job(job: Arc<Job>, handler: Arc<dyn JobHandler>, args: serde_json::Value) {
    job.mark_running();

    let outcome = AssertUnwindSafe(handler.execute(&args)).catch_unwind().await;

    match outcome {
        Ok(Ok(result)) => {
            tracing::info!(job = %job.name(), "Job completed successfully");
            job.mark_done(Ok(result));
        }
        Ok(Err(err)) => {
            let msg = match &err {
                JobExecutionError::Internal(app) => app.message.clone(),
                other => other.to_string(),
            };
            tracing::error!(job = %job.name(), error = %msg, "Job failed");
            job.mark_done(Err(msg));
        }
        Err(_) => {
            tracing::error!(job = %job.name(), "Job handler panicked");
            job.mark_done(Err("Job handler panicked".to_string()));
        }
    }
}
