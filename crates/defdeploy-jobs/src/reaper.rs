//! Cron-driven eviction of finished jobs.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use defdeploy_core::config::JobsConfig;
use defdeploy_core::error::AppError;

use crate::registry::JobRegistry;

/// Periodically evicts jobs that finished longer ago than the retention period
pub struct JobReaper {
    /// The underlying cron scheduler
    scheduler: JobScheduler,
    /// Registry to evict from
    registry: Arc<JobRegistry>,
    /// How long finished jobs stay registered
    retention: chrono::Duration,
}

impl std::fmt::Debug for JobReaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobReaper")
            .field("retention", &self.retention)
            .finish()
    }
}

impl JobReaper {
    /// Create a reaper for `registry` using the retention from `config`
    pub async fn new(registry: Arc<JobRegistry>, config: &JobsConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        let max_seconds = (i64::MAX / 1000) as u64;
        let retention = chrono::Duration::seconds(config.retention_seconds.min(max_seconds) as i64);

        Ok(Self {
            scheduler,
            registry,
            retention,
        })
    }

    /// Evict expired jobs now. Returns the number of evicted jobs.
    pub fn run_once(&self) -> usize {
        self.registry.evict_finished(self.retention)
    }

    /// Register the eviction task on `schedule` (cron with seconds) and start it
    pub async fn start(&self, schedule: &str) -> Result<(), AppError> {
        let registry = Arc::clone(&self.registry);
        let retention = self.retention;

        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let registry = Arc::clone(&registry);
            Box::pin(async move {
                let evicted = registry.evict_finished(retention);
                tracing::debug!(
                    "Job reaper run: evicted={}, remaining={}",
                    evicted,
                    registry.len()
                );
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid reaper schedule '{}': {}", schedule, e))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add reaper schedule: {}", e)))?;

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!(
            "Job reaper started (schedule '{}', retention {}s)",
            schedule,
            self.retention.num_seconds()
        );
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Job reaper shut down");
        Ok(())
    }
}
