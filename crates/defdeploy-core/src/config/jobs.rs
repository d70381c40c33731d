//! Background job registry configuration.

use serde::{Deserialize, Serialize};

/// Job registry and retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Agent (owning category) recorded on jobs started by this service.
    #[serde(default = "default_agent")]
    pub agent: String,
    /// Seconds a finished job stays registered before it may be evicted.
    #[serde(default = "default_retention")]
    pub retention_seconds: u64,
    /// Whether the periodic reaper is started.
    #[serde(default = "default_true")]
    pub reaper_enabled: bool,
    /// Cron expression (with seconds) for reaper runs.
    #[serde(default = "default_reaper_schedule")]
    pub reaper_schedule: String,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            agent: default_agent(),
            retention_seconds: default_retention(),
            reaper_enabled: true,
            reaper_schedule: default_reaper_schedule(),
        }
    }
}

fn default_agent() -> String {
    "marketing.client".to_string()
}

fn default_retention() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_reaper_schedule() -> String {
    "0 */5 * * * *".to_string()
}
