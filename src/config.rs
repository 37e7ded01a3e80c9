use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Ticks;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("aging interval must be positive, got {0}")]
    InvalidAgingInterval(Ticks),
}

/// Knobs for the tick scheduler's waiting set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SchedConfig {
    /// Waiting time after which an entity is promoted once.
    pub aging_threshold: Ticks,
    /// Waiting time past which an entity is evicted.
    pub max_wait_time: Ticks,
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self {
            aging_threshold: 5,
            max_wait_time: 30,
        }
    }
}

/// Knobs for the aging priority queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Ticks between priority aging passes. Must be positive.
    pub aging_interval: Ticks,
}

impl QueueConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aging_interval == 0 {
            return Err(ConfigError::InvalidAgingInterval(self.aging_interval));
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { aging_interval: 5 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimConfig {
    pub scheduler: SchedConfig,
    pub queue: QueueConfig,
    /// Ticks after printing before a pickup reminder fires.
    pub reminder_after: Ticks,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedConfig::default(),
            queue: QueueConfig::default(),
            reminder_after: 3,
        }
    }
}
