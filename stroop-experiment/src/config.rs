use crate::analysis::AnalysisThresholds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TRIALS_PER_PHASE: usize = 20;
pub const SETTLE_DELAY_MS: u64 = 150;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("trials_per_phase must be at least 1")]
    NoTrials,

    #[error("typical_interference_ms ({typical}) must not exceed high_interference_ms ({high})")]
    InvertedBands { typical: i64, high: i64 },

    #[error("low_accuracy_percent must be between 0 and 100, got {0}")]
    AccuracyOutOfRange(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub trials_per_phase: usize,
    /// Pause between showing a phase's first stimulus and starting its timer.
    pub settle_delay_ms: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            trials_per_phase: TRIALS_PER_PHASE,
            settle_delay_ms: SETTLE_DELAY_MS,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials_per_phase == 0 {
            return Err(ConfigError::NoTrials);
        }
        Ok(())
    }
}

impl AnalysisThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.low_accuracy_percent > 100 {
            return Err(ConfigError::AccuracyOutOfRange(self.low_accuracy_percent));
        }
        if self.typical_interference_ms > self.high_interference_ms {
            return Err(ConfigError::InvertedBands {
                typical: self.typical_interference_ms,
                high: self.high_interference_ms,
            });
        }
        Ok(())
    }
}
