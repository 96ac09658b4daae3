pub mod analysis;
pub mod config;
pub mod generator;
pub mod report;
pub mod scoring;
pub mod state;
pub use analysis::{Analysis, AnalysisThresholds, NarrativeCategory, classify, interference_ms};
pub use config::{ConfigError, ExperimentConfig, SETTLE_DELAY_MS, TRIALS_PER_PHASE};
pub use generator::{StimulusGenerator, generate_trial};
pub use report::{AnalysisSummary, ReportPayload};
pub use scoring::{PhaseStatistics, compute_statistics};
pub use state::{ActiveTrial, SessionError, SessionEvent, SessionStateMachine, SetupError};
