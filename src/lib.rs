// Library interface for RestRS modules
// This allows integration tests to access the core functionality

pub mod config;
pub mod error;
pub mod estimator;
pub mod logging;
pub mod model;
pub mod models;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::{ErrorSeverity, InferenceError, RestRsError, Result};
pub use estimator::BedtimeEstimator;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use model::{LinearSleepModel, ModelArtifact, SleepFeatures, SleepModel};
pub use models::{BedtimeEstimate, ClockFormat, SleepHabits};
