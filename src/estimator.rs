//! Bedtime estimation engine
//!
//! Given a wake time and daily sleep/caffeine habits, produces the
//! latest bedtime that still permits a restorative night according to
//! the pre-trained model. The model handle is loaded once when the
//! estimator is constructed and reused across calls.

use chrono::{NaiveTime, Timelike};

use crate::error::{InferenceError, Result};
use crate::model::{LinearSleepModel, SleepFeatures, SleepModel};
use crate::models::BedtimeEstimate;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Core bedtime estimation engine
///
/// Wraps a [`SleepModel`] and turns its predicted sleep duration into a
/// clock-time bedtime. Stateless across calls apart from the immutable
/// model handle; the same inputs always yield the same estimate.
pub struct BedtimeEstimator {
    model: Box<dyn SleepModel>,
}

impl BedtimeEstimator {
    /// Build an estimator around an already-loaded model
    pub fn new(model: Box<dyn SleepModel>) -> Self {
        BedtimeEstimator { model }
    }

    /// Build an estimator around the bundled pre-trained model
    pub fn with_default_model() -> Result<Self> {
        let model = LinearSleepModel::bundled()?;
        Ok(Self::new(Box::new(model)))
    }

    /// Name of the active model, for diagnostics
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Estimate the ideal bedtime for the given habits
    ///
    /// Inputs are assumed to be within their valid ranges (the
    /// presentation layer enforces them before calling). The wake time
    /// is normalized to seconds since midnight, the model is invoked
    /// exactly once, and the predicted sleep duration is subtracted
    /// from the wake time. A subtraction that crosses midnight wraps to
    /// the previous day's clock time; only the clock time is reported.
    pub fn estimate(
        &self,
        wake_time: NaiveTime,
        desired_sleep_hours: f64,
        coffee_cups: u8,
    ) -> Result<BedtimeEstimate> {
        let features = SleepFeatures::from_inputs(wake_time, desired_sleep_hours, coffee_cups);
        tracing::debug!(
            wake = features.wake,
            estimated_sleep = features.estimated_sleep,
            coffee = features.coffee,
            model = self.model.name(),
            "Running sleep prediction"
        );

        let actual_sleep_hours = self.model.predict(&features)?;
        tracing::debug!(actual_sleep_hours, "Prediction complete");

        let wake_seconds = i64::from(wake_time.hour() * 3600 + wake_time.minute() * 60);
        let sleep_seconds = (actual_sleep_hours * SECONDS_PER_HOUR).round() as i64;

        let bedtime_seconds = (wake_seconds - sleep_seconds).rem_euclid(SECONDS_PER_DAY);
        let crosses_midnight = sleep_seconds > wake_seconds;

        let bedtime = NaiveTime::from_num_seconds_from_midnight_opt(bedtime_seconds as u32, 0)
            .ok_or_else(|| InferenceError::PredictionFailed {
                reason: format!("bedtime out of clock range: {} seconds", bedtime_seconds),
            })?;

        Ok(BedtimeEstimate {
            bedtime,
            actual_sleep_hours,
            crosses_midnight,
        })
    }
}
