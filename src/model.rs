//! Sleep prediction model layer
//!
//! The predictor behind the estimator is treated as a black box behind
//! the [`SleepModel`] trait: three numeric features in, one predicted
//! sleep duration out. The bundled realization is a linear regression
//! whose coefficients ship as a JSON artifact; an alternative model can
//! be substituted as long as it preserves the feature contract.
//!
//! # Feature contract
//!
//! | Feature          | Unit                   |
//! |------------------|------------------------|
//! | `wake`           | seconds since midnight |
//! | `estimatedSleep` | hours                  |
//! | `coffee`         | cups                   |
//!
//! Output: `actualSleep`, the predicted necessary sleep duration in
//! hours.

use std::fs;
use std::path::Path;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Artifact field names, in feature order
pub const EXPECTED_INPUTS: [&str; 3] = ["wake", "estimatedSleep", "coffee"];

/// Artifact output field name
pub const EXPECTED_OUTPUT: &str = "actualSleep";

/// Bundled pre-trained artifact
const BUNDLED_ARTIFACT: &str = include_str!("../assets/sleep_calculator.json");

/// Numeric feature vector for one prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepFeatures {
    /// Wake time as seconds since midnight
    pub wake: f64,

    /// Desired sleep duration in hours
    pub estimated_sleep: f64,

    /// Daily coffee intake in cups
    pub coffee: f64,
}

impl SleepFeatures {
    /// Build the feature vector from user-facing inputs
    ///
    /// Wake time is normalized to seconds since midnight
    /// (hour x 3600 + minute x 60); seconds of the wake time are
    /// dropped. The other two inputs pass through unchanged.
    pub fn from_inputs(wake_time: NaiveTime, desired_sleep_hours: f64, coffee_cups: u8) -> Self {
        let wake_seconds = wake_time.hour() * 3600 + wake_time.minute() * 60;
        SleepFeatures {
            wake: f64::from(wake_seconds),
            estimated_sleep: desired_sleep_hours,
            coffee: f64::from(coffee_cups),
        }
    }

    fn all_finite(&self) -> bool {
        self.wake.is_finite() && self.estimated_sleep.is_finite() && self.coffee.is_finite()
    }
}

/// Black-box sleep duration predictor
///
/// Implementations must be stateless across calls: the same features
/// always produce the same prediction.
pub trait SleepModel: Send + Sync {
    /// Human-readable model name for diagnostics
    fn name(&self) -> &str;

    /// Predict the necessary sleep duration in hours
    fn predict(&self, features: &SleepFeatures) -> Result<f64, InferenceError>;
}

/// Serialized model coefficients
///
/// Schema of `assets/sleep_calculator.json`. The `inputs` and `output`
/// lists exist so a replacement artifact trained elsewhere can be
/// checked against the feature contract before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub version: String,
    pub inputs: Vec<String>,
    pub output: String,
    pub intercept: f64,
    pub weights: ModelWeights,
}

/// Per-feature regression weights
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelWeights {
    pub wake: f64,
    #[serde(rename = "estimatedSleep")]
    pub estimated_sleep: f64,
    pub coffee: f64,
}

impl ModelArtifact {
    /// Check the artifact against the feature contract
    fn validate(&self) -> Result<(), InferenceError> {
        if self.inputs != EXPECTED_INPUTS {
            return Err(InferenceError::InvalidArtifact {
                reason: format!(
                    "feature schema mismatch: expected {:?}, got {:?}",
                    EXPECTED_INPUTS, self.inputs
                ),
            });
        }

        if self.output != EXPECTED_OUTPUT {
            return Err(InferenceError::InvalidArtifact {
                reason: format!(
                    "output mismatch: expected {:?}, got {:?}",
                    EXPECTED_OUTPUT, self.output
                ),
            });
        }

        let coefficients = [
            self.intercept,
            self.weights.wake,
            self.weights.estimated_sleep,
            self.weights.coffee,
        ];
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InferenceError::InvalidArtifact {
                reason: "non-finite coefficient in artifact".to_string(),
            });
        }

        Ok(())
    }
}

/// Linear regression sleep model
///
/// `actualSleep = intercept + w_wake * wake + w_sleep * estimatedSleep
/// + w_coffee * coffee`
#[derive(Debug, Clone)]
pub struct LinearSleepModel {
    artifact: ModelArtifact,
}

impl LinearSleepModel {
    /// Load the model shipped with the crate
    pub fn bundled() -> Result<Self, InferenceError> {
        Self::from_json(BUNDLED_ARTIFACT)
    }

    /// Parse a model from an artifact JSON document
    pub fn from_json(json: &str) -> Result<Self, InferenceError> {
        let artifact: ModelArtifact =
            serde_json::from_str(json).map_err(|e| InferenceError::ModelUnavailable {
                reason: format!("failed to parse model artifact: {}", e),
            })?;
        artifact.validate()?;
        Ok(LinearSleepModel { artifact })
    }

    /// Load a model from an artifact file on disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, InferenceError> {
        let content =
            fs::read_to_string(&path).map_err(|e| InferenceError::ModelUnavailable {
                reason: format!(
                    "failed to read model artifact {}: {}",
                    path.as_ref().display(),
                    e
                ),
            })?;
        Self::from_json(&content)
    }

    /// The underlying artifact, for diagnostics
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }
}

impl SleepModel for LinearSleepModel {
    fn name(&self) -> &str {
        &self.artifact.name
    }

    fn predict(&self, features: &SleepFeatures) -> Result<f64, InferenceError> {
        if !features.all_finite() {
            return Err(InferenceError::PredictionFailed {
                reason: "non-finite feature value".to_string(),
            });
        }

        let w = &self.artifact.weights;
        let predicted = self.artifact.intercept
            + w.wake * features.wake
            + w.estimated_sleep * features.estimated_sleep
            + w.coffee * features.coffee;

        // A usable prediction is a positive duration shorter than a day.
        if !predicted.is_finite() || predicted <= 0.0 || predicted >= 24.0 {
            return Err(InferenceError::PredictionFailed {
                reason: format!("predicted sleep duration out of range: {}", predicted),
            });
        }

        Ok(predicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_conversion() {
        let wake = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        let features = SleepFeatures::from_inputs(wake, 8.0, 1);

        assert_eq!(features.wake, 25200.0);
        assert_eq!(features.estimated_sleep, 8.0);
        assert_eq!(features.coffee, 1.0);
    }

    #[test]
    fn test_feature_conversion_drops_seconds() {
        let wake = NaiveTime::from_hms_opt(6, 30, 45).unwrap();
        let features = SleepFeatures::from_inputs(wake, 7.5, 3);

        // 6 * 3600 + 30 * 60, the 45 seconds are ignored
        assert_eq!(features.wake, 23400.0);
    }

    #[test]
    fn test_bundled_model_loads() {
        let model = LinearSleepModel::bundled().unwrap();
        assert_eq!(model.name(), "SleepCalculator");
        assert_eq!(model.artifact().inputs, EXPECTED_INPUTS);
        assert_eq!(model.artifact().output, EXPECTED_OUTPUT);
    }

    #[test]
    fn test_bundled_model_prediction_in_range() {
        let model = LinearSleepModel::bundled().unwrap();
        let wake = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        let features = SleepFeatures::from_inputs(wake, 8.0, 1);

        let predicted = model.predict(&features).unwrap();
        assert!(predicted > 4.0 && predicted < 12.0);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let model = LinearSleepModel::bundled().unwrap();
        let features = SleepFeatures {
            wake: 25200.0,
            estimated_sleep: 8.0,
            coffee: 2.0,
        };

        let first = model.predict(&features).unwrap();
        let second = model.predict(&features).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_coffee_increases_predicted_sleep() {
        let model = LinearSleepModel::bundled().unwrap();
        let wake = NaiveTime::from_hms_opt(7, 0, 0).unwrap();

        let light = model
            .predict(&SleepFeatures::from_inputs(wake, 8.0, 1))
            .unwrap();
        let heavy = model
            .predict(&SleepFeatures::from_inputs(wake, 8.0, 20))
            .unwrap();
        assert!(heavy > light);
    }

    #[test]
    fn test_non_finite_features_rejected() {
        let model = LinearSleepModel::bundled().unwrap();
        let features = SleepFeatures {
            wake: f64::NAN,
            estimated_sleep: 8.0,
            coffee: 1.0,
        };

        let err = model.predict(&features).unwrap_err();
        assert!(matches!(err, InferenceError::PredictionFailed { .. }));
    }

    #[test]
    fn test_malformed_artifact_rejected() {
        let err = LinearSleepModel::from_json("not json at all").unwrap_err();
        assert!(matches!(err, InferenceError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let json = r#"{
            "name": "Other",
            "version": "1.0",
            "inputs": ["wake", "coffee"],
            "output": "actualSleep",
            "intercept": 0.0,
            "weights": { "wake": 0.0, "estimatedSleep": 1.0, "coffee": 0.0 }
        }"#;

        let err = LinearSleepModel::from_json(json).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidArtifact { .. }));
    }

    #[test]
    fn test_non_finite_coefficient_rejected() {
        let json = r#"{
            "name": "Broken",
            "version": "1.0",
            "inputs": ["wake", "estimatedSleep", "coffee"],
            "output": "actualSleep",
            "intercept": 1e400,
            "weights": { "wake": 0.0, "estimatedSleep": 1.0, "coffee": 0.0 }
        }"#;

        // 1e400 overflows f64 to infinity during deserialization
        let err = LinearSleepModel::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::InvalidArtifact { .. } | InferenceError::ModelUnavailable { .. }
        ));
    }

    #[test]
    fn test_missing_artifact_file() {
        let err = LinearSleepModel::from_file("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, InferenceError::ModelUnavailable { .. }));
    }
}
