use chrono::NaiveTime;
use proptest::prelude::*;

use restrs::error::{InferenceError, RestRsError};
use restrs::estimator::BedtimeEstimator;
use restrs::model::{LinearSleepModel, SleepFeatures, SleepModel};
use restrs::models::{ClockFormat, SleepHabits};

/// Integration tests that exercise the complete estimation workflow

/// Stub model that records the features it was called with and returns
/// a fixed prediction
struct RecordingModel {
    prediction: f64,
    seen: std::sync::Mutex<Vec<SleepFeatures>>,
}

impl RecordingModel {
    fn new(prediction: f64) -> Self {
        RecordingModel {
            prediction,
            seen: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl SleepModel for RecordingModel {
    fn name(&self) -> &str {
        "recording"
    }

    fn predict(&self, features: &SleepFeatures) -> Result<f64, InferenceError> {
        self.seen.lock().unwrap().push(*features);
        Ok(self.prediction)
    }
}

struct BrokenModel;

impl SleepModel for BrokenModel {
    fn name(&self) -> &str {
        "broken"
    }

    fn predict(&self, _features: &SleepFeatures) -> Result<f64, InferenceError> {
        Err(InferenceError::ModelUnavailable {
            reason: "simulated construction failure".to_string(),
        })
    }
}

#[test]
fn test_end_to_end_scenario() {
    // wake=07:00, desired=8.0h, coffee=1 → features (25200.0, 8.0, 1.0);
    // a model predicting 8.0h puts bedtime at 23:00 the previous day.
    let model = Box::new(RecordingModel::new(8.0));
    let estimator = BedtimeEstimator::new(model);
    let wake = NaiveTime::from_hms_opt(7, 0, 0).unwrap();

    let estimate = estimator.estimate(wake, 8.0, 1).unwrap();

    assert_eq!(estimate.bedtime, NaiveTime::from_hms_opt(23, 0, 0).unwrap());
    assert!(estimate.crosses_midnight);
    assert_eq!(estimate.format_bedtime(ClockFormat::TwentyFourHour), "23:00");
    assert_eq!(estimate.format_bedtime(ClockFormat::TwelveHour), "11:00 PM");
}

#[test]
fn test_features_passed_to_model() {
    let model = RecordingModel::new(8.0);
    let seen_handle = std::sync::Arc::new(model);
    // Box a delegating wrapper so we can inspect what the estimator sent
    struct Delegate(std::sync::Arc<RecordingModel>);
    impl SleepModel for Delegate {
        fn name(&self) -> &str {
            self.0.name()
        }
        fn predict(&self, features: &SleepFeatures) -> Result<f64, InferenceError> {
            self.0.predict(features)
        }
    }

    let estimator = BedtimeEstimator::new(Box::new(Delegate(seen_handle.clone())));
    let wake = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
    estimator.estimate(wake, 8.0, 1).unwrap();

    let seen = seen_handle.seen.lock().unwrap();
    assert_eq!(seen.len(), 1, "model must be invoked exactly once per call");
    assert_eq!(seen[0].wake, 25200.0);
    assert_eq!(seen[0].estimated_sleep, 8.0);
    assert_eq!(seen[0].coffee, 1.0);
}

#[test]
fn test_wraparound_to_previous_day() {
    let estimator = BedtimeEstimator::new(Box::new(RecordingModel::new(8.0)));
    let wake = NaiveTime::from_hms_opt(0, 30, 0).unwrap();

    let estimate = estimator.estimate(wake, 8.0, 1).unwrap();
    assert_eq!(estimate.bedtime, NaiveTime::from_hms_opt(16, 30, 0).unwrap());
    assert!(estimate.crosses_midnight);
}

#[test]
fn test_inference_failure_and_inputs_unchanged() {
    let estimator = BedtimeEstimator::new(Box::new(BrokenModel));
    let habits = SleepHabits::default();

    let err = estimator
        .estimate(habits.wake_time, habits.desired_sleep_hours, habits.coffee_cups)
        .unwrap_err();
    assert!(matches!(err, RestRsError::Inference(_)));
    assert!(err.user_message().contains("Sorry"));

    // Inputs are owned by the caller and must survive a failed call
    assert_eq!(habits, SleepHabits::default());
}

#[test]
fn test_determinism_with_bundled_model() {
    let estimator = BedtimeEstimator::with_default_model().unwrap();
    let wake = NaiveTime::from_hms_opt(7, 0, 0).unwrap();

    let first = estimator.estimate(wake, 8.0, 1).unwrap();
    for _ in 0..10 {
        let again = estimator.estimate(wake, 8.0, 1).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_bundled_model_full_workflow() {
    let estimator = BedtimeEstimator::with_default_model().unwrap();
    let habits = SleepHabits::default();
    habits.validate().unwrap();

    let estimate = estimator
        .estimate(habits.wake_time, habits.desired_sleep_hours, habits.coffee_cups)
        .unwrap();

    // 8h desired with one cup of coffee should land the bedtime in the
    // late evening before a 07:00 wake-up.
    assert!(estimate.actual_sleep_hours > 6.0 && estimate.actual_sleep_hours < 10.0);
    assert!(estimate.crosses_midnight);
}

#[test]
fn test_artifact_swap_preserves_contract() {
    // A stand-in artifact with different coefficients but the same
    // feature schema must slot in without any caller-side change.
    let json = r#"{
        "name": "SleepCalculatorV2",
        "version": "2.0",
        "inputs": ["wake", "estimatedSleep", "coffee"],
        "output": "actualSleep",
        "intercept": 1.0,
        "weights": { "wake": 0.0, "estimatedSleep": 0.9, "coffee": 0.05 }
    }"#;
    let model = LinearSleepModel::from_json(json).unwrap();
    let estimator = BedtimeEstimator::new(Box::new(model));
    let wake = NaiveTime::from_hms_opt(7, 0, 0).unwrap();

    // 1.0 + 0.9*8 + 0.05*2 = 8.3h → bedtime 22:42 the previous day
    let estimate = estimator.estimate(wake, 8.0, 2).unwrap();
    assert_eq!(estimate.bedtime, NaiveTime::from_hms_opt(22, 42, 0).unwrap());
}

proptest! {
    /// Over the whole valid input domain the estimator returns either a
    /// valid time of day or an inference error, and never panics.
    #[test]
    fn prop_estimate_total_over_input_domain(
        hour in 0u32..24,
        minute in 0u32..60,
        sleep_steps in 16u32..=48,
        coffee in 1u8..=20,
    ) {
        let estimator = BedtimeEstimator::with_default_model().unwrap();
        let wake = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        let sleep_hours = f64::from(sleep_steps) * 0.25;

        let habits = SleepHabits::new(wake, sleep_hours, coffee);
        prop_assert!(habits.validate().is_ok());

        match estimator.estimate(wake, sleep_hours, coffee) {
            Ok(estimate) => {
                // NaiveTime is a valid time of day by construction; the
                // prediction must be a plausible duration too.
                prop_assert!(estimate.actual_sleep_hours > 0.0);
                prop_assert!(estimate.actual_sleep_hours < 24.0);
            }
            Err(err) => prop_assert!(matches!(err, RestRsError::Inference(_))),
        }
    }

    /// Repeated calls with identical inputs agree.
    #[test]
    fn prop_estimate_deterministic(
        hour in 0u32..24,
        minute in 0u32..60,
        sleep_steps in 16u32..=48,
        coffee in 1u8..=20,
    ) {
        let estimator = BedtimeEstimator::with_default_model().unwrap();
        let wake = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        let sleep_hours = f64::from(sleep_steps) * 0.25;

        let first = estimator.estimate(wake, sleep_hours, coffee).unwrap();
        let second = estimator.estimate(wake, sleep_hours, coffee).unwrap();
        prop_assert_eq!(first, second);
    }
}
