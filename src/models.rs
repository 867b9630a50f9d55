//! Core domain types for bedtime estimation
//!
//! # Background
//!
//! The estimator works from three daily habits:
//!
//! - **Wake time**: the time of day the user wants to wake up. Only the
//!   clock time matters; the calendar date is irrelevant.
//! - **Desired sleep**: how many hours of sleep the user is aiming for.
//!   Sleep need varies between roughly 4 and 12 hours in adults, and
//!   quarter-hour granularity is as fine as self-reporting gets.
//! - **Coffee intake**: cups per day. Caffeine delays sleep onset, so
//!   higher intake pushes the predicted sleep need up.
//!
//! Input ranges are enforced by the presentation layer through
//! [`SleepHabits::validate`] before the estimator is invoked; the
//! estimator itself assumes well-formed input.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RestRsError, Result};

/// Minimum desired sleep duration in hours
pub const MIN_SLEEP_HOURS: f64 = 4.0;

/// Maximum desired sleep duration in hours
pub const MAX_SLEEP_HOURS: f64 = 12.0;

/// Granularity of the desired sleep duration in hours
pub const SLEEP_HOURS_STEP: f64 = 0.25;

/// Minimum daily coffee intake in cups
pub const MIN_COFFEE_CUPS: u8 = 1;

/// Maximum daily coffee intake in cups
pub const MAX_COFFEE_CUPS: u8 = 20;

/// Tolerance for the quarter-hour step check on desired sleep
const STEP_EPSILON: f64 = 1e-9;

/// Default wake-up time when the user has not chosen one (07:00)
pub fn default_wake_time() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 0, 0).expect("07:00 is a valid time")
}

/// Validated input triple for one estimation
///
/// Holds the three values for the duration of a single interaction;
/// nothing here is persisted across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepHabits {
    /// Desired wake-up time (seconds component ignored)
    pub wake_time: NaiveTime,

    /// Desired amount of sleep in hours, 4.0-12.0 in 0.25 steps
    pub desired_sleep_hours: f64,

    /// Daily coffee intake in cups, 1-20
    pub coffee_cups: u8,
}

impl Default for SleepHabits {
    fn default() -> Self {
        SleepHabits {
            wake_time: default_wake_time(),
            desired_sleep_hours: 8.0,
            coffee_cups: 1,
        }
    }
}

impl SleepHabits {
    pub fn new(wake_time: NaiveTime, desired_sleep_hours: f64, coffee_cups: u8) -> Self {
        SleepHabits {
            wake_time,
            desired_sleep_hours,
            coffee_cups,
        }
    }

    /// Enforce the input ranges the estimator assumes
    ///
    /// Mirrors the constraints of the input widgets: sleep hours in
    /// [4.0, 12.0] on a 0.25 grid, coffee cups in [1, 20].
    pub fn validate(&self) -> Result<()> {
        if !self.desired_sleep_hours.is_finite() {
            return Err(RestRsError::Validation(
                "desired sleep hours must be a finite number".to_string(),
            ));
        }

        if self.desired_sleep_hours < MIN_SLEEP_HOURS || self.desired_sleep_hours > MAX_SLEEP_HOURS
        {
            return Err(RestRsError::Validation(format!(
                "desired sleep hours must be between {} and {}, got {}",
                MIN_SLEEP_HOURS, MAX_SLEEP_HOURS, self.desired_sleep_hours
            )));
        }

        let steps = self.desired_sleep_hours / SLEEP_HOURS_STEP;
        if (steps - steps.round()).abs() > STEP_EPSILON {
            return Err(RestRsError::Validation(format!(
                "desired sleep hours must be a multiple of {} hours, got {}",
                SLEEP_HOURS_STEP, self.desired_sleep_hours
            )));
        }

        if self.coffee_cups < MIN_COFFEE_CUPS || self.coffee_cups > MAX_COFFEE_CUPS {
            return Err(RestRsError::Validation(format!(
                "coffee cups must be between {} and {}, got {}",
                MIN_COFFEE_CUPS, MAX_COFFEE_CUPS, self.coffee_cups
            )));
        }

        Ok(())
    }
}

/// Successful estimation result
///
/// Carries only the clock time of the recommended bedtime. Which
/// calendar day it falls on is intentionally discarded; `crosses_midnight`
/// records whether the subtraction wrapped past 00:00 so a display layer
/// can annotate the time with "(previous day)".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BedtimeEstimate {
    /// Recommended bedtime as a bare clock time
    pub bedtime: NaiveTime,

    /// Sleep duration in hours the model predicts the user actually needs
    pub actual_sleep_hours: f64,

    /// True when the bedtime falls on the day before the wake time
    pub crosses_midnight: bool,
}

impl BedtimeEstimate {
    /// Format the bedtime in the requested clock style
    pub fn format_bedtime(&self, format: ClockFormat) -> String {
        format.format_time(self.bedtime)
    }
}

impl fmt::Display for BedtimeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ClockFormat::TwentyFourHour.format_time(self.bedtime))
    }
}

/// Clock display preference for formatted times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClockFormat {
    /// 24-hour clock, e.g. "23:00"
    TwentyFourHour,
    /// 12-hour clock with meridiem, e.g. "11:00 PM"
    TwelveHour,
}

impl Default for ClockFormat {
    fn default() -> Self {
        ClockFormat::TwentyFourHour
    }
}

impl ClockFormat {
    /// Render a time of day, dropping seconds
    pub fn format_time(&self, time: NaiveTime) -> String {
        match self {
            ClockFormat::TwentyFourHour => format!("{:02}:{:02}", time.hour(), time.minute()),
            ClockFormat::TwelveHour => time.format("%-I:%M %p").to_string(),
        }
    }
}

impl std::str::FromStr for ClockFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "24" | "24h" | "twenty-four-hour" => Ok(ClockFormat::TwentyFourHour),
            "12" | "12h" | "twelve-hour" => Ok(ClockFormat::TwelveHour),
            _ => Err(format!("Invalid clock format: {}", s)),
        }
    }
}

impl fmt::Display for ClockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockFormat::TwentyFourHour => write!(f, "twenty-four-hour"),
            ClockFormat::TwelveHour => write!(f, "twelve-hour"),
        }
    }
}
