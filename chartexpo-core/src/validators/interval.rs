//! Minimum-interval rule
//!
//! The sensor reports at most one measurement per interval. Two valid points
//! closer than that mean the curve was sampled between real measurements, so
//! the later one is dropped. Comparisons chain only through points that are
//! still valid.

use crate::{
    constants::DEFAULT_MIN_INTERVAL_MINUTES,
    errors::{ValidationError, ValidationResult},
    sample::DecodedPoint,
    traits::{ValidationContext, Validator},
};

use super::utils;

/// Nulls points too close to the previous valid one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalRule {
    min_interval_minutes: u32,
}

impl Default for IntervalRule {
    fn default() -> Self {
        Self {
            min_interval_minutes: DEFAULT_MIN_INTERVAL_MINUTES,
        }
    }
}

impl IntervalRule {
    /// Rule with a custom minimum
    pub fn new(min_interval_minutes: u32) -> Self {
        Self { min_interval_minutes }
    }

    /// Configured minimum in milliseconds
    pub fn min_interval_ms(&self) -> i64 {
        utils::minutes_to_ms(self.min_interval_minutes)
    }
}

impl Validator for IntervalRule {
    fn validate(&self, point: &DecodedPoint, context: &ValidationContext) -> ValidationResult<()> {
        if point.value.is_none() || !context.time_resolved {
            return Ok(());
        }

        match context.time_delta_ms(point.timestamp_ms) {
            Some(delta_ms) if delta_ms <= self.min_interval_ms() => {
                Err(ValidationError::IntervalTooShort {
                    delta_minutes: utils::ms_to_minutes(delta_ms),
                    min_minutes: f64::from(self.min_interval_minutes),
                })
            }
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "interval"
    }
}
