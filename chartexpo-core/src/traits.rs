//! Core traits for validation rules
//!
//! A rule looks at one decoded point plus the context built up by the points
//! before it. Keep them simple: the series pass owns ordering and bookkeeping.

use crate::errors::ValidationResult;
use crate::sample::DecodedPoint;
use crate::time::Timestamp;

/// Last point that survived validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestampedReading {
    /// Position in the decoded series
    pub index: usize,
    /// Measurement
    pub value: f64,
    /// When it was taken
    pub timestamp: Timestamp,
}

/// State carried through the validation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationContext {
    /// Most recent valid reading; nulled points never update it
    pub last_valid: Option<TimestampedReading>,

    /// Whether timestamps are real time (interval checks need them)
    pub time_resolved: bool,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            last_valid: None,
            time_resolved: true,
        }
    }
}

impl ValidationContext {
    /// Remember a point that passed every rule
    pub fn accept(&mut self, index: usize, value: f64, timestamp: Timestamp) {
        self.last_valid = Some(TimestampedReading {
            index,
            value,
            timestamp,
        });
    }

    /// Milliseconds between `timestamp` and the last valid reading
    pub fn time_delta_ms(&self, timestamp: Timestamp) -> Option<i64> {
        self.last_valid
            .map(|last| timestamp.saturating_sub(last.timestamp))
    }
}

/// A rule applied to every point that is still valid
pub trait Validator {
    /// Check one point; `Err` nulls it
    fn validate(&self, point: &DecodedPoint, context: &ValidationContext) -> ValidationResult<()>;

    /// Rule name for logs
    fn name(&self) -> &'static str;
}

/// Values that can be sanity-checked
pub trait Validatable {
    /// Not NaN or infinite
    fn is_valid(&self) -> bool;
}

impl Validatable for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}
