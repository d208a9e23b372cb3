//! Shared helpers for the validation rules
//!
//! Pure functions: no state, no allocation, no panics on odd input.

use crate::{
    constants::MS_PER_MINUTE,
    errors::{ValidationError, ValidationResult},
    traits::Validatable,
};

/// Reject values at or above `max`; non-finite values never pass
pub fn check_below(value: f64, max: f64) -> ValidationResult<()> {
    if !value.is_valid() || value >= max {
        Err(ValidationError::OutOfRange { value, max })
    } else {
        Ok(())
    }
}

/// Milliseconds to fractional minutes
pub fn ms_to_minutes(delta_ms: i64) -> f64 {
    delta_ms as f64 / MS_PER_MINUTE as f64
}

/// Whole minutes to milliseconds
pub fn minutes_to_ms(minutes: u32) -> i64 {
    i64::from(minutes) * MS_PER_MINUTE
}
