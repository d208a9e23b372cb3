//! Plausible-value rule
//!
//! The sensor's readings are bounded by what the installation can physically
//! produce. Anything at or above the ceiling is an extraction artifact (a
//! spike from a stray path segment, a misread label) rather than exposure.

use crate::{
    constants::DEFAULT_MAX_PLAUSIBLE_VALUE_VM,
    errors::ValidationResult,
    sample::DecodedPoint,
    traits::{ValidationContext, Validator},
};

use super::utils;

/// Nulls values at or above a ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRule {
    max_plausible_value: f64,
}

impl Default for RangeRule {
    fn default() -> Self {
        Self {
            max_plausible_value: DEFAULT_MAX_PLAUSIBLE_VALUE_VM,
        }
    }
}

impl RangeRule {
    /// Rule with a custom ceiling
    pub fn new(max_plausible_value: f64) -> Self {
        Self { max_plausible_value }
    }

    /// Configured ceiling
    pub fn max_plausible_value(&self) -> f64 {
        self.max_plausible_value
    }
}

impl Validator for RangeRule {
    fn validate(&self, point: &DecodedPoint, _context: &ValidationContext) -> ValidationResult<()> {
        match point.value {
            Some(value) => utils::check_below(value, self.max_plausible_value),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "range"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;

    #[test]
    fn ceiling_is_exclusive() {
        let rule = RangeRule::default();
        let context = ValidationContext::default();

        assert_eq!(rule.name(), "range");
        assert!(rule.validate(&DecodedPoint::new(0, 9.99), &context).is_ok());
        assert_eq!(
            rule.validate(&DecodedPoint::new(0, 10.0), &context),
            Err(ValidationError::OutOfRange { value: 10.0, max: 10.0 })
        );
    }

    #[test]
    fn missing_values_are_left_alone() {
        let rule = RangeRule::new(1.0);
        let point = DecodedPoint { timestamp_ms: 0, value: None };
        assert!(rule.validate(&point, &ValidationContext::default()).is_ok());
    }
}
