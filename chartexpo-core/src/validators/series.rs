//! Single-pass series validation
//!
//! Walks the decoded series once, left to right. For each point that still
//! has a value:
//!
//! 1. range rule - a failing point is nulled and recorded
//! 2. interval rule against the last valid point - same
//! 3. otherwise the point becomes the new reference for step 2
//!
//! A nulled point never becomes the reference, so one spike cannot knock out
//! the valid measurements around it.

use crate::{
    audit::{AuditCode, AuditRecord, AuditTrail, DetailValue},
    errors::ValidationError,
    sample::DecodedPoint,
    traits::{ValidationContext, Validator},
};

use super::{IntervalRule, RangeRule};

/// Counts produced by one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationSummary {
    /// Nulled by the range rule
    pub value_out_of_range: usize,
    /// Nulled by the interval rule
    pub delta_too_small: usize,
    /// Still valid after the pass
    pub valid: usize,
}

/// Applies the range and interval rules over a whole series
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeriesValidator {
    range: RangeRule,
    interval: IntervalRule,
}

impl SeriesValidator {
    /// Validator from its two rules
    pub fn new(range: RangeRule, interval: IntervalRule) -> Self {
        Self { range, interval }
    }

    /// Null offending values in place and record why
    pub fn validate(
        &self,
        points: &mut [DecodedPoint],
        time_resolved: bool,
        audit: &mut AuditTrail,
    ) -> ValidationSummary {
        let mut context = ValidationContext {
            last_valid: None,
            time_resolved,
        };
        let mut summary = ValidationSummary::default();

        for (index, point) in points.iter_mut().enumerate() {
            let Some(value) = point.value else {
                continue;
            };

            let verdict = self
                .range
                .validate(point, &context)
                .map_err(|error| (self.range.name(), error))
                .and_then(|()| {
                    self.interval
                        .validate(point, &context)
                        .map_err(|error| (self.interval.name(), error))
                });

            match verdict {
                Ok(()) => {
                    context.accept(index, value, point.timestamp_ms);
                    summary.valid += 1;
                }
                Err((_rule, error)) => {
                    log_debug!("point {} nulled by {} rule: {}", index, _rule, error);
                    point.value = None;
                    audit.push(violation_record(index, error));
                    match error {
                        ValidationError::OutOfRange { .. } => summary.value_out_of_range += 1,
                        ValidationError::IntervalTooShort { .. } => summary.delta_too_small += 1,
                    }
                }
            }
        }

        log_debug!(
            "validated {} points: {} valid, {} out of range, {} too close",
            points.len(),
            summary.valid,
            summary.value_out_of_range,
            summary.delta_too_small
        );
        summary
    }
}

fn violation_record(index: usize, error: ValidationError) -> AuditRecord {
    match error {
        ValidationError::OutOfRange { value, .. } => {
            AuditRecord::new(AuditCode::ValueOutOfRange, index as i64)
                .with("value", DetailValue::Measure(value))
        }
        ValidationError::IntervalTooShort { delta_minutes, .. } => {
            AuditRecord::new(AuditCode::DeltaTooSmall, index as i64)
                .with("deltaMinutes", DetailValue::Measure(delta_minutes))
        }
    }
}
