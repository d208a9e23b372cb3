//! Domain Validation Rules
//!
//! ## Overview
//!
//! Decoded exposure series are checked against two rules that come from how
//! the sensor actually reports:
//!
//! ### 1. Plausible range
//! Exposure at or above `max_plausible_value` (10 V/m by default) cannot come
//! from the monitored installation. The value is nulled.
//!
//! ### 2. Minimum interval
//! The sensor emits at most one measurement per `min_interval_minutes` (30 by
//! default). A point at or under that distance from the previous *valid*
//! point is nulled.
//!
//! Nulling keeps the row: the report still shows the timestamp with an empty
//! value, and the audit trail says why.
//!
//! ## Usage Example
//!
//! ```rust
//! use chartexpo_core::audit::AuditTrail;
//! use chartexpo_core::sample::DecodedPoint;
//! use chartexpo_core::validators::{IntervalRule, RangeRule, SeriesValidator};
//!
//! let validator = SeriesValidator::new(RangeRule::new(10.0), IntervalRule::new(30));
//! let mut points = vec![
//!     DecodedPoint::new(0, 2.0),
//!     DecodedPoint::new(10 * 60_000, 3.0),
//! ];
//! let mut audit = AuditTrail::new();
//!
//! let summary = validator.validate(&mut points, true, &mut audit);
//! assert_eq!(summary.valid, 1);
//! assert_eq!(points[1].value, None);
//! ```

mod interval;
mod range;
mod series;
mod utils;

pub use interval::IntervalRule;
pub use range::RangeRule;
pub use series::{SeriesValidator, ValidationSummary};
