//! Validation Thresholds
//!
//! Defaults for the two domain rules and the tolerances used by the
//! normalizer and calibrator.

// ===== DOMAIN RULES =====

/// Plausible exposure ceiling (V/m).
///
/// Decoded values at or above this are nulled. The comparison is `>=`, so a
/// reading of exactly 10.00 V/m is rejected.
pub const DEFAULT_MAX_PLAUSIBLE_VALUE_VM: f64 = 10.0;

/// Minimum spacing between two valid measurements (minutes).
///
/// The comparison is `<=`: a gap of exactly 30 minutes is too small.
pub const DEFAULT_MIN_INTERVAL_MINUTES: u32 = 30;

// ===== NORMALIZATION =====

/// Two coordinates closer than this are the same coordinate.
pub const SAMPLE_EPSILON: f64 = 1e-9;

/// A series needs two points to define anything.
pub const MIN_SAMPLES: usize = 2;

// ===== CALIBRATION =====

/// Relative change between the start and end value anchors below which the
/// value scale is undetermined without a third anchor.
pub const VALUE_ANCHOR_MIN_RELATIVE_CHANGE: f64 = 0.20;
