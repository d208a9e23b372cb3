//! Error Types for the Calibration & Validation Pipeline
//!
//! ## Two Kinds of Failure
//!
//! The pipeline distinguishes failures that make a report meaningless from
//! anomalies that only affect individual points:
//!
//! ### Fatal (`PipelineError`)
//! - `InsufficientSamples`: fewer than two usable samples after normalization
//! - `DegenerateCalibration`: an anchor pair spans zero width, no slope exists
//! - `CalibrationAnchorRequired`: the value anchors leave the scale undetermined
//! - `SerializationError`: the report broke its own row-count invariant
//! - `InvalidConfig`: thresholds or separators that cannot produce a report
//!
//! Nothing is produced when one of these is returned.
//!
//! ### Per-point (`ValidationError`)
//! - `OutOfRange`: value at or above the plausible maximum
//! - `IntervalTooShort`: measurement too close to the previous valid one
//!
//! These never abort a run. The validator turns them into nulled values plus
//! audit records.
//!
//! ### Operator input (`FormError`, `FieldError`)
//! Raised while filling the reference form, before any pipeline run.
//!
//! ## Handling
//!
//! ```rust
//! use chartexpo_core::{Pipeline, PipelineConfig, PipelineError, PipelineInput};
//! use chartexpo_core::calibration::CalibrationSpec;
//! use chartexpo_core::sample::{RawSample, TimeBasis};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let input = PipelineInput::new(
//!     vec![RawSample::new(0.0, 1.0)],
//!     CalibrationSpec::Direct { basis: TimeBasis::EpochMillis },
//! );
//!
//! match pipeline.run(input) {
//!     Ok(_report) => {}
//!     Err(PipelineError::InsufficientSamples { available }) => {
//!         assert_eq!(available, 1);
//!     }
//!     Err(other) => panic!("unexpected: {other}"),
//! }
//! # Ok::<(), PipelineError>(())
//! ```

use thiserror_no_std::Error;

use crate::calibration::Axis;
use crate::form::FormField;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for single-point validation rules
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Fatal pipeline errors - no report can be produced
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PipelineError {
    /// Not enough finite, distinct samples to calibrate anything
    #[error("Insufficient samples: need at least 2 after filtering, have {available}")]
    InsufficientSamples {
        /// Samples left after dropping non-finite points and duplicates
        available: usize,
    },

    /// Anchor pair cannot define a slope
    #[error("Degenerate calibration on the {axis} axis: {reason}")]
    DegenerateCalibration {
        /// Axis whose anchors collapsed
        axis: Axis,
        /// Which condition failed
        reason: &'static str,
    },

    /// Value anchors are too close (or non-positive) to fix the scale
    #[error("Calibration anchor required: value anchors {start} -> {end} need a third reference anchor")]
    CalibrationAnchorRequired {
        /// Start value anchor
        start: f64,
        /// End value anchor
        end: f64,
    },

    /// Decoded rows no longer match the normalized samples
    #[error("Serialization error: {rows} report rows for {samples} normalized samples")]
    SerializationError {
        /// Number of decoded rows in the report
        rows: usize,
        /// Number of normalized samples the rows must mirror
        samples: usize,
    },

    /// Configuration that cannot produce a parseable report
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Offending setting
        reason: &'static str,
    },
}

/// Text that does not parse as the field's type
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Not a `DD/MM/YYYY HH:MM` date
    #[error("expected a date as DD/MM/YYYY HH:MM")]
    InvalidDate,
    /// Not a finite decimal number
    #[error("expected a decimal number")]
    InvalidNumber,
    /// Not a yes/no answer
    #[error("expected yes or no")]
    InvalidFlag,
}

/// Why a reference form could not be confirmed
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FormError {
    /// Required field left empty
    #[error("{field} is required")]
    Missing {
        /// Empty field
        field: FormField,
    },
    /// Edit rejected by the field parser
    #[error("{field}: {error}")]
    Invalid {
        /// Edited field
        field: FormField,
        /// Parser verdict
        error: FieldError,
    },
    /// End date not strictly after the start date
    #[error("end date must be after start date")]
    EndNotAfterStart,
    /// Peak date given without a peak exposure, or the reverse
    #[error("peak date and peak exposure go together")]
    PeakIncomplete,
    /// Endpoint exposures cannot fix the scale and no peak was given
    #[error("exposures {start} -> {end} need a peak reading")]
    PeakRequired {
        /// Start exposure
        start: f64,
        /// End exposure
        end: f64,
    },
    /// Operator gave up
    #[error("form aborted")]
    Aborted,
    /// Operator never confirmed a valid form
    #[error("no valid confirmation after {rounds} rounds")]
    RoundsExhausted {
        /// Rounds allowed
        rounds: usize,
    },
}

/// Per-point rule violations, recorded rather than raised
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    /// Value at or above the plausible maximum (or not a number at all)
    #[error("Value {value} is not below the plausible maximum {max}")]
    OutOfRange {
        /// Decoded value
        value: f64,
        /// Configured plausible maximum
        max: f64,
    },

    /// Too little time since the previous valid measurement
    #[error("Interval of {delta_minutes} min does not exceed the minimum {min_minutes} min")]
    IntervalTooShort {
        /// Minutes since the previous valid measurement
        delta_minutes: f64,
        /// Configured minimum interval
        min_minutes: f64,
    },
}
