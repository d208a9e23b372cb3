//! Calibration and validation core for ChartExpo
//!
//! Turns points recovered from a chart rendering into a validated, audited
//! exposure time series and a line-oriented report.
//!
//! Key properties:
//! - one report row per normalized sample, nulled rather than removed
//! - every anomaly leaves an audit record
//! - same input, config and clock give byte-identical output
//!
//! ```no_run
//! use chartexpo_core::{Pipeline, PipelineConfig, PipelineInput};
//! use chartexpo_core::calibration::CalibrationSpec;
//! use chartexpo_core::sample::{RawSample, TimeBasis};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let samples = vec![RawSample::new(0.0, 1.2), RawSample::new(3_600_000.0, 1.4)];
//! let input = PipelineInput::new(samples, CalibrationSpec::Direct { basis: TimeBasis::EpochMillis });
//!
//! match pipeline.run_to_text(input) {
//!     Ok(text) => println!("{text}"),
//!     Err(e) => eprintln!("no report: {e}"),
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod audit;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod decode;
pub mod errors;
pub mod form;
pub mod naming;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod sample;
pub mod stats;
pub mod time;
pub mod traits;
pub mod validators;

// Public API
pub use config::PipelineConfig;
pub use errors::{
    FieldError, FormError, PipelineError, PipelineResult, ValidationError, ValidationResult,
};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineInput};
pub use report::Report;
pub use traits::{ValidationContext, Validator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
