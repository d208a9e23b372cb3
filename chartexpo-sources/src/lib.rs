//! Sample Sources and Report Sinks for ChartExpo
//!
//! ## Overview
//!
//! The core pipeline only sees `RawSample`s and produces report text. This
//! crate is the glue around it:
//!
//! ```text
//! chart ─▶ RawSampleSource ─▶ Extraction ─▶ Pipeline ─▶ Artifact ─▶ ReportSink
//!                                   ▲                                 │
//!                            SessionSetup                       SinkOutcome
//! ```
//!
//! ## Source Selection Guide
//!
//! ### SVG path (`svg_path`)
//! The curve's `d` attribute, in pixels. Always available when the chart is
//! rendered; needs the operator's endpoint readings to calibrate.
//!
//! ### Tooltip labels (`labels`)
//! Hover markers whose labels carry `DD/MM/YYYY HH:MM` and a value. Already in
//! domain units, but labels appear asynchronously, so each marker is polled
//! with retries.
//!
//! ### Data model (`data_model`)
//! The chart's own series exported as JSON. Exact values, no calibration.
//!
//! ## Example Usage
//!
//! ```rust
//! use chartexpo_sources::{svg_path::SvgPathSource, RawSampleSource, SampleSpace};
//!
//! # async fn example() -> Result<(), chartexpo_sources::SourceError> {
//! let mut source = SvgPathSource::new("M 0 300 L 10 280 C 12 279 14 276 20 270");
//! let extraction = source.acquire().await?;
//!
//! assert_eq!(extraction.samples.len(), 3);
//! assert_eq!(extraction.space, SampleSpace::Rendering);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "svg-path")]
pub mod svg_path;

#[cfg(feature = "labels")]
pub mod labels;

#[cfg(feature = "data-model")]
pub mod data_model;

pub mod export;
pub mod sink;

pub use export::{ExportJob, ExportSummary};
pub use sink::{Artifact, DirectorySink, FallbackSink, MemorySink, ReportSink, SinkOutcome};

use chartexpo_core::{
    sample::{ParseFailure, RawSample, TimeBasis},
    PipelineError,
};
use thiserror::Error;

/// Errors raised while acquiring samples
#[derive(Debug, Error)]
pub enum SourceError {
    /// Nothing to extract from (missing element, empty path, empty series)
    #[error("Extraction unavailable: {0}")]
    ExtractionUnavailable(String),

    /// Data present but not in the expected shape
    #[error("Malformed source data: {0}")]
    Malformed(String),

    /// JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while writing an artifact
#[derive(Debug, Error)]
pub enum SinkError {
    /// Target exists and replacing is off
    #[error("Artifact already exists: {0}")]
    AlreadyExists(String),

    /// Target directory is gone
    #[error("Destination unavailable: {0}")]
    Unavailable(String),

    /// Any other I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that stop an export job before anything is delivered
#[derive(Debug, Error)]
pub enum ExportError {
    /// Acquisition failed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The pipeline refused to produce a report
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Coordinate space of extracted samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSpace {
    /// Pixels; needs the operator's anchors
    Rendering,
    /// Already `(epoch-ms, value)`
    Domain {
        /// Whether `x` is real time
        basis: TimeBasis,
    },
}

/// What one acquisition produced
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Samples read successfully, in source order
    pub samples: Vec<RawSample>,
    /// Positions that could not be read
    pub failures: Vec<ParseFailure>,
    /// Space the samples live in
    pub space: SampleSpace,
}

impl Extraction {
    /// Extraction in pixel space
    pub fn rendering(samples: Vec<RawSample>, failures: Vec<ParseFailure>) -> Self {
        Self {
            samples,
            failures,
            space: SampleSpace::Rendering,
        }
    }

    /// Extraction already in domain units
    pub fn domain(samples: Vec<RawSample>, failures: Vec<ParseFailure>, basis: TimeBasis) -> Self {
        Self {
            samples,
            failures,
            space: SampleSpace::Domain { basis },
        }
    }
}

/// Anything that can hand over raw samples
///
/// Acquisition is async: label sources wait for the chart to render.
#[async_trait::async_trait]
pub trait RawSampleSource: Send {
    /// Read every sample available now
    async fn acquire(&mut self) -> Result<Extraction, SourceError>;

    /// Source name for logs
    fn name(&self) -> &'static str;
}
