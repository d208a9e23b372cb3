//! Calibration & validation pipeline
//!
//! ## Overview
//!
//! One run turns extracted samples into a [`Report`](crate::report::Report):
//!
//! ```text
//! RawSample[] ─▶ normalize ─▶ calibrate ─▶ decode ─▶ validate ─▶ stats ─▶ Report
//!                  │              │           │          │          │
//!                  └──────────────┴─────┬─────┴──────────┴──────────┘
//!                                  AuditTrail
//! ```
//!
//! Every stage appends to the same audit trail. Fatal conditions stop the run
//! before anything is produced; everything else ends up as an audit record.
//!
//! ## Ordering of checks
//!
//! 1. extraction failures become `PARSE_FAILURE` records
//! 2. the third value anchor rule, before any sample is looked at
//! 3. normalization (`InsufficientSamples`)
//! 4. anchor resolution (`DegenerateCalibration`)
//! 5. decode, validate, summarize
//!
//! ## Example
//!
//! ```rust
//! use chartexpo_core::calibration::{Anchor, AnchorPair, CalibrationSpec};
//! use chartexpo_core::sample::RawSample;
//! use chartexpo_core::time::{parse_report_datetime, FixedTime};
//! use chartexpo_core::{Pipeline, PipelineConfig, PipelineInput};
//!
//! let t0 = parse_report_datetime("01/01/2024 00:00").unwrap() as f64;
//! let spec = CalibrationSpec::PointAnchor {
//!     time: AnchorPair::new(Anchor::new(0.0, t0), Anchor::new(10.0, t0 + 3_600_000.0)),
//!     value: AnchorPair::new(Anchor::new(0.0, 0.0), Anchor::new(10.0, 1.0)),
//!     value_mid: None,
//! };
//! let samples = vec![RawSample::new(0.0, 0.0), RawSample::new(10.0, 10.0)];
//!
//! let pipeline = Pipeline::builder()
//!     .config(PipelineConfig::default())
//!     .clock(FixedTime::new(0))
//!     .build()
//!     .unwrap();
//! let report = pipeline
//!     .run(PipelineInput::new(samples, spec).with_reference("Reference_Capteur", "Site 46"))
//!     .unwrap();
//!
//! assert_eq!(report.counts.valid_measures, 2);
//! assert!(report.render().unwrap().contains("DATA;01/01/2024 01:00;1,00"));
//! ```

mod builder;

pub use builder::{BoxedClock, Pipeline, PipelineBuilder};

use crate::{
    calibration::CalibrationSpec,
    sample::{ParseFailure, RawSample},
};

/// Everything a run consumes
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineInput {
    /// Samples as extracted
    pub samples: Vec<RawSample>,
    /// How to map them into the domain
    pub calibration: CalibrationSpec,
    /// Caller metadata copied into the report, in order
    pub reference: Vec<(String, String)>,
    /// What extraction could not read
    pub parse_failures: Vec<ParseFailure>,
}

impl PipelineInput {
    /// Input with no metadata and no extraction failures
    pub fn new(samples: Vec<RawSample>, calibration: CalibrationSpec) -> Self {
        Self {
            samples,
            calibration,
            reference: Vec::new(),
            parse_failures: Vec::new(),
        }
    }

    /// Append one metadata field
    pub fn with_reference(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.reference.push((key.into(), value.into()));
        self
    }

    /// Append several metadata fields
    pub fn with_reference_fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.reference
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Attach extraction failures
    pub fn with_parse_failures(mut self, failures: Vec<ParseFailure>) -> Self {
        self.parse_failures.extend(failures);
        self
    }
}
