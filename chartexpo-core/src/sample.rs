//! Sample types flowing through the pipeline
//!
//! ```text
//! RawSample (rendering space) ──calibrate──▶ DecodedPoint (time, value)
//! ```
//!
//! A `RawSample` is whatever the extraction side produced: path control points
//! in pixels, or `(epoch-ms, value)` pairs already read from labels. A
//! `DecodedPoint` keeps its slot for the whole run; validation may only turn
//! its value into `None`.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Point in rendering space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Time-like axis
    pub x: f64,
    /// Value-like axis
    pub y: f64,
}

impl RawSample {
    /// New sample
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for RawSample {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Sample after calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodedPoint {
    /// Wall-clock time, fixed once decoded
    pub timestamp_ms: Timestamp,
    /// Measurement, `None` once a rule rejected it
    pub value: Option<f64>,
}

impl DecodedPoint {
    /// Decoded point with a value
    pub const fn new(timestamp_ms: Timestamp, value: f64) -> Self {
        Self {
            timestamp_ms,
            value: Some(value),
        }
    }

    /// Still a valid measurement
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }
}

/// How the raw time axis relates to real time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeBasis {
    /// `x` is (or calibrates to) wall-clock milliseconds
    #[default]
    EpochMillis,
    /// `x` only orders the samples; no real time can be derived
    Unresolved,
}

impl TimeBasis {
    /// Report identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            TimeBasis::EpochMillis => "EPOCH_MS",
            TimeBasis::Unresolved => "UNRESOLVED",
        }
    }

    /// Real time is available
    pub const fn is_resolved(&self) -> bool {
        matches!(self, TimeBasis::EpochMillis)
    }
}

/// Order the decoder hands its points over in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecodeOrdering {
    /// Normalized axis order kept, inversions recorded where they occur
    InPlace,
    /// Sorted once by timestamp, no inversion records
    SortedByTimestamp,
}

impl DecodeOrdering {
    /// Report identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            DecodeOrdering::InPlace => "IN_PLACE",
            DecodeOrdering::SortedByTimestamp => "SORTED_BY_TIMESTAMP",
        }
    }
}

/// Something the extraction side could not turn into a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseFailure {
    /// Position in the source (token, marker or array index)
    pub position: usize,
    /// What went wrong
    pub reason: String,
}

impl ParseFailure {
    /// New failure note
    pub fn new(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}
