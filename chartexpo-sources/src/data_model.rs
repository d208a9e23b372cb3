//! Chart data model extraction
//!
//! Reads a series exported from the chart library as JSON. Two point shapes
//! are accepted, and may be mixed:
//!
//! ```text
//! [[1704067200000, 0.45], {"x": 1704069000000, "y": 0.52}, null, ...]
//! ```
//!
//! `null` (a gap in the series) and anything else that is not a numeric pair
//! become parse failures at their array index.

use serde::Deserialize;
use serde_json::Value;

use chartexpo_core::sample::{ParseFailure, RawSample, TimeBasis};

use crate::{Extraction, RawSampleSource, SourceError};

#[derive(Deserialize)]
#[serde(untagged)]
enum PointShape {
    Pair(f64, f64),
    Object { x: f64, y: f64 },
}

/// Source over an exported JSON series
#[derive(Debug, Clone)]
pub struct DataModelSource {
    json: String,
    basis: TimeBasis,
}

impl DataModelSource {
    /// Series whose `x` values are epoch milliseconds
    pub fn new(json: impl Into<String>) -> Self {
        Self {
            json: json.into(),
            basis: TimeBasis::EpochMillis,
        }
    }

    /// Series whose `x` values are only an order (category axes)
    pub fn unresolved(json: impl Into<String>) -> Self {
        Self {
            json: json.into(),
            basis: TimeBasis::Unresolved,
        }
    }
}

fn read_point(value: Value) -> Result<RawSample, String> {
    if value.is_null() {
        return Err("null point".into());
    }
    let shape: PointShape =
        serde_json::from_value(value).map_err(|_| "not a numeric point".to_string())?;
    Ok(match shape {
        PointShape::Pair(x, y) | PointShape::Object { x, y } => RawSample::new(x, y),
    })
}

/// Parse a JSON series
pub fn parse_series(json: &str, basis: TimeBasis) -> Result<Extraction, SourceError> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Array(points) = root else {
        return Err(SourceError::Malformed("series is not an array".into()));
    };
    if points.is_empty() {
        return Err(SourceError::ExtractionUnavailable("series is empty".into()));
    }

    let mut samples = Vec::with_capacity(points.len());
    let mut failures = Vec::new();
    for (index, point) in points.into_iter().enumerate() {
        match read_point(point) {
            Ok(sample) => samples.push(sample),
            Err(reason) => failures.push(ParseFailure::new(index, reason)),
        }
    }

    log::debug!(
        "data model: {} points, {} failures",
        samples.len(),
        failures.len()
    );
    Ok(Extraction::domain(samples, failures, basis))
}

#[async_trait::async_trait]
impl RawSampleSource for DataModelSource {
    async fn acquire(&mut self) -> Result<Extraction, SourceError> {
        parse_series(&self.json, self.basis)
    }

    fn name(&self) -> &'static str {
        "data-model"
    }
}
