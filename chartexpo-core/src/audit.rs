//! Audit trail
//!
//! Every anomaly the pipeline notices becomes one `AuditRecord`, appended in
//! emission order and never removed. Report counters are derived from the
//! trail so the two cannot disagree.

use serde::Serialize;

/// Audit record category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AuditCode {
    /// Time axis coordinate did not increase
    Inversion,
    /// Measurement too close to the previous valid one
    DeltaTooSmall,
    /// Measurement at or above the plausible maximum
    ValueOutOfRange,
    /// Extraction could not read a sample
    ParseFailure,
    /// Summary statistics
    Stats,
    /// Samples dropped during normalization
    FilterSummary,
    /// Non-fatal condition worth an operator's attention
    Warning,
}

impl AuditCode {
    /// Report identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuditCode::Inversion => "INVERSION",
            AuditCode::DeltaTooSmall => "DELTA_TOO_SMALL",
            AuditCode::ValueOutOfRange => "VALUE_OUT_OF_RANGE",
            AuditCode::ParseFailure => "PARSE_FAILURE",
            AuditCode::Stats => "STATS",
            AuditCode::FilterSummary => "FILTER_SUMMARY",
            AuditCode::Warning => "WARNING",
        }
    }

    /// Whether records of this code point at a nulled measurement
    pub const fn nulls_value(&self) -> bool {
        matches!(self, AuditCode::DeltaTooSmall | AuditCode::ValueOutOfRange)
    }
}

/// Index used by records that do not refer to a single point
pub const NO_INDEX: i64 = -1;

/// Detail field value, kept typed until rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DetailValue {
    /// Domain quantity, rendered with two decimals
    Measure(f64),
    /// Raw coordinate, rendered in shortest round-trip form
    Coordinate(f64),
    /// Whole count
    Count(usize),
    /// Free text
    Text(String),
}

/// One audit record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    /// Category
    pub code: AuditCode,
    /// Point index, or `NO_INDEX`
    pub index: i64,
    /// Ordered detail fields
    pub detail: Vec<(&'static str, DetailValue)>,
}

impl AuditRecord {
    /// Record with no detail yet
    pub fn new(code: AuditCode, index: i64) -> Self {
        Self {
            code,
            index,
            detail: Vec::new(),
        }
    }

    /// Append a detail field
    pub fn with(mut self, key: &'static str, value: DetailValue) -> Self {
        self.detail.push((key, value));
        self
    }

    /// Look up a detail field
    pub fn field(&self, key: &str) -> Option<&DetailValue> {
        self.detail
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }
}

/// Append-only record list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditTrail {
    records: Vec<AuditRecord>,
}

impl AuditTrail {
    /// Empty trail
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn push(&mut self, record: AuditRecord) {
        self.records.push(record);
    }

    /// Records in emission order
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Number of records with `code`
    pub fn count(&self, code: AuditCode) -> usize {
        self.records.iter().filter(|r| r.code == code).count()
    }

    /// Total records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// No records yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hand the records over
    pub fn into_records(self) -> Vec<AuditRecord> {
        self.records
    }
}
