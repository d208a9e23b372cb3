//! Report model
//!
//! The report is the only artifact of a run. It is assembled by the pipeline
//! and rendered by [`serializer::render`]:
//!
//! ```text
//! META;Format;EXPO_CAPTEUR_V1
//! META;...                      metadata, counts, thresholds
//! DATA;DateHeure;Exposition_Vm
//! DATA;01/01/2024 00:00;0,00    one per decoded point, empty when nulled
//! AUDIT;DELTA_TOO_SMALL;3;deltaMinutes=10,00
//! PIXELS;0;12.5;300             only when raw samples are archived
//! ```

pub mod format;
pub mod serializer;

use serde::Serialize;

use crate::{
    audit::{AuditCode, AuditRecord},
    calibration::CalibrationKind,
    errors::PipelineResult,
    sample::{DecodeOrdering, DecodedPoint, RawSample, TimeBasis},
    stats::Statistics,
    time::Timestamp,
};

/// Counters written to the metadata section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCounts {
    /// Decoded rows
    pub total_measures: usize,
    /// Rows that kept their value
    pub valid_measures: usize,
    /// INVERSION records
    pub inversion_count: usize,
    /// DELTA_TOO_SMALL records
    pub delta_too_small_count: usize,
    /// VALUE_OUT_OF_RANGE records
    pub value_out_of_range_count: usize,
    /// PARSE_FAILURE records
    pub parse_failure_count: usize,
}

impl ReportCounts {
    /// Derive every counter from the rows and the audit trail
    pub fn tally(points: &[DecodedPoint], audit: &[AuditRecord]) -> Self {
        let count = |code: AuditCode| audit.iter().filter(|r| r.code == code).count();
        Self {
            total_measures: points.len(),
            valid_measures: points.iter().filter(|p| p.is_valid()).count(),
            inversion_count: count(AuditCode::Inversion),
            delta_too_small_count: count(AuditCode::DeltaTooSmall),
            value_out_of_range_count: count(AuditCode::ValueOutOfRange),
            parse_failure_count: count(AuditCode::ParseFailure),
        }
    }
}

/// Everything one run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// When the report was assembled
    pub created_at: Timestamp,
    /// Caller metadata, in caller order
    pub reference: Vec<(String, String)>,
    /// Calibration family used
    pub calibration: CalibrationKind,
    /// Order of `points`
    pub ordering: DecodeOrdering,
    /// Whether timestamps are real time
    pub time_basis: TimeBasis,
    /// Third value anchor, when one was supplied
    pub value_anchor_mid: Option<f64>,
    /// Range rule ceiling
    pub max_plausible_value: f64,
    /// Interval rule minimum
    pub min_interval_minutes: u32,
    /// Decimal separator for rendering
    pub decimal_separator: char,
    /// One row per normalized sample
    pub points: Vec<DecodedPoint>,
    /// Records in emission order
    pub audit: Vec<AuditRecord>,
    /// Statistics over valid rows
    pub stats: Statistics,
    /// Counters
    pub counts: ReportCounts,
    /// Normalized sample count the rows must match
    pub normalized_samples: usize,
    /// Normalized raw samples, when archived
    pub raw_samples: Option<Vec<RawSample>>,
}

impl Report {
    /// Render to report text
    pub fn render(&self) -> PipelineResult<String> {
        serializer::render(self)
    }

    /// Records of one code
    pub fn audit_of(&self, code: AuditCode) -> impl Iterator<Item = &AuditRecord> {
        self.audit.iter().filter(move |r| r.code == code)
    }
}
