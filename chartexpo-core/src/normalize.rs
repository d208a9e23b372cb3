//! Sample normalization
//!
//! Extraction hands over samples in whatever order the rendering stored them,
//! sometimes with `NaN` coordinates from malformed path data and often with
//! repeated points where segments join. The normalizer:
//!
//! 1. drops samples with a non-finite coordinate
//! 2. sorts by the time-like axis (ties by value axis)
//! 3. collapses samples equal on both axes within `SAMPLE_EPSILON`
//!
//! Fewer than two survivors is fatal: nothing can be calibrated from one point.

use crate::{
    audit::{AuditCode, AuditRecord, AuditTrail, DetailValue, NO_INDEX},
    constants::{MIN_SAMPLES, SAMPLE_EPSILON},
    errors::{PipelineError, PipelineResult},
    sample::RawSample,
};

/// What the normalizer removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSummary {
    /// Samples handed in
    pub received: usize,
    /// Dropped for a non-finite coordinate
    pub non_finite: usize,
    /// Collapsed into an earlier identical sample
    pub duplicates: usize,
    /// Samples kept
    pub kept: usize,
}

impl FilterSummary {
    /// Anything was dropped
    pub fn dropped_any(&self) -> bool {
        self.non_finite > 0 || self.duplicates > 0
    }
}

fn same_sample(a: &RawSample, b: &RawSample) -> bool {
    (a.x - b.x).abs() <= SAMPLE_EPSILON && (a.y - b.y).abs() <= SAMPLE_EPSILON
}

/// `kept` is sorted by `x`; only its tail within epsilon of `candidate.x` can match
fn already_kept(kept: &[RawSample], candidate: &RawSample) -> bool {
    kept.iter()
        .rev()
        .take_while(|k| candidate.x - k.x <= SAMPLE_EPSILON)
        .any(|k| same_sample(k, candidate))
}

/// Filter, sort and deduplicate raw samples
pub fn normalize(samples: &[RawSample]) -> PipelineResult<(Vec<RawSample>, FilterSummary)> {
    let mut finite: Vec<RawSample> = samples.iter().copied().filter(RawSample::is_finite).collect();
    let non_finite = samples.len() - finite.len();

    finite.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let before_dedup = finite.len();
    let mut kept: Vec<RawSample> = Vec::with_capacity(before_dedup);
    for sample in finite {
        if !already_kept(&kept, &sample) {
            kept.push(sample);
        }
    }

    let summary = FilterSummary {
        received: samples.len(),
        non_finite,
        duplicates: before_dedup - kept.len(),
        kept: kept.len(),
    };

    log_debug!(
        "normalized {} samples: {} non-finite, {} duplicates, {} kept",
        summary.received,
        summary.non_finite,
        summary.duplicates,
        summary.kept
    );

    if kept.len() < MIN_SAMPLES {
        log_warn!("only {} usable samples after normalization", kept.len());
        return Err(PipelineError::InsufficientSamples {
            available: kept.len(),
        });
    }

    Ok((kept, summary))
}

/// Record a `FILTER_SUMMARY` when anything was dropped
pub fn record_filter_summary(summary: &FilterSummary, audit: &mut AuditTrail) {
    if !summary.dropped_any() {
        return;
    }

    audit.push(
        AuditRecord::new(AuditCode::FilterSummary, NO_INDEX)
            .with("received", DetailValue::Count(summary.received))
            .with("nonFinite", DetailValue::Count(summary.non_finite))
            .with("duplicates", DetailValue::Count(summary.duplicates))
            .with("kept", DetailValue::Count(summary.kept)),
    );
}
