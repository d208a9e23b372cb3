//! Summary statistics over surviving measurements

use serde::Serialize;

use crate::{
    audit::{AuditCode, AuditRecord, AuditTrail, DetailValue, NO_INDEX},
    sample::DecodedPoint,
};

/// min / mean / max, each `None` when no valid value is left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Statistics {
    /// Smallest valid value
    pub min: Option<f64>,
    /// Arithmetic mean of valid values
    pub mean: Option<f64>,
    /// Largest valid value
    pub max: Option<f64>,
    /// Number of valid values
    pub count: usize,
}

impl Statistics {
    /// Whether any value contributed
    pub fn is_available(&self) -> bool {
        self.count > 0
    }
}

/// Compute over every point that still has a value
pub fn summarize(points: &[DecodedPoint]) -> Statistics {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for value in points.iter().filter_map(|p| p.value) {
        count += 1;
        sum += value;
        min = min.min(value);
        max = max.max(value);
    }

    if count == 0 {
        return Statistics::default();
    }

    Statistics {
        min: Some(min),
        mean: Some(sum / count as f64),
        max: Some(max),
        count,
    }
}

/// Summarize and record the outcome in the audit trail
///
/// No valid value left appends a `WARNING`; `with_record` appends a `STATS`
/// record when statistics exist.
pub fn aggregate(points: &[DecodedPoint], with_record: bool, audit: &mut AuditTrail) -> Statistics {
    let stats = summarize(points);

    match (stats.min, stats.mean, stats.max) {
        (Some(min), Some(mean), Some(max)) => {
            log_debug!("stats over {} values: min={} mean={} max={}", stats.count, min, mean, max);
            if with_record {
                audit.push(
                    AuditRecord::new(AuditCode::Stats, NO_INDEX)
                        .with("min", DetailValue::Measure(min))
                        .with("mean", DetailValue::Measure(mean))
                        .with("max", DetailValue::Measure(max))
                        .with("count", DetailValue::Count(stats.count)),
                );
            }
        }
        _ => {
            log_warn!("no valid values left, statistics not available");
            audit.push(
                AuditRecord::new(AuditCode::Warning, NO_INDEX)
                    .with("reason", DetailValue::Text("no valid values".into())),
            );
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_nulled_points() {
        let points = [
            DecodedPoint::new(0, 1.0),
            DecodedPoint { timestamp_ms: 1, value: None },
            DecodedPoint::new(2, 3.0),
            DecodedPoint::new(3, 2.0),
        ];
        let stats = summarize(&points);

        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.mean, Some(2.0));
        assert_eq!(stats.max, Some(3.0));
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn nothing_valid_is_not_available_and_warns() {
        let points = [DecodedPoint { timestamp_ms: 0, value: None }];
        let mut audit = AuditTrail::new();
        let stats = aggregate(&points, true, &mut audit);

        assert!(!stats.is_available());
        assert_eq!(stats.mean, None);
        assert_eq!(audit.count(AuditCode::Warning), 1);
        assert_eq!(audit.count(AuditCode::Stats), 0);
        assert_eq!(audit.records()[0].index, NO_INDEX);
    }

    #[test]
    fn stats_record_is_opt_in() {
        let points = [DecodedPoint::new(0, 1.0)];
        let mut audit = AuditTrail::new();
        aggregate(&points, false, &mut audit);
        assert!(audit.is_empty());

        aggregate(&points, true, &mut audit);
        assert_eq!(audit.count(AuditCode::Stats), 1);
        assert_eq!(audit.records()[0].field("count"), Some(&DetailValue::Count(1)));
    }
}
