//! Decoding normalized samples into timestamped values
//!
//! Point-anchor calibrations keep the normalized axis order. A sample whose
//! time coordinate does not increase is an inversion: it is recorded and
//! counted, then decoded like any other sample. The interval rule later deals
//! with the consequence.
//!
//! Direct calibrations take the timestamps they are given and sort once by
//! time instead. No inversion records are produced in that mode.

use crate::{
    audit::{AuditCode, AuditRecord, AuditTrail, DetailValue, NO_INDEX},
    calibration::Calibration,
    sample::{DecodeOrdering, DecodedPoint, RawSample},
    time::Timestamp,
};

/// Decoder output
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSeries {
    /// One point per normalized sample
    pub points: Vec<DecodedPoint>,
    /// Order the points are in
    pub ordering: DecodeOrdering,
    /// Inversions recorded in place
    pub inversion_count: usize,
}

fn to_timestamp(domain_ms: f64) -> Timestamp {
    // `as` saturates at the i64 bounds
    domain_ms.round() as Timestamp
}

/// Apply `calibration` to every sample
pub fn decode(
    samples: &[RawSample],
    calibration: &Calibration,
    audit: &mut AuditTrail,
) -> DecodedSeries {
    let series = match calibration {
        Calibration::Linear { .. } => decode_in_place(samples, calibration, audit),
        Calibration::Identity { basis } => {
            if !basis.is_resolved() {
                log_warn!("time axis unresolved, decoding values only");
                audit.push(
                    AuditRecord::new(AuditCode::Warning, NO_INDEX)
                        .with("reason", DetailValue::Text("time axis unresolved".into())),
                );
            }
            decode_sorted(samples, calibration)
        }
    };

    log_debug!(
        "decoded {} points ({}), {} inversions",
        series.points.len(),
        series.ordering.as_str(),
        series.inversion_count
    );
    series
}

fn decode_in_place(
    samples: &[RawSample],
    calibration: &Calibration,
    audit: &mut AuditTrail,
) -> DecodedSeries {
    let mut points = Vec::with_capacity(samples.len());
    let mut inversion_count = 0;
    let mut previous_x = f64::NEG_INFINITY;

    for (index, sample) in samples.iter().enumerate() {
        if sample.x <= previous_x {
            inversion_count += 1;
            audit.push(
                AuditRecord::new(AuditCode::Inversion, index as i64)
                    .with("axisX", DetailValue::Coordinate(sample.x)),
            );
        }
        previous_x = sample.x;

        let (time, value) = calibration.apply(sample);
        points.push(DecodedPoint::new(to_timestamp(time), value));
    }

    DecodedSeries {
        points,
        ordering: DecodeOrdering::InPlace,
        inversion_count,
    }
}

fn decode_sorted(samples: &[RawSample], calibration: &Calibration) -> DecodedSeries {
    let mut points: Vec<DecodedPoint> = samples
        .iter()
        .map(|sample| {
            let (time, value) = calibration.apply(sample);
            DecodedPoint::new(to_timestamp(time), value)
        })
        .collect();
    points.sort_by_key(|point| point.timestamp_ms);

    DecodedSeries {
        points,
        ordering: DecodeOrdering::SortedByTimestamp,
        inversion_count: 0,
    }
}
