//! Reference scenarios
//!
//! Each builds the input for one documented behavior of the pipeline:
//!
//! | scenario | input | outcome |
//! |---|---|---|
//! | A | two point-anchored samples | two rows, no audit |
//! | B | second point 10 min after the first | `DELTA_TOO_SMALL` |
//! | C | 12 V/m spike between valid points | `VALUE_OUT_OF_RANGE`, neighbors kept |
//! | D | time anchors with equal times | `DegenerateCalibration` |
//! | E | value anchors 5.0 -> 5.5, endpoint or point | `CalibrationAnchorRequired` |

use chartexpo_core::{
    calibration::{Anchor, AnchorPair, CalibrationSpec},
    sample::{RawSample, TimeBasis},
    PipelineInput,
};

use super::{ts, MINUTE_MS};

fn samples(points: &[(f64, f64)]) -> Vec<RawSample> {
    points.iter().map(|&p| RawSample::from(p)).collect()
}

fn direct(points: &[(f64, f64)]) -> PipelineInput {
    PipelineInput::new(
        samples(points),
        CalibrationSpec::Direct {
            basis: TimeBasis::EpochMillis,
        },
    )
}

/// Point anchors: x 0..10 spans one hour, y 0..10 spans 0..5 V/m
pub fn point_anchors() -> CalibrationSpec {
    CalibrationSpec::PointAnchor {
        time: AnchorPair::new(
            Anchor::new(0.0, ts("01/01/2024 00:00") as f64),
            Anchor::new(10.0, ts("01/01/2024 01:00") as f64),
        ),
        value: AnchorPair::new(Anchor::new(0.0, 0.0), Anchor::new(10.0, 5.0)),
        value_mid: None,
    }
}

/// Scenario A
pub fn two_anchored_samples() -> PipelineInput {
    PipelineInput::new(samples(&[(0.0, 0.0), (10.0, 10.0)]), point_anchors())
}

/// Scenario B
pub fn too_close_pair() -> PipelineInput {
    let t0 = ts("01/01/2024 00:00") as f64;
    direct(&[(t0, 2.0), (t0 + 10.0 * MINUTE_MS, 3.0)])
}

/// Scenario C
pub fn spike_between_valid_points() -> PipelineInput {
    let t0 = ts("01/01/2024 00:00") as f64;
    direct(&[
        (t0, 2.0),
        (t0 + 40.0 * MINUTE_MS, 12.0),
        (t0 + 60.0 * MINUTE_MS, 2.5),
    ])
}

/// Scenario D
pub fn zero_time_span() -> PipelineInput {
    let t = ts("01/01/2024 00:00") as f64;
    PipelineInput::new(
        samples(&[(0.0, 0.0), (10.0, 10.0)]),
        CalibrationSpec::PointAnchor {
            time: AnchorPair::new(Anchor::new(0.0, t), Anchor::new(10.0, t)),
            value: AnchorPair::new(Anchor::new(0.0, 0.0), Anchor::new(10.0, 5.0)),
            value_mid: None,
        },
    )
}

/// Scenario E
pub fn undetermined_value_scale() -> PipelineInput {
    PipelineInput::new(
        samples(&[(0.0, 300.0), (50.0, 280.0), (100.0, 290.0)]),
        CalibrationSpec::Endpoints {
            time_start: ts("01/01/2024 00:00"),
            time_end: ts("02/01/2024 00:00"),
            value_start: 5.0,
            value_end: 5.5,
            value_mid: None,
        },
    )
}

/// Scenario E with explicit point anchors
pub fn undetermined_point_scale() -> PipelineInput {
    PipelineInput::new(
        samples(&[(0.0, 0.0), (10.0, 10.0)]),
        CalibrationSpec::PointAnchor {
            time: AnchorPair::new(
                Anchor::new(0.0, ts("01/01/2024 00:00") as f64),
                Anchor::new(10.0, ts("01/01/2024 10:00") as f64),
            ),
            value: AnchorPair::new(Anchor::new(0.0, 5.0), Anchor::new(10.0, 5.5)),
            value_mid: None,
        },
    )
}

/// Time anchors that run backwards along the axis
pub fn reversed_time_anchors() -> PipelineInput {
    PipelineInput::new(
        samples(&[(0.0, 2.0), (5.0, 2.0), (10.0, 2.0)]),
        CalibrationSpec::PointAnchor {
            time: AnchorPair::new(Anchor::new(0.0, 7_200_000.0), Anchor::new(10.0, 0.0)),
            value: AnchorPair::new(Anchor::new(0.0, 0.0), Anchor::new(10.0, 5.0)),
            value_mid: None,
        },
    )
}
