//! Anchor calibration
//!
//! Maps rendering space onto domain space, one axis at a time:
//!
//! ```text
//! domain = domain_start + (axis - axis_start) * slope
//! slope  = (domain_end - domain_start) / (axis_end - axis_start)
//! ```
//!
//! ## Modes
//!
//! - **Point anchors**: the caller knows both axis coordinates and domain values
//!   of two references per axis (gridline labels, known markers).
//! - **Endpoint anchors**: the operator reads the domain values at the first
//!   and last points of the curve; their axis coordinates are taken from the
//!   first and last normalized samples once normalization is done.
//! - **Direct**: samples already carry `(epoch-ms, value)`; identity mapping.
//!
//! ## Undetermined value scale
//!
//! When the start value is non-positive, equal to the end value, or within
//! 20% of it, two value anchors cannot fix the vertical scale and a third
//! value anchor is mandatory. The third anchor then replaces the end anchor
//! for the value slope. The check runs before any sample is decoded.
//!
//! Explicit point anchors are usually read off gridlines, and the lowest
//! gridline is the zero baseline. For them a start value at or below zero is
//! accepted; equal values and changes under 20% still need the third anchor.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::VALUE_ANCHOR_MIN_RELATIVE_CHANGE,
    errors::{PipelineError, PipelineResult},
    sample::{RawSample, TimeBasis},
    time::Timestamp,
};

/// Calibrated axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal, maps to wall-clock milliseconds
    Time,
    /// Vertical, maps to the measured quantity
    Value,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Time => f.write_str("time"),
            Axis::Value => f.write_str("value"),
        }
    }
}

/// Known correspondence between an axis coordinate and a domain value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Coordinate in rendering space
    pub axis: f64,
    /// Real-world value at that coordinate
    pub domain: f64,
}

impl Anchor {
    /// New anchor
    pub const fn new(axis: f64, domain: f64) -> Self {
        Self { axis, domain }
    }
}

/// Two anchors on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPair {
    /// First reference
    pub start: Anchor,
    /// Second reference
    pub end: Anchor,
}

impl AnchorPair {
    /// New pair
    pub const fn new(start: Anchor, end: Anchor) -> Self {
        Self { start, end }
    }
}

/// Third value anchor for an undetermined scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MidAnchor {
    /// Axis coordinate known
    Axis(Anchor),
    /// Value read at a point in time; the axis coordinate is the sample whose
    /// calibrated time is closest to `timestamp`
    Peak {
        /// When the reading was taken
        timestamp: Timestamp,
        /// Reading
        value: f64,
    },
}

impl MidAnchor {
    /// Domain value of the anchor
    pub const fn domain(&self) -> f64 {
        match self {
            MidAnchor::Axis(anchor) => anchor.domain,
            MidAnchor::Peak { value, .. } => *value,
        }
    }
}

/// Calibration requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CalibrationSpec {
    /// Two explicit anchors per axis
    PointAnchor {
        /// Time axis anchors, domain in wall-clock ms
        time: AnchorPair,
        /// Value axis anchors
        value: AnchorPair,
        /// Required when the value anchors cannot fix the scale
        #[serde(default)]
        value_mid: Option<MidAnchor>,
    },
    /// Domain values at the first and last sample
    Endpoints {
        /// Time of the first sample
        time_start: Timestamp,
        /// Time of the last sample
        time_end: Timestamp,
        /// Value of the first sample
        value_start: f64,
        /// Value of the last sample
        value_end: f64,
        /// Required when the endpoint values cannot fix the scale
        value_mid: Option<MidAnchor>,
    },
    /// Samples already in domain units
    Direct {
        /// Whether `x` is real time
        basis: TimeBasis,
    },
}

/// Report identifier of the calibration family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalibrationKind {
    /// Linear, from anchors
    PointAnchor,
    /// Identity
    Direct,
}

impl CalibrationKind {
    /// Report identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            CalibrationKind::PointAnchor => "POINT_ANCHOR",
            CalibrationKind::Direct => "DIRECT",
        }
    }
}

/// Whether endpoint value readings leave the scale undetermined
pub fn value_anchor_required(start: f64, end: f64) -> bool {
    start <= 0.0
        || start == end
        || (end - start).abs() / start < VALUE_ANCHOR_MIN_RELATIVE_CHANGE
}

/// Whether explicit point anchors leave the value scale undetermined
///
/// Like [`value_anchor_required`], but a start value at or below zero is
/// the chart baseline and does not trigger the rule on its own.
pub fn point_value_anchor_required(start: f64, end: f64) -> bool {
    start == end || (start > 0.0 && value_anchor_required(start, end))
}

impl CalibrationSpec {
    /// Calibration family
    pub const fn kind(&self) -> CalibrationKind {
        match self {
            CalibrationSpec::PointAnchor { .. } | CalibrationSpec::Endpoints { .. } => {
                CalibrationKind::PointAnchor
            }
            CalibrationSpec::Direct { .. } => CalibrationKind::Direct,
        }
    }

    /// Domain value of the third value anchor, if one was given
    pub fn value_anchor_mid(&self) -> Option<f64> {
        match self {
            CalibrationSpec::PointAnchor { value_mid, .. }
            | CalibrationSpec::Endpoints { value_mid, .. } => value_mid.map(|mid| mid.domain()),
            CalibrationSpec::Direct { .. } => None,
        }
    }

    /// Time basis the decoded series will have
    pub const fn time_basis(&self) -> TimeBasis {
        match self {
            CalibrationSpec::Direct { basis } => *basis,
            _ => TimeBasis::EpochMillis,
        }
    }

    /// Start and end value anchors, and whether they need a third one
    fn value_scale(&self) -> Option<(f64, f64, bool)> {
        match *self {
            CalibrationSpec::PointAnchor { value, .. } => {
                let (start, end) = (value.start.domain, value.end.domain);
                Some((start, end, point_value_anchor_required(start, end)))
            }
            CalibrationSpec::Endpoints {
                value_start,
                value_end,
                ..
            } => Some((
                value_start,
                value_end,
                value_anchor_required(value_start, value_end),
            )),
            CalibrationSpec::Direct { .. } => None,
        }
    }

    /// Enforce the third-anchor rule; runs before any decoding
    pub fn check_anchor_rule(&self) -> PipelineResult<()> {
        match self.value_scale() {
            Some((start, end, true)) if self.value_anchor_mid().is_none() => {
                log_warn!(
                    "value anchors {} -> {} need a third reference anchor",
                    start,
                    end
                );
                Err(PipelineError::CalibrationAnchorRequired { start, end })
            }
            _ => Ok(()),
        }
    }

    fn mid_replaces_end(&self) -> bool {
        matches!(self.value_scale(), Some((_, _, true)))
    }

    /// Turn the spec into a mapping for these normalized samples
    ///
    /// `samples` must be normalized (sorted, at least two).
    pub fn resolve(&self, samples: &[RawSample]) -> PipelineResult<Calibration> {
        self.check_anchor_rule()?;

        match *self {
            CalibrationSpec::PointAnchor {
                time,
                value,
                value_mid,
            } => {
                let time = LinearMap::time(time)?;
                let end = match value_mid {
                    Some(mid) if self.mid_replaces_end() => mid_axis_anchor(mid, &time, samples),
                    _ => value.end,
                };
                Ok(Calibration::Linear {
                    time,
                    value: LinearMap::value(AnchorPair::new(value.start, end))?,
                })
            }
            CalibrationSpec::Endpoints {
                time_start,
                time_end,
                value_start,
                value_end,
                value_mid,
            } => {
                let (first, last) = match (samples.first(), samples.last()) {
                    (Some(first), Some(last)) => (*first, *last),
                    _ => {
                        return Err(PipelineError::InsufficientSamples {
                            available: samples.len(),
                        })
                    }
                };

                let time = LinearMap::time(AnchorPair::new(
                    Anchor::new(first.x, time_start as f64),
                    Anchor::new(last.x, time_end as f64),
                ))?;

                let start = Anchor::new(first.y, value_start);
                let end = match value_mid {
                    Some(mid) if self.mid_replaces_end() => mid_axis_anchor(mid, &time, samples),
                    _ => Anchor::new(last.y, value_end),
                };

                Ok(Calibration::Linear {
                    time,
                    value: LinearMap::value(AnchorPair::new(start, end))?,
                })
            }
            CalibrationSpec::Direct { basis } => Ok(Calibration::Identity { basis }),
        }
    }
}

fn mid_axis_anchor(mid: MidAnchor, time: &LinearMap, samples: &[RawSample]) -> Anchor {
    match mid {
        MidAnchor::Axis(anchor) => anchor,
        MidAnchor::Peak { timestamp, value } => {
            let target = timestamp as f64;
            // first sample wins ties
            let closest = samples.iter().fold(None::<(f64, &RawSample)>, |best, sample| {
                let distance = (time.apply(sample.x) - target).abs();
                match best {
                    Some((best_distance, _)) if best_distance <= distance => best,
                    _ => Some((distance, sample)),
                }
            });
            let axis = closest.map_or(f64::NAN, |(_, sample)| sample.y);
            Anchor::new(axis, value)
        }
    }
}

/// Linear mapping for one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearMap {
    origin_axis: f64,
    origin_domain: f64,
    slope: f64,
}

impl LinearMap {
    /// Time axis: also requires time to advance along the axis
    pub fn time(pair: AnchorPair) -> PipelineResult<Self> {
        if pair.start.domain == pair.end.domain {
            return Err(degenerate(Axis::Time, "anchors carry the same time"));
        }
        let map = Self::from_anchors(pair, Axis::Time)?;
        if map.slope() <= 0.0 {
            return Err(degenerate(Axis::Time, "time does not advance along the axis"));
        }
        Ok(map)
    }

    /// Value axis
    pub fn value(pair: AnchorPair) -> PipelineResult<Self> {
        Self::from_anchors(pair, Axis::Value)
    }

    fn from_anchors(pair: AnchorPair, axis: Axis) -> PipelineResult<Self> {
        let AnchorPair { start, end } = pair;
        let span = end.axis - start.axis;

        if !span.is_finite() || !start.domain.is_finite() || !end.domain.is_finite() {
            return Err(degenerate(axis, "non-finite anchor"));
        }
        if span == 0.0 {
            return Err(degenerate(axis, "zero axis span"));
        }

        let slope = (end.domain - start.domain) / span;
        if !slope.is_finite() {
            return Err(degenerate(axis, "slope is not finite"));
        }

        Ok(Self {
            origin_axis: start.axis,
            origin_domain: start.domain,
            slope,
        })
    }

    /// Map an axis coordinate into the domain
    pub fn apply(&self, axis: f64) -> f64 {
        self.origin_domain + (axis - self.origin_axis) * self.slope
    }

    /// Domain units per axis unit
    pub fn slope(&self) -> f64 {
        self.slope
    }
}

fn degenerate(axis: Axis, reason: &'static str) -> PipelineError {
    log_warn!("degenerate {} calibration: {}", axis, reason);
    PipelineError::DegenerateCalibration { axis, reason }
}

/// Resolved calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Calibration {
    /// Independent linear maps per axis
    Linear {
        /// Axis to wall-clock ms
        time: LinearMap,
        /// Axis to measured value
        value: LinearMap,
    },
    /// Samples are already domain values
    Identity {
        /// Whether `x` is real time
        basis: TimeBasis,
    },
}

impl Calibration {
    /// Map a sample to `(time, value)` in the domain
    pub fn apply(&self, sample: &RawSample) -> (f64, f64) {
        match self {
            Calibration::Linear { time, value } => (time.apply(sample.x), value.apply(sample.y)),
            Calibration::Identity { .. } => (sample.x, sample.y),
        }
    }

    /// Time basis of the mapped samples
    pub fn time_basis(&self) -> TimeBasis {
        match self {
            Calibration::Linear { .. } => TimeBasis::EpochMillis,
            Calibration::Identity { basis } => *basis,
        }
    }
}
