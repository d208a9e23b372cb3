//! Pipeline construction and the run itself

use std::fmt;

use crate::{
    audit::{AuditCode, AuditRecord, AuditTrail, DetailValue},
    config::PipelineConfig,
    decode::decode,
    errors::PipelineResult,
    normalize::{normalize, record_filter_summary},
    report::{Report, ReportCounts},
    stats::aggregate,
    time::{LocalClock, TimeSource},
    validators::SeriesValidator,
};

use super::PipelineInput;

/// Clock handle the pipeline stamps reports with
pub type BoxedClock = Box<dyn TimeSource + Send + Sync>;

/// Configured pipeline, reusable across runs
pub struct Pipeline {
    config: PipelineConfig,
    validator: SeriesValidator,
    clock: BoxedClock,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("wall_clock", &self.clock.is_wall_clock())
            .finish()
    }
}

impl Pipeline {
    /// Pipeline with `config` and the host wall clock
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        Self::builder().config(config).build()
    }

    /// Start building a pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage over `input`
    pub fn run(&self, input: PipelineInput) -> PipelineResult<Report> {
        let PipelineInput {
            samples,
            calibration,
            reference,
            parse_failures,
        } = input;

        let mut audit = AuditTrail::new();
        for failure in &parse_failures {
            audit.push(
                AuditRecord::new(AuditCode::ParseFailure, failure.position as i64)
                    .with("reason", DetailValue::Text(failure.reason.clone())),
            );
        }

        calibration.check_anchor_rule()?;

        let (normalized, filter) = normalize(&samples)?;
        record_filter_summary(&filter, &mut audit);

        let resolved = calibration.resolve(&normalized)?;
        let time_basis = resolved.time_basis();

        let series = decode(&normalized, &resolved, &mut audit);
        let mut points = series.points;

        self.validator
            .validate(&mut points, time_basis.is_resolved(), &mut audit);

        let stats = aggregate(&points, self.config.audit_statistics, &mut audit);

        let audit = audit.into_records();
        let counts = ReportCounts::tally(&points, &audit);

        log_debug!(
            "run complete: {} measures, {} valid, {} audit records",
            counts.total_measures,
            counts.valid_measures,
            audit.len()
        );

        Ok(Report {
            created_at: self.clock.now(),
            reference,
            calibration: calibration.kind(),
            ordering: series.ordering,
            time_basis,
            value_anchor_mid: calibration.value_anchor_mid(),
            max_plausible_value: self.config.max_plausible_value,
            min_interval_minutes: self.config.min_interval_minutes,
            decimal_separator: self.config.decimal_separator,
            normalized_samples: normalized.len(),
            raw_samples: self.config.archive_raw_samples.then_some(normalized),
            points,
            audit,
            stats,
            counts,
        })
    }

    /// Run and render in one step
    pub fn run_to_text(&self, input: PipelineInput) -> PipelineResult<String> {
        self.run(input)?.render()
    }
}

/// Builder for [`Pipeline`]
#[derive(Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    clock: Option<BoxedClock>,
}

impl PipelineBuilder {
    /// Defaults: default thresholds, host wall clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Thresholds and report options
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Clock for the report creation stamp
    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: TimeSource + Send + Sync + 'static,
    {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Validate the configuration and build
    pub fn build(self) -> PipelineResult<Pipeline> {
        self.config.validate()?;
        Ok(Pipeline {
            validator: self.config.series_validator(),
            config: self.config,
            clock: self.clock.unwrap_or_else(|| Box::new(LocalClock)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calibration::{Anchor, AnchorPair, CalibrationKind, CalibrationSpec},
        errors::PipelineError,
        sample::{DecodeOrdering, ParseFailure, RawSample, TimeBasis},
        time::{parse_report_datetime, FixedTime},
    };

    const MINUTE: f64 = 60_000.0;

    fn pipeline(config: PipelineConfig) -> Pipeline {
        Pipeline::builder()
            .config(config)
            .clock(FixedTime::new(0))
            .build()
            .unwrap()
    }

    fn direct(points: &[(f64, f64)]) -> PipelineInput {
        PipelineInput::new(
            points.iter().map(|&p| RawSample::from(p)).collect(),
            CalibrationSpec::Direct {
                basis: TimeBasis::EpochMillis,
            },
        )
    }

    #[test]
    fn invalid_config_is_rejected_at_build() {
        let result = Pipeline::new(PipelineConfig::default().decimal_separator(';'));
        assert!(matches!(result, Err(PipelineError::InvalidConfig { .. })));
    }

    #[test]
    fn parse_failures_are_recorded_first() {
        let input = direct(&[(0.0, 1.0), (60.0 * MINUTE, 2.0)])
            .with_parse_failures(vec![ParseFailure::new(3, "missing label")]);
        let report = pipeline(PipelineConfig::default()).run(input).unwrap();

        assert_eq!(report.counts.parse_failure_count, 1);
        assert_eq!(report.audit[0].code, AuditCode::ParseFailure);
        assert_eq!(report.audit[0].index, 3);
        assert_eq!(report.counts.valid_measures, 2);
    }

    #[test]
    fn direct_mode_sorts_and_validates() {
        let input = direct(&[(60.0 * MINUTE, 2.0), (0.0, 1.0), (70.0 * MINUTE, 3.0)]);
        let report = pipeline(PipelineConfig::default()).run(input).unwrap();

        assert_eq!(report.calibration, CalibrationKind::Direct);
        assert_eq!(report.ordering, DecodeOrdering::SortedByTimestamp);
        let values: Vec<_> = report.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), None]);
        assert_eq!(report.counts.delta_too_small_count, 1);
        assert_eq!(report.created_at, 0);
    }

    #[test]
    fn archive_keeps_normalized_samples() {
        let input = direct(&[(0.0, 1.0), (0.0, 1.0), (60.0 * MINUTE, 2.0)]);
        let report = pipeline(PipelineConfig::archival()).run(input).unwrap();

        assert_eq!(report.raw_samples.as_ref().map(Vec::len), Some(2));
        assert_eq!(report.audit_of(AuditCode::FilterSummary).count(), 1);
        assert_eq!(report.audit_of(AuditCode::Stats).count(), 1);
    }

    #[test]
    fn anchor_rule_runs_before_normalization() {
        let t0 = parse_report_datetime("01/01/2024 00:00").unwrap();
        let input = PipelineInput::new(
            vec![RawSample::new(0.0, 0.0)],
            CalibrationSpec::Endpoints {
                time_start: t0,
                time_end: t0 + 3_600_000,
                value_start: 5.0,
                value_end: 5.5,
                value_mid: None,
            },
        );
        assert_eq!(
            pipeline(PipelineConfig::default()).run(input),
            Err(PipelineError::CalibrationAnchorRequired { start: 5.0, end: 5.5 })
        );
    }

    #[test]
    fn zero_value_span_is_degenerate() {
        let t0 = parse_report_datetime("01/01/2024 00:00").unwrap() as f64;
        let input = PipelineInput::new(
            vec![RawSample::new(0.0, 1.0), RawSample::new(1.0, 2.0)],
            CalibrationSpec::PointAnchor {
                time: AnchorPair::new(Anchor::new(0.0, t0), Anchor::new(1.0, t0 + 3_600_000.0)),
                value: AnchorPair::new(Anchor::new(5.0, 0.0), Anchor::new(5.0, 1.0)),
                value_mid: None,
            },
        );
        let err = pipeline(PipelineConfig::default()).run(input).unwrap_err();
        assert!(matches!(err, PipelineError::DegenerateCalibration { .. }));
    }
}
