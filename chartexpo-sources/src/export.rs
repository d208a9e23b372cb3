//! Export job
//!
//! acquire → run → render → name → deliver, for one confirmed session.
//!
//! ```rust
//! use chartexpo_core::form::ReferenceForm;
//! use chartexpo_core::time::{parse_report_datetime, FixedTime};
//! use chartexpo_sources::{svg_path::SvgPathSource, ExportJob, MemorySink};
//!
//! # async fn example() -> Result<(), chartexpo_sources::ExportError> {
//! let setup = ReferenceForm::builder()
//!     .reference("Site 46")
//!     .period(
//!         parse_report_datetime("01/01/2024 00:00").unwrap(),
//!         parse_report_datetime("01/01/2024 02:00").unwrap(),
//!     )
//!     .exposures(1.0, 3.0)
//!     .build()
//!     .confirm()
//!     .unwrap();
//!
//! let mut job = ExportJob::new(SvgPathSource::new("M 0 200 L 10 150 L 20 100"), setup, MemorySink::new())
//!     .clock(FixedTime::new(0));
//! let summary = job.run().await?;
//! assert!(summary.outcome.is_saved());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chartexpo_core::{
    calibration::CalibrationSpec,
    form::SessionSetup,
    report::ReportCounts,
    time::{LocalClock, TimeSource},
    Pipeline, PipelineConfig, PipelineInput,
};

use crate::{
    sink::{Artifact, ReportSink, SinkOutcome},
    Extraction, ExportError, RawSampleSource, SampleSpace,
};

/// Label given to report artifacts
pub const REPORT_LABEL: &str = "CSV";

/// What one export produced
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// File name the artifact was delivered under
    pub artifact_name: String,
    /// Sink verdict
    pub outcome: SinkOutcome,
    /// Report counters
    pub counts: ReportCounts,
}

/// One source, one session, one sink
pub struct ExportJob<S, K> {
    source: S,
    setup: SessionSetup,
    config: PipelineConfig,
    clock: Arc<dyn TimeSource + Send + Sync>,
    sink: K,
}

impl<S: RawSampleSource, K: ReportSink> ExportJob<S, K> {
    /// Job with default thresholds and the host wall clock
    pub fn new(source: S, setup: SessionSetup, sink: K) -> Self {
        Self {
            source,
            setup,
            config: PipelineConfig::default(),
            clock: Arc::new(LocalClock),
            sink,
        }
    }

    /// Pipeline thresholds and report options
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Clock for the report creation stamp
    pub fn clock<C: TimeSource + Send + Sync + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Sink the artifacts go to
    pub fn sink(&self) -> &K {
        &self.sink
    }

    fn input(&self, extraction: Extraction) -> PipelineInput {
        let separator = self.config.decimal_separator;
        let Extraction {
            samples,
            failures,
            space,
        } = extraction;

        match space {
            SampleSpace::Rendering => self.setup.input(samples, failures, separator),
            SampleSpace::Domain { basis } => {
                PipelineInput::new(samples, CalibrationSpec::Direct { basis })
                    .with_reference_fields(self.setup.metadata(separator))
                    .with_parse_failures(failures)
            }
        }
    }

    /// Run the whole export once
    pub async fn run(&mut self) -> Result<ExportSummary, ExportError> {
        let extraction = self.source.acquire().await?;
        log::debug!(
            "{}: acquired {} samples, {} failures",
            self.source.name(),
            extraction.samples.len(),
            extraction.failures.len()
        );

        let archive = self.config.archive_raw_samples || self.setup.archive_raw_samples;
        let pipeline = Pipeline::builder()
            .config(self.config.clone().archive_raw_samples(archive))
            .clock(Arc::clone(&self.clock))
            .build()?;

        let report = pipeline.run(self.input(extraction))?;
        let artifact = Artifact::new(self.setup.artifact_name(), report.render()?);

        let outcome = self.sink.deliver(&artifact, REPORT_LABEL);
        log::info!(
            "export {}: {} measures, {} valid, outcome {:?}",
            artifact.name,
            report.counts.total_measures,
            report.counts.valid_measures,
            outcome
        );

        Ok(ExportSummary {
            artifact_name: artifact.name,
            outcome,
            counts: report.counts,
        })
    }
}
