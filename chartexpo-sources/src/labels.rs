//! Tooltip label polling
//!
//! Charts render their hover labels lazily. For each marker the source asks a
//! [`LabelProbe`] for the label text, retrying with a fixed delay until the
//! label appears or the attempts run out. Labels look like
//! `01/01/2024 00:30 ... 0,45 V/m`; the first date and the first number after
//! it are taken.

use std::{sync::OnceLock, time::Duration};

use regex::Regex;

use chartexpo_core::{
    form::parse_decimal,
    sample::{ParseFailure, RawSample, TimeBasis},
    time::parse_report_datetime,
};

use crate::{Extraction, RawSampleSource, SourceError};

const LABEL_PATTERN: &str = r"(\d{2}/\d{2}/\d{4}\s+\d{2}:\d{2})\D*?(-?\d+(?:[.,]\d+)?)";

/// Something that can show a marker's label
#[async_trait::async_trait]
pub trait LabelProbe: Send {
    /// Label text of `marker`, `None` while it has not rendered
    async fn read_label(&mut self, marker: usize) -> Option<String>;
}

/// Polling settings
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPollConfig {
    /// Markers to read, `0..markers`
    pub markers: usize,
    /// Reads per marker before giving up
    pub max_attempts: u32,
    /// Wait between reads of the same marker
    pub retry_delay: Duration,
}

impl LabelPollConfig {
    /// Poll `markers` markers with default retries
    pub fn new(markers: usize) -> Self {
        Self {
            markers,
            max_attempts: 5,
            retry_delay: Duration::from_millis(200),
        }
    }

    /// Set reads per marker
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the wait between reads
    pub fn retry_delay_ms(mut self, ms: u64) -> Self {
        self.retry_delay = Duration::from_millis(ms);
        self
    }
}

/// Reads direct-mode samples from tooltip labels
pub struct LabelPollSource<P> {
    probe: P,
    config: LabelPollConfig,
}

impl<P: LabelProbe> LabelPollSource<P> {
    /// Source polling `probe`
    pub fn new(probe: P, config: LabelPollConfig) -> Self {
        Self { probe, config }
    }

    /// Polling settings
    pub fn config(&self) -> &LabelPollConfig {
        &self.config
    }

    /// Give the probe back
    pub fn into_probe(self) -> P {
        self.probe
    }

    async fn poll(&mut self, marker: usize) -> Option<String> {
        for attempt in 0..self.config.max_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay).await;
            }
            if let Some(text) = self.probe.read_label(marker).await {
                return Some(text);
            }
        }
        None
    }
}

fn label_pattern() -> &'static Regex {
    static LABELS: OnceLock<Regex> = OnceLock::new();
    LABELS.get_or_init(|| Regex::new(LABEL_PATTERN).expect("label pattern compiles"))
}

/// Parse one label into `(epoch-ms, value)`
pub fn parse_label(text: &str) -> Result<RawSample, String> {
    let captures = label_pattern()
        .captures(text)
        .ok_or_else(|| "label has no date and value".to_string())?;

    let date = captures.get(1).map_or("", |m| m.as_str());
    let timestamp = parse_report_datetime(date).ok_or_else(|| format!("invalid date {date}"))?;

    let number = captures.get(2).map_or("", |m| m.as_str());
    let value = parse_decimal(number).ok_or_else(|| format!("invalid value {number}"))?;

    Ok(RawSample::new(timestamp as f64, value))
}

#[async_trait::async_trait]
impl<P: LabelProbe> RawSampleSource for LabelPollSource<P> {
    async fn acquire(&mut self) -> Result<Extraction, SourceError> {
        if self.config.markers == 0 {
            return Err(SourceError::ExtractionUnavailable(
                "no markers to read".into(),
            ));
        }
        let mut samples = Vec::with_capacity(self.config.markers);
        let mut failures = Vec::new();

        for marker in 0..self.config.markers {
            match self.poll(marker).await {
                Some(text) => match parse_label(&text) {
                    Ok(sample) => samples.push(sample),
                    Err(reason) => failures.push(ParseFailure::new(marker, reason)),
                },
                None => {
                    log::warn!(
                        "marker {} label missing after {} attempts",
                        marker,
                        self.config.max_attempts
                    );
                    failures.push(ParseFailure::new(
                        marker,
                        format!("label missing after {} attempts", self.config.max_attempts),
                    ));
                }
            }
        }

        log::debug!(
            "labels: {} markers, {} samples, {} failures",
            self.config.markers,
            samples.len(),
            failures.len()
        );
        Ok(Extraction::domain(samples, failures, TimeBasis::EpochMillis))
    }

    fn name(&self) -> &'static str {
        "labels"
    }
}
