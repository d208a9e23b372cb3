//! Pipeline configuration
//!
//! ```rust
//! use chartexpo_core::PipelineConfig;
//!
//! let config = PipelineConfig::default()
//!     .max_plausible_value(6.0)
//!     .min_interval_minutes(15)
//!     .archive_raw_samples(true);
//!
//! assert_eq!(config.decimal_separator, ',');
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        report::FIELD_DELIMITER, DEFAULT_DECIMAL_SEPARATOR, DEFAULT_MAX_PLAUSIBLE_VALUE_VM,
        DEFAULT_MIN_INTERVAL_MINUTES,
    },
    errors::{PipelineError, PipelineResult},
    validators::{IntervalRule, RangeRule, SeriesValidator},
};

/// Thresholds and report options for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Values at or above this are nulled
    pub max_plausible_value: f64,

    /// Valid measurements must be more than this far apart
    pub min_interval_minutes: u32,

    /// Decimal separator in rendered numbers
    pub decimal_separator: char,

    /// Append the normalized raw samples as PIXELS lines
    pub archive_raw_samples: bool,

    /// Append a STATS audit record when statistics exist
    pub audit_statistics: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_plausible_value: DEFAULT_MAX_PLAUSIBLE_VALUE_VM,
            min_interval_minutes: DEFAULT_MIN_INTERVAL_MINUTES,
            decimal_separator: DEFAULT_DECIMAL_SEPARATOR,
            archive_raw_samples: false,
            audit_statistics: false,
        }
    }
}

impl PipelineConfig {
    /// Dot decimals, for spreadsheets in non-French locales
    pub fn international() -> Self {
        Self {
            decimal_separator: '.',
            ..Self::default()
        }
    }

    /// Keep everything: raw samples and a statistics record
    pub fn archival() -> Self {
        Self {
            archive_raw_samples: true,
            audit_statistics: true,
            ..Self::default()
        }
    }

    /// Load from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the plausible-value ceiling
    pub fn max_plausible_value(mut self, value: f64) -> Self {
        self.max_plausible_value = value;
        self
    }

    /// Set the minimum interval
    pub fn min_interval_minutes(mut self, minutes: u32) -> Self {
        self.min_interval_minutes = minutes;
        self
    }

    /// Set the decimal separator
    pub fn decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Toggle PIXELS lines
    pub fn archive_raw_samples(mut self, archive: bool) -> Self {
        self.archive_raw_samples = archive;
        self
    }

    /// Toggle the STATS record
    pub fn audit_statistics(mut self, enabled: bool) -> Self {
        self.audit_statistics = enabled;
        self
    }

    /// Reject settings that cannot produce a parseable report
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.max_plausible_value.is_finite() {
            return Err(PipelineError::InvalidConfig {
                reason: "max plausible value must be finite",
            });
        }
        let sep = self.decimal_separator;
        if sep == FIELD_DELIMITER || sep.is_ascii_digit() || sep.is_control() || sep == '-' {
            return Err(PipelineError::InvalidConfig {
                reason: "decimal separator clashes with the report grammar",
            });
        }
        Ok(())
    }

    /// Series validator for these thresholds
    pub fn series_validator(&self) -> SeriesValidator {
        SeriesValidator::new(
            RangeRule::new(self.max_plausible_value),
            IntervalRule::new(self.min_interval_minutes),
        )
    }
}
