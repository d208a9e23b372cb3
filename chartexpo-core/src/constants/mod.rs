//! Constants for ChartExpo Core
//!
//! Centralized numeric and textual constants used by the pipeline. Every
//! threshold that appears in a report is defined here with its unit in the name.
//!
//! ## Organization
//!
//! - **Time**: unit conversions and date layouts
//! - **Validation**: default thresholds and calibration tolerances
//! - **Report**: format identifiers, line tags and column headers

/// Time unit conversions and date layouts.
pub mod time;

/// Default validation thresholds and calibration tolerances.
pub mod validation;

/// Report format identifiers and section tags.
pub mod report;

pub use time::{MS_PER_MINUTE, MS_PER_SECOND, SECONDS_PER_MINUTE};

pub use validation::{
    DEFAULT_MAX_PLAUSIBLE_VALUE_VM, DEFAULT_MIN_INTERVAL_MINUTES, MIN_SAMPLES,
    SAMPLE_EPSILON, VALUE_ANCHOR_MIN_RELATIVE_CHANGE,
};

pub use report::{DEFAULT_DECIMAL_SEPARATOR, FORMAT_ID, SCRIPT_VERSION};
