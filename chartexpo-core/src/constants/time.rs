//! Time-Related Constants
//!
//! Unit conversions and the fixed date layouts used when reading operator
//! input and writing reports.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: i64 = 1000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: i64 = MS_PER_SECOND * SECONDS_PER_MINUTE;

// ===== DATE LAYOUTS =====

/// Report and operator date layout: `DD/MM/YYYY HH:MM`.
pub const REPORT_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Exact character length of a `DD/MM/YYYY HH:MM` date.
pub const REPORT_DATETIME_LEN: usize = 16;

/// Compact layout used in artifact names: `YYYYMMDD-HHMM`.
pub const COMPACT_DATETIME_FORMAT: &str = "%Y%m%d-%H%M";
