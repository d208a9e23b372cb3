//! Time handling for decoded series and reports
//!
//! Timestamps are wall-clock milliseconds with no zone attached: an operator
//! types `01/01/2024 00:00`, the chart shows local time, and the report writes
//! the same digits back. Internally the wall clock is encoded as if it were UTC
//! so conversions never depend on the host's zone.
//!
//! Clock sources:
//! - `LocalClock` - host wall clock (report creation stamp)
//! - `SystemClock` - UTC epoch time
//! - `FixedTime` - deterministic, for tests and reproducible runs

use chrono::{DateTime, NaiveDateTime};

use crate::constants::time::{
    COMPACT_DATETIME_FORMAT, REPORT_DATETIME_FORMAT, REPORT_DATETIME_LEN,
};

/// Wall-clock milliseconds since 1970-01-01 00:00
pub type Timestamp = i64;

/// Source of the current time
pub trait TimeSource {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Whether this source follows the real wall clock
    fn is_wall_clock(&self) -> bool;
}

impl<T: TimeSource + ?Sized> TimeSource for Box<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn is_wall_clock(&self) -> bool {
        (**self).is_wall_clock()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn is_wall_clock(&self) -> bool {
        (**self).is_wall_clock()
    }
}

/// Host wall clock in the host's local zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&self) -> Timestamp {
        chrono::Local::now().naive_local().and_utc().timestamp_millis()
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// UTC epoch clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Move the clock to `timestamp`
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move the clock forward
    pub fn advance(&mut self, ms: i64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Parse a `DD/MM/YYYY HH:MM` date
///
/// Surrounding whitespace is ignored. Anything else, including single-digit
/// fields or seconds, is rejected.
pub fn parse_report_datetime(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if text.len() != REPORT_DATETIME_LEN {
        return None;
    }

    NaiveDateTime::parse_from_str(text, REPORT_DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Format as `DD/MM/YYYY HH:MM`, `None` outside the representable range
pub fn format_report_datetime(timestamp: Timestamp) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.naive_utc().format(REPORT_DATETIME_FORMAT).to_string())
}

/// Format as `YYYYMMDD-HHMM` for artifact names
pub fn format_compact_datetime(timestamp: Timestamp) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.naive_utc().format(COMPACT_DATETIME_FORMAT).to_string())
}
