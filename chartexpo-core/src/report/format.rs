//! Locale-fixed field formatting
//!
//! Measures always carry two decimals with the configured separator, dates
//! are `DD/MM/YYYY HH:MM`, raw coordinates keep full precision.

use crate::time::{format_report_datetime, Timestamp};

/// Two decimals, `.` replaced by `separator`
///
/// Values that round to zero never carry a minus sign.
pub fn format_measure(value: f64, separator: char) -> String {
    let mut text = format!("{:.2}", value);
    if text == "-0.00" {
        text.remove(0);
    }
    if separator != '.' {
        text = text.replacen('.', &separator.to_string(), 1);
    }
    text
}

/// Measure or empty field
pub fn format_optional_measure(value: Option<f64>, separator: char) -> String {
    value
        .map(|v| format_measure(v, separator))
        .unwrap_or_default()
}

/// Shortest representation that reads back to the same `f64`
pub fn format_coordinate(value: f64) -> String {
    format!("{}", value)
}

/// `DD/MM/YYYY HH:MM`, empty when out of the calendar's range
pub fn format_datetime(timestamp: Timestamp) -> String {
    format_report_datetime(timestamp).unwrap_or_default()
}

/// Keep free text on one line and inside one field
pub fn sanitize_field(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ';' => ',',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect()
}

/// `YES` / `NO`
pub fn format_flag(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}
