//! Shared helpers for integration tests
//!
//! - fixed clock and pipeline construction
//! - report text helpers (line lookup, META values)
//! - the reference scenarios in [`scenarios`]

#![allow(dead_code)]

pub mod scenarios;

use chartexpo_core::{
    time::{parse_report_datetime, FixedTime, Timestamp},
    Pipeline, PipelineConfig,
};

/// Creation stamp used by every test pipeline
pub const CREATED_AT: &str = "02/01/2024 08:15";

/// Milliseconds in a minute, as f64 for raw coordinates
pub const MINUTE_MS: f64 = 60_000.0;

/// Parse a report date or panic
pub fn ts(text: &str) -> Timestamp {
    parse_report_datetime(text).unwrap_or_else(|| panic!("bad test date {text}"))
}

/// Pipeline with a frozen clock
pub fn pipeline(config: PipelineConfig) -> Pipeline {
    Pipeline::builder()
        .config(config)
        .clock(FixedTime::new(ts(CREATED_AT)))
        .build()
        .expect("test config is valid")
}

/// Value of `META;<key>;...`
pub fn meta<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let prefix = format!("META;{key};");
    text.lines().find_map(|line| line.strip_prefix(prefix.as_str()))
}

/// Lines starting with `tag;`
pub fn lines_tagged<'a>(text: &'a str, tag: &str) -> Vec<&'a str> {
    let prefix = format!("{tag};");
    text.lines().filter(|l| l.starts_with(prefix.as_str())).collect()
}
