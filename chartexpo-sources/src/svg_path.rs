//! SVG path extraction
//!
//! Reads the curve's `d` attribute. Only the commands a line chart renders are
//! understood:
//!
//! - `M x y` / `L x y` - the point itself
//! - `C x1 y1 x2 y2 x y` - control points skipped, end point kept
//!
//! Any other command letter is skipped with its numbers. A command missing a
//! coordinate becomes a parse failure at the command's token position.

use std::sync::OnceLock;

use regex::Regex;

use chartexpo_core::sample::{ParseFailure, RawSample};

use crate::{Extraction, RawSampleSource, SourceError};

const TOKEN_PATTERN: &str = r"[A-Za-z]|-?\d*\.?\d+(?:e[+-]?\d+)?";

/// Source reading an SVG path `d` attribute
#[derive(Debug, Clone)]
pub struct SvgPathSource {
    path_data: Option<String>,
}

impl SvgPathSource {
    /// Source over `d`
    pub fn new(path_data: impl Into<String>) -> Self {
        Self {
            path_data: Some(path_data.into()),
        }
    }

    /// Source over an attribute that may be absent
    pub fn from_attribute(path_data: Option<&str>) -> Self {
        Self {
            path_data: path_data.map(str::to_string),
        }
    }
}

fn token_pattern() -> &'static Regex {
    static TOKENS: OnceLock<Regex> = OnceLock::new();
    TOKENS.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern compiles"))
}

fn tokenize(path_data: &str) -> Vec<&str> {
    token_pattern()
        .find_iter(path_data)
        .map(|m| m.as_str())
        .collect()
}

fn is_command(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_alphabetic())
}

/// Pull the next `n` numbers following a command
fn take_numbers(tokens: &[&str], cursor: &mut usize, n: usize) -> Option<Vec<f64>> {
    let mut numbers = Vec::with_capacity(n);
    for _ in 0..n {
        let token = tokens.get(*cursor).filter(|t| !is_command(t))?;
        *cursor += 1;
        numbers.push(token.parse::<f64>().ok().filter(|v| v.is_finite())?);
    }
    Some(numbers)
}

/// Parse path data into end points and failures
pub fn parse_path(path_data: &str) -> Result<Extraction, SourceError> {
    let tokens = tokenize(path_data);
    let mut samples = Vec::new();
    let mut failures = Vec::new();
    let mut cursor = 0;

    while cursor < tokens.len() {
        let position = cursor;
        let token = tokens[cursor];
        cursor += 1;

        let (skip, command) = match token {
            "M" | "L" => (0, token),
            "C" => (4, token),
            _ => continue,
        };

        match take_numbers(&tokens, &mut cursor, skip + 2) {
            Some(numbers) => samples.push(RawSample::new(numbers[skip], numbers[skip + 1])),
            None => failures.push(ParseFailure::new(
                position,
                format!("incomplete {command} command"),
            )),
        }
    }

    log::debug!(
        "svg path: {} tokens, {} points, {} failures",
        tokens.len(),
        samples.len(),
        failures.len()
    );
    Ok(Extraction::rendering(samples, failures))
}

#[async_trait::async_trait]
impl RawSampleSource for SvgPathSource {
    async fn acquire(&mut self) -> Result<Extraction, SourceError> {
        match self.path_data.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => parse_path(path),
            _ => Err(SourceError::ExtractionUnavailable(
                "chart path not found or empty".into(),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "svg-path"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_end_points_of_each_command() {
        let extraction = parse_path("M 10 300 L 20 280 C 22 279 25 270 30 260 L 40 255").unwrap();
        assert_eq!(
            extraction.samples,
            vec![
                RawSample::new(10.0, 300.0),
                RawSample::new(20.0, 280.0),
                RawSample::new(30.0, 260.0),
                RawSample::new(40.0, 255.0),
            ]
        );
        assert!(extraction.failures.is_empty());
    }

    #[test]
    fn token_pattern_is_compiled_once() {
        assert!(std::ptr::eq(token_pattern(), token_pattern()));
        assert_eq!(tokenize("M0,1.5L-2"), vec!["M", "0", "1.5", "L", "-2"]);
    }

    #[test]
    fn compact_syntax_and_exponents() {
        let extraction = parse_path("M0,1.5L-2.5e1,.5").unwrap();
        assert_eq!(
            extraction.samples,
            vec![RawSample::new(0.0, 1.5), RawSample::new(-25.0, 0.5)]
        );
    }

    #[test]
    fn incomplete_command_is_a_failure_and_parsing_continues() {
        let extraction = parse_path("M 0 0 L 5 Z L 10 10").unwrap();
        assert_eq!(
            extraction.samples,
            vec![RawSample::new(0.0, 0.0), RawSample::new(10.0, 10.0)]
        );
        assert_eq!(extraction.failures, vec![ParseFailure::new(3, "incomplete L command")]);
    }

    #[test]
    fn unknown_commands_are_skipped() {
        let extraction = parse_path("M 0 0 H 50 L 10 10").unwrap();
        assert_eq!(extraction.samples.len(), 2);
        assert!(extraction.failures.is_empty());
    }

    #[tokio::test]
    async fn empty_or_missing_path_is_unavailable() {
        let mut missing = SvgPathSource::from_attribute(None);
        assert!(matches!(
            missing.acquire().await,
            Err(SourceError::ExtractionUnavailable(_))
        ));

        let mut blank = SvgPathSource::new("   ");
        assert!(matches!(
            blank.acquire().await,
            Err(SourceError::ExtractionUnavailable(_))
        ));
    }
}
