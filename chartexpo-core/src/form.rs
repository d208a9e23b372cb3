//! Reference form
//!
//! Before a run the operator supplies what the chart cannot tell: which sensor
//! it is, and the readings at the start and end of the curve. The form keeps
//! typed values, parses every edit, and only hands out a [`SessionSetup`] once
//! the whole form is consistent.
//!
//! ```text
//! recap ─▶ driver ─┬─ Edit(field, text) ─▶ parse ─▶ recap ...
//!                  ├─ Confirm ─▶ checks ─▶ SessionSetup
//!                  └─ Abort
//! ```
//!
//! ```rust
//! use chartexpo_core::form::{run_form, FormDecision, FormField, ReferenceForm, ScriptedDriver};
//!
//! let form = ReferenceForm::builder().reference("Site #Nantes_46").build();
//! let mut driver = ScriptedDriver::new(vec![
//!     FormDecision::Edit(FormField::StartDate, "01/01/2024 00:00".into()),
//!     FormDecision::Edit(FormField::EndDate, "02/01/2024 00:00".into()),
//!     FormDecision::Edit(FormField::StartExposure, "0,5".into()),
//!     FormDecision::Edit(FormField::EndExposure, "1.5".into()),
//!     FormDecision::Confirm,
//! ]);
//!
//! let setup = run_form(form, &mut driver, 10).unwrap();
//! assert_eq!(setup.artifact_name(), "Site_Nantes_46__20240101-0000__20240102-0000.csv");
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    calibration::{value_anchor_required, CalibrationSpec, MidAnchor},
    constants::DEFAULT_DECIMAL_SEPARATOR,
    errors::{FieldError, FormError},
    naming::artifact_name,
    pipeline::PipelineInput,
    report::format::{format_datetime, format_flag, format_measure},
    sample::{ParseFailure, RawSample},
    time::{parse_report_datetime, Timestamp},
};

/// Editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    /// Sensor reference
    Reference,
    /// Sensor address
    Address,
    /// Time of the first curve point
    StartDate,
    /// Time of the last curve point
    EndDate,
    /// Exposure at the first curve point
    StartExposure,
    /// Exposure at the last curve point
    EndExposure,
    /// Time of the peak reading
    PeakDate,
    /// Exposure at the peak
    PeakExposure,
    /// Append raw samples to the report
    ArchiveRawSamples,
}

impl FormField {
    /// Every field, in recap order
    pub const ALL: [FormField; 9] = [
        FormField::Reference,
        FormField::Address,
        FormField::StartDate,
        FormField::EndDate,
        FormField::StartExposure,
        FormField::EndExposure,
        FormField::PeakDate,
        FormField::PeakExposure,
        FormField::ArchiveRawSamples,
    ];

    /// Human label
    pub const fn label(&self) -> &'static str {
        match self {
            FormField::Reference => "reference",
            FormField::Address => "address",
            FormField::StartDate => "start date",
            FormField::EndDate => "end date",
            FormField::StartExposure => "start exposure (V/m)",
            FormField::EndExposure => "end exposure (V/m)",
            FormField::PeakDate => "peak date",
            FormField::PeakExposure => "peak exposure (V/m)",
            FormField::ArchiveRawSamples => "archive raw samples",
        }
    }

    /// Report metadata key, `None` for fields not copied into the report
    pub const fn meta_key(&self) -> Option<&'static str> {
        match self {
            FormField::Reference => Some("Reference_Capteur"),
            FormField::Address => Some("Adresse_Capteur"),
            FormField::StartDate => Some("DateDebut"),
            FormField::EndDate => Some("DateFin"),
            FormField::StartExposure => Some("ExpoDebut_Vm"),
            FormField::EndExposure => Some("ExpoFin_Vm"),
            FormField::PeakDate => Some("DateMax"),
            FormField::PeakExposure => Some("ExpoMax_Vm"),
            FormField::ArchiveRawSamples => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a decimal typed by an operator
///
/// Only the first whitespace-separated token counts, so `"0,45 V/m"` reads as
/// `0.45`. Both `,` and `.` are accepted as the decimal separator.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let token = text.split_whitespace().next()?;
    token
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a yes/no answer (English or French)
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "o" | "oui" | "true" | "1" => Some(true),
        "n" | "no" | "non" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Operator-supplied reference data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceForm {
    /// Sensor reference, free text
    pub reference: String,
    /// Sensor address, free text
    pub address: String,
    /// Time of the first curve point
    pub start: Option<Timestamp>,
    /// Time of the last curve point
    pub end: Option<Timestamp>,
    /// Exposure at the first curve point
    pub start_exposure: Option<f64>,
    /// Exposure at the last curve point
    pub end_exposure: Option<f64>,
    /// Time of the peak reading
    pub peak_time: Option<Timestamp>,
    /// Exposure at the peak
    pub peak_exposure: Option<f64>,
    /// Append raw samples to the report
    pub archive_raw_samples: bool,
}

impl ReferenceForm {
    /// Empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a pre-filled form
    pub fn builder() -> ReferenceFormBuilder {
        ReferenceFormBuilder::default()
    }

    /// Apply an edit
    ///
    /// Blank text clears an optional value. On a parse error the previous value
    /// is kept.
    pub fn set(&mut self, field: FormField, text: &str) -> Result<(), FieldError> {
        let blank = text.trim().is_empty();
        match field {
            FormField::Reference => self.reference = text.trim().to_string(),
            FormField::Address => self.address = text.trim().to_string(),
            FormField::StartDate => self.start = parse_optional(text, parse_date)?,
            FormField::EndDate => self.end = parse_optional(text, parse_date)?,
            FormField::StartExposure => self.start_exposure = parse_optional(text, parse_number)?,
            FormField::EndExposure => self.end_exposure = parse_optional(text, parse_number)?,
            FormField::PeakDate => self.peak_time = parse_optional(text, parse_date)?,
            FormField::PeakExposure => self.peak_exposure = parse_optional(text, parse_number)?,
            FormField::ArchiveRawSamples => {
                self.archive_raw_samples = if blank {
                    false
                } else {
                    parse_flag(text).ok_or(FieldError::InvalidFlag)?
                }
            }
        }
        Ok(())
    }

    /// Current value of `field` as shown to the operator
    pub fn display(&self, field: FormField, separator: char) -> String {
        let date = |ts: Option<Timestamp>| ts.map(format_datetime).unwrap_or_default();
        let number = |v: Option<f64>| v.map(|v| format_measure(v, separator)).unwrap_or_default();
        match field {
            FormField::Reference => self.reference.clone(),
            FormField::Address => self.address.clone(),
            FormField::StartDate => date(self.start),
            FormField::EndDate => date(self.end),
            FormField::StartExposure => number(self.start_exposure),
            FormField::EndExposure => number(self.end_exposure),
            FormField::PeakDate => date(self.peak_time),
            FormField::PeakExposure => number(self.peak_exposure),
            FormField::ArchiveRawSamples => format_flag(self.archive_raw_samples).to_string(),
        }
    }

    /// One `label: value` line per field
    pub fn recap(&self, separator: char) -> String {
        FormField::ALL
            .iter()
            .map(|field| format!("{}: {}", field.label(), self.display(*field, separator)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check the form and derive the session
    pub fn confirm(&self) -> Result<SessionSetup, FormError> {
        let start = self.start.ok_or(FormError::Missing { field: FormField::StartDate })?;
        let end = self.end.ok_or(FormError::Missing { field: FormField::EndDate })?;
        let start_exposure = self
            .start_exposure
            .ok_or(FormError::Missing { field: FormField::StartExposure })?;
        let end_exposure = self
            .end_exposure
            .ok_or(FormError::Missing { field: FormField::EndExposure })?;

        if end <= start {
            return Err(FormError::EndNotAfterStart);
        }

        let peak = match (self.peak_time, self.peak_exposure) {
            (Some(timestamp), Some(value)) => Some(MidAnchor::Peak { timestamp, value }),
            (None, None) => None,
            _ => return Err(FormError::PeakIncomplete),
        };

        if peak.is_none() && value_anchor_required(start_exposure, end_exposure) {
            return Err(FormError::PeakRequired {
                start: start_exposure,
                end: end_exposure,
            });
        }

        Ok(SessionSetup {
            form: self.clone(),
            calibration: CalibrationSpec::Endpoints {
                time_start: start,
                time_end: end,
                value_start: start_exposure,
                value_end: end_exposure,
                value_mid: peak,
            },
            archive_raw_samples: self.archive_raw_samples,
        })
    }
}

fn parse_date(text: &str) -> Result<Timestamp, FieldError> {
    parse_report_datetime(text).ok_or(FieldError::InvalidDate)
}

fn parse_number(text: &str) -> Result<f64, FieldError> {
    parse_decimal(text).ok_or(FieldError::InvalidNumber)
}

fn parse_optional<T>(
    text: &str,
    parse: fn(&str) -> Result<T, FieldError>,
) -> Result<Option<T>, FieldError> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse(text).map(Some)
    }
}

/// Builder for a pre-filled [`ReferenceForm`]
#[derive(Debug, Clone, Default)]
pub struct ReferenceFormBuilder {
    form: ReferenceForm,
}

impl ReferenceFormBuilder {
    /// Sensor reference
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.form.reference = reference.into();
        self
    }

    /// Sensor address
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.form.address = address.into();
        self
    }

    /// First and last curve times
    pub fn period(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.form.start = Some(start);
        self.form.end = Some(end);
        self
    }

    /// First and last curve exposures
    pub fn exposures(mut self, start: f64, end: f64) -> Self {
        self.form.start_exposure = Some(start);
        self.form.end_exposure = Some(end);
        self
    }

    /// Peak reading
    pub fn peak(mut self, timestamp: Timestamp, exposure: f64) -> Self {
        self.form.peak_time = Some(timestamp);
        self.form.peak_exposure = Some(exposure);
        self
    }

    /// Archive raw samples
    pub fn archive_raw_samples(mut self, archive: bool) -> Self {
        self.form.archive_raw_samples = archive;
        self
    }

    /// Finished form (not yet confirmed)
    pub fn build(self) -> ReferenceForm {
        self.form
    }
}

/// A confirmed form, ready to drive a run
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSetup {
    /// Form as confirmed
    pub form: ReferenceForm,
    /// Endpoint calibration derived from the form
    pub calibration: CalibrationSpec,
    /// Operator asked for raw samples in the report
    pub archive_raw_samples: bool,
}

impl SessionSetup {
    /// Report metadata fields, in report order
    pub fn metadata(&self, separator: char) -> Vec<(String, String)> {
        FormField::ALL
            .iter()
            .filter_map(|field| {
                field
                    .meta_key()
                    .map(|key| (key.to_string(), self.form.display(*field, separator)))
            })
            .collect()
    }

    /// Pipeline input for samples in rendering space
    pub fn input(
        &self,
        samples: Vec<RawSample>,
        failures: Vec<ParseFailure>,
        separator: char,
    ) -> PipelineInput {
        PipelineInput::new(samples, self.calibration)
            .with_reference_fields(self.metadata(separator))
            .with_parse_failures(failures)
    }

    /// File name for the rendered report
    pub fn artifact_name(&self) -> String {
        match self.calibration {
            CalibrationSpec::Endpoints {
                time_start,
                time_end,
                ..
            } => artifact_name(&self.form.reference, time_start, time_end),
            _ => artifact_name(&self.form.reference, 0, 0),
        }
    }
}

/// What the operator wants next
#[derive(Debug, Clone, PartialEq)]
pub enum FormDecision {
    /// Accept the form as shown
    Confirm,
    /// Replace one field
    Edit(FormField, String),
    /// Give up
    Abort,
}

/// Whoever answers the form: a terminal prompt, a UI, a script
pub trait FormDriver {
    /// Look at the recap (and the last problem, if any) and decide
    fn decide(&mut self, recap: &str, problem: Option<&FormError>) -> FormDecision;
}

/// Plays back a fixed list of decisions, then aborts
#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    decisions: std::collections::VecDeque<FormDecision>,
    problems: Vec<FormError>,
}

impl ScriptedDriver {
    /// Driver answering with `decisions` in order
    pub fn new(decisions: Vec<FormDecision>) -> Self {
        Self {
            decisions: decisions.into(),
            problems: Vec::new(),
        }
    }

    /// Problems reported back to the driver so far
    pub fn problems(&self) -> &[FormError] {
        &self.problems
    }
}

impl FormDriver for ScriptedDriver {
    fn decide(&mut self, _recap: &str, problem: Option<&FormError>) -> FormDecision {
        if let Some(problem) = problem {
            self.problems.push(*problem);
        }
        self.decisions.pop_front().unwrap_or(FormDecision::Abort)
    }
}

/// Loop recap → decision until the form confirms
///
/// Each decision uses one round. Rejected edits and failed confirmations are
/// reported back to the driver on the next round.
pub fn run_form<D: FormDriver + ?Sized>(
    mut form: ReferenceForm,
    driver: &mut D,
    max_rounds: usize,
) -> Result<SessionSetup, FormError> {
    let mut problem: Option<FormError> = None;

    for _ in 0..max_rounds {
        let recap = form.recap(DEFAULT_DECIMAL_SEPARATOR);
        match driver.decide(&recap, problem.as_ref()) {
            FormDecision::Confirm => match form.confirm() {
                Ok(setup) => {
                    log_debug!("reference form confirmed for '{}'", setup.form.reference);
                    return Ok(setup);
                }
                Err(error) => {
                    log_warn!("form not confirmed: {}", error);
                    problem = Some(error);
                }
            },
            FormDecision::Edit(field, text) => {
                problem = form
                    .set(field, &text)
                    .err()
                    .map(|error| FormError::Invalid { field, error });
            }
            FormDecision::Abort => return Err(FormError::Aborted),
        }
    }

    Err(FormError::RoundsExhausted { rounds: max_rounds })
}
