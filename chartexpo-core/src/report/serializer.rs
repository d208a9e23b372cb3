//! Report text rendering
//!
//! Output is fully determined by the report: same report, same bytes. Lines
//! are joined with `\n` and the text has no trailing newline.

use crate::{
    audit::{AuditRecord, DetailValue},
    constants::{
        report::{
            DATA_HEADER_TIME, DATA_HEADER_VALUE, FIELD_DELIMITER_STR, TAG_AUDIT, TAG_DATA, TAG_META,
            TAG_PIXELS,
        },
        FORMAT_ID, SCRIPT_VERSION,
    },
    errors::{PipelineError, PipelineResult},
};

use super::{
    format::{
        format_coordinate, format_datetime, format_flag, format_measure, format_optional_measure,
        sanitize_field,
    },
    Report,
};

/// Render `report` as text
///
/// Fails only when the rows no longer mirror the normalized samples.
pub fn render(report: &Report) -> PipelineResult<String> {
    check_row_counts(report)?;

    let sep = report.decimal_separator;
    let mut lines = Vec::with_capacity(
        report.points.len() + report.audit.len() + report.reference.len() + 24,
    );

    write_meta(report, &mut lines);

    lines.push(join(&[TAG_DATA, DATA_HEADER_TIME, DATA_HEADER_VALUE]));
    let resolved = report.time_basis.is_resolved();
    for point in &report.points {
        let date = if resolved {
            format_datetime(point.timestamp_ms)
        } else {
            String::new()
        };
        lines.push(join(&[TAG_DATA, &date, &format_optional_measure(point.value, sep)]));
    }

    for record in &report.audit {
        lines.push(audit_line(record, sep));
    }

    if let Some(samples) = &report.raw_samples {
        for (index, sample) in samples.iter().enumerate() {
            lines.push(join(&[
                TAG_PIXELS,
                &index.to_string(),
                &format_coordinate(sample.x),
                &format_coordinate(sample.y),
            ]));
        }
    }

    log_debug!("rendered report: {} lines", lines.len());
    Ok(lines.join("\n"))
}

fn check_row_counts(report: &Report) -> PipelineResult<()> {
    let samples = report.normalized_samples;
    let archived = report.raw_samples.as_ref().map_or(samples, Vec::len);

    if report.points.len() != samples || archived != samples {
        log_warn!(
            "row count mismatch: {} rows, {} archived samples, {} normalized samples",
            report.points.len(),
            archived,
            samples
        );
        return Err(PipelineError::SerializationError {
            rows: report.points.len(),
            samples,
        });
    }
    Ok(())
}

fn write_meta(report: &Report, lines: &mut Vec<String>) {
    let sep = report.decimal_separator;
    let mut meta = |key: &str, value: &str| lines.push(join(&[TAG_META, key, value]));

    meta("Format", FORMAT_ID);
    meta("ScriptVersion", SCRIPT_VERSION);
    meta("CreatedAt", &format_datetime(report.created_at));

    for (key, value) in &report.reference {
        meta(&sanitize_field(key), &sanitize_field(value));
    }

    meta("Calibration", report.calibration.as_str());
    meta("Ordering", report.ordering.as_str());
    meta("TimeBasis", report.time_basis.as_str());
    meta("ValueAnchorMid", &format_optional_measure(report.value_anchor_mid, sep));
    meta("maxPlausibleValue", &format_measure(report.max_plausible_value, sep));
    meta("minIntervalMinutes", &report.min_interval_minutes.to_string());

    let counts = &report.counts;
    meta("totalMeasures", &counts.total_measures.to_string());
    meta("validMeasures", &counts.valid_measures.to_string());
    meta("inversionCount", &counts.inversion_count.to_string());
    meta("deltaTooSmallCount", &counts.delta_too_small_count.to_string());
    meta("valueOutOfRangeCount", &counts.value_out_of_range_count.to_string());
    meta("parseFailureCount", &counts.parse_failure_count.to_string());

    meta("statMin", &format_optional_measure(report.stats.min, sep));
    meta("statMean", &format_optional_measure(report.stats.mean, sep));
    meta("statMax", &format_optional_measure(report.stats.max, sep));

    meta("rawSamplesArchived", format_flag(report.raw_samples.is_some()));
}

fn audit_line(record: &AuditRecord, sep: char) -> String {
    let mut fields = vec![
        TAG_AUDIT.to_string(),
        record.code.as_str().to_string(),
        record.index.to_string(),
    ];
    for (key, value) in &record.detail {
        let rendered = match value {
            DetailValue::Measure(v) => format_measure(*v, sep),
            DetailValue::Coordinate(v) => format_coordinate(*v),
            DetailValue::Count(n) => n.to_string(),
            DetailValue::Text(text) => sanitize_field(text),
        };
        fields.push(format!("{key}={rendered}"));
    }
    fields.join(FIELD_DELIMITER_STR)
}

fn join(fields: &[&str]) -> String {
    fields.join(FIELD_DELIMITER_STR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        audit::AuditCode,
        calibration::CalibrationKind,
        report::ReportCounts,
        sample::{DecodeOrdering, DecodedPoint, RawSample, TimeBasis},
        stats::summarize,
        time::parse_report_datetime,
    };

    fn report(points: Vec<DecodedPoint>, audit: Vec<AuditRecord>) -> Report {
        let counts = ReportCounts::tally(&points, &audit);
        Report {
            created_at: parse_report_datetime("02/01/2024 08:15").unwrap(),
            reference: vec![("Reference_Capteur".into(), "Site #Nantes_46".into())],
            calibration: CalibrationKind::PointAnchor,
            ordering: DecodeOrdering::InPlace,
            time_basis: TimeBasis::EpochMillis,
            value_anchor_mid: None,
            max_plausible_value: 10.0,
            min_interval_minutes: 30,
            decimal_separator: ',',
            stats: summarize(&points),
            normalized_samples: points.len(),
            points,
            audit,
            counts,
            raw_samples: None,
        }
    }

    #[test]
    fn renders_sections_in_order() {
        let t0 = parse_report_datetime("01/01/2024 00:00").unwrap();
        let report = report(
            vec![
                DecodedPoint::new(t0, 1.0),
                DecodedPoint { timestamp_ms: t0 + 600_000, value: None },
            ],
            vec![AuditRecord::new(AuditCode::DeltaTooSmall, 1)
                .with("deltaMinutes", DetailValue::Measure(10.0))],
        );
        let text = render(&report).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "META;Format;EXPO_CAPTEUR_V1");
        assert_eq!(lines[2], "META;CreatedAt;02/01/2024 08:15");
        assert_eq!(lines[3], "META;Reference_Capteur;Site #Nantes_46");
        assert!(lines.contains(&"META;validMeasures;1"));
        assert!(lines.contains(&"META;statMean;1,00"));
        assert!(lines.contains(&"META;rawSamplesArchived;NO"));

        let header = lines.iter().position(|l| *l == "DATA;DateHeure;Exposition_Vm").unwrap();
        assert_eq!(lines[header + 1], "DATA;01/01/2024 00:00;1,00");
        assert_eq!(lines[header + 2], "DATA;01/01/2024 00:10;");
        assert_eq!(lines[header + 3], "AUDIT;DELTA_TOO_SMALL;1;deltaMinutes=10,00");
        assert_eq!(lines.len(), header + 4);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn archived_samples_become_pixels_lines() {
        let mut report = report(vec![DecodedPoint::new(0, 1.0), DecodedPoint::new(1, 2.0)], vec![]);
        report.raw_samples = Some(vec![RawSample::new(12.5, 300.0), RawSample::new(13.0, 280.25)]);
        let text = render(&report).unwrap();

        assert!(text.contains("META;rawSamplesArchived;YES"));
        assert!(text.ends_with("PIXELS;0;12.5;300\nPIXELS;1;13;280.25"));
    }

    #[test]
    fn unresolved_time_leaves_dates_empty() {
        let mut report = report(vec![DecodedPoint::new(0, 1.0), DecodedPoint::new(1, 2.0)], vec![]);
        report.time_basis = TimeBasis::Unresolved;
        let text = render(&report).unwrap();
        assert!(text.contains("\nDATA;;1,00\nDATA;;2,00"));
        assert!(text.contains("META;TimeBasis;UNRESOLVED"));
    }

    #[test]
    fn row_mismatch_is_a_serialization_error() {
        let mut report = report(vec![DecodedPoint::new(0, 1.0)], vec![]);
        report.normalized_samples = 2;
        assert_eq!(
            render(&report).unwrap_err(),
            PipelineError::SerializationError { rows: 1, samples: 2 }
        );
    }

    #[test]
    fn detail_fields_follow_their_type() {
        let record = AuditRecord::new(AuditCode::Inversion, 4)
            .with("axisX", DetailValue::Coordinate(101.25))
            .with("note", DetailValue::Text("a;b".into()));
        assert_eq!(audit_line(&record, ','), "AUDIT;INVERSION;4;axisX=101.25;note=a,b");

        let warning = AuditRecord::new(AuditCode::Warning, -1);
        assert_eq!(audit_line(&warning, ','), "AUDIT;WARNING;-1");
    }
}
