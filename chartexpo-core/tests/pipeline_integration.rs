//! Integration tests for the calibration & validation pipeline
//!
//! Runs complete inputs through every stage and checks the rendered report.

mod common;

use chartexpo_core::{
    audit::AuditCode,
    calibration::{Anchor, AnchorPair, CalibrationSpec, MidAnchor},
    form::{run_form, FormDecision, FormField, ReferenceForm, ScriptedDriver},
    sample::{ParseFailure, RawSample, TimeBasis},
    PipelineConfig, PipelineError, PipelineInput,
};

use common::{lines_tagged, meta, pipeline, scenarios, ts, MINUTE_MS};

#[test]
fn scenario_a_point_anchors_decode_cleanly() {
    let report = pipeline(PipelineConfig::default())
        .run(scenarios::two_anchored_samples())
        .unwrap();
    let text = report.render().unwrap();

    assert_eq!(
        lines_tagged(&text, "DATA"),
        vec![
            "DATA;DateHeure;Exposition_Vm",
            "DATA;01/01/2024 00:00;0,00",
            "DATA;01/01/2024 01:00;5,00",
        ]
    );
    assert!(report.audit.is_empty());
    assert!(lines_tagged(&text, "AUDIT").is_empty());
    assert_eq!(meta(&text, "Calibration"), Some("POINT_ANCHOR"));
    assert_eq!(meta(&text, "CreatedAt"), Some(common::CREATED_AT));
    assert_eq!(meta(&text, "validMeasures"), Some("2"));
}

#[test]
fn scenario_b_close_measurement_is_nulled() {
    let report = pipeline(PipelineConfig::default().min_interval_minutes(30))
        .run(scenarios::too_close_pair())
        .unwrap();
    let text = report.render().unwrap();

    assert_eq!(report.points[1].value, None);
    assert_eq!(report.counts.valid_measures, 1);
    assert_eq!(
        lines_tagged(&text, "AUDIT"),
        vec!["AUDIT;DELTA_TOO_SMALL;1;deltaMinutes=10,00"]
    );
    assert_eq!(meta(&text, "deltaTooSmallCount"), Some("1"));
    assert!(text.contains("DATA;01/01/2024 00:10;\n") || text.ends_with("DATA;01/01/2024 00:10;"));
}

#[test]
fn scenario_c_spike_does_not_knock_out_neighbors() {
    let report = pipeline(PipelineConfig::default())
        .run(scenarios::spike_between_valid_points())
        .unwrap();

    let values: Vec<_> = report.points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![Some(2.0), None, Some(2.5)]);
    assert_eq!(report.counts.value_out_of_range_count, 1);
    assert_eq!(report.counts.delta_too_small_count, 0);

    let text = report.render().unwrap();
    assert!(text.contains("AUDIT;VALUE_OUT_OF_RANGE;1;value=12,00"));
}

#[test]
fn scenario_d_zero_time_span_produces_nothing() {
    let err = pipeline(PipelineConfig::default())
        .run(scenarios::zero_time_span())
        .unwrap_err();
    assert!(matches!(err, PipelineError::DegenerateCalibration { .. }));
}

#[test]
fn scenario_e_third_anchor_is_mandatory() {
    let err = pipeline(PipelineConfig::default())
        .run(scenarios::undetermined_value_scale())
        .unwrap_err();
    assert_eq!(err, PipelineError::CalibrationAnchorRequired { start: 5.0, end: 5.5 });
}

#[test]
fn scenario_e_applies_to_point_anchors() {
    let err = pipeline(PipelineConfig::default())
        .run(scenarios::undetermined_point_scale())
        .unwrap_err();
    assert_eq!(err, PipelineError::CalibrationAnchorRequired { start: 5.0, end: 5.5 });
}

#[test]
fn point_mid_anchor_resolves_a_flat_scale() {
    let mut input = scenarios::undetermined_point_scale();
    if let CalibrationSpec::PointAnchor { value_mid, .. } = &mut input.calibration {
        *value_mid = Some(MidAnchor::Axis(Anchor::new(4.0, 6.0)));
    }
    let report = pipeline(PipelineConfig::default()).run(input).unwrap();
    let text = report.render().unwrap();

    assert!(text.contains("DATA;01/01/2024 00:00;5,00"));
    assert!(text.contains("DATA;01/01/2024 10:00;7,50"));
    assert_eq!(meta(&text, "ValueAnchorMid"), Some("6,00"));
}

#[test]
fn backwards_time_anchors_are_fatal() {
    let err = pipeline(PipelineConfig::default())
        .run(scenarios::reversed_time_anchors())
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::DegenerateCalibration {
            axis: chartexpo_core::calibration::Axis::Time,
            reason: "time does not advance along the axis",
        }
    );
}

#[test]
fn peak_reading_fixes_an_undetermined_scale() {
    let input = PipelineInput::new(
        vec![
            RawSample::new(0.0, 300.0),
            RawSample::new(50.0, 100.0),
            RawSample::new(100.0, 290.0),
        ],
        CalibrationSpec::Endpoints {
            time_start: ts("01/01/2024 00:00"),
            time_end: ts("02/01/2024 00:00"),
            value_start: 5.0,
            value_end: 5.5,
            value_mid: Some(MidAnchor::Peak {
                timestamp: ts("01/01/2024 12:00"),
                value: 8.0,
            }),
        },
    );
    let text = pipeline(PipelineConfig::default())
        .run_to_text(input)
        .unwrap();

    assert_eq!(
        lines_tagged(&text, "DATA")[1..],
        [
            "DATA;01/01/2024 00:00;5,00",
            "DATA;01/01/2024 12:00;8,00",
            "DATA;02/01/2024 00:00;5,15",
        ]
    );
    assert_eq!(meta(&text, "ValueAnchorMid"), Some("8,00"));
}

#[test]
fn repeated_time_coordinate_is_an_inversion() {
    let t0 = ts("01/01/2024 00:00") as f64;
    let hour = 60.0 * MINUTE_MS;
    let input = PipelineInput::new(
        vec![
            RawSample::new(0.0, 0.0),
            RawSample::new(5.0, 4.0),
            RawSample::new(5.0, 2.0),
            RawSample::new(10.0, 10.0),
        ],
        CalibrationSpec::PointAnchor {
            time: AnchorPair::new(Anchor::new(0.0, t0), Anchor::new(10.0, t0 + 10.0 * hour)),
            value: AnchorPair::new(Anchor::new(0.0, 0.0), Anchor::new(10.0, 5.0)),
            value_mid: None,
        },
    );
    let report = pipeline(PipelineConfig::default()).run(input).unwrap();

    assert_eq!(report.counts.inversion_count, 1);
    assert_eq!(report.counts.delta_too_small_count, 1);
    assert_eq!(report.counts.valid_measures, 3);

    let inversion = report.audit_of(AuditCode::Inversion).next().unwrap();
    assert_eq!(inversion.index, 2);

    let text = report.render().unwrap();
    assert!(text.contains("AUDIT;INVERSION;2;axisX=5"));
    assert_eq!(meta(&text, "Ordering"), Some("IN_PLACE"));
}

#[test]
fn archival_config_appends_pixels_and_stats() {
    let text = pipeline(PipelineConfig::archival().decimal_separator('.'))
        .run_to_text(scenarios::two_anchored_samples())
        .unwrap();

    assert_eq!(meta(&text, "rawSamplesArchived"), Some("YES"));
    assert_eq!(lines_tagged(&text, "PIXELS"), vec!["PIXELS;0;0;0", "PIXELS;1;10;10"]);
    assert!(text.contains("AUDIT;STATS;-1;min=0.00;mean=2.50;max=5.00;count=2"));
    assert_eq!(meta(&text, "statMean"), Some("2.50"));
}

#[test]
fn unresolved_time_keeps_rows_without_dates() {
    let input = PipelineInput::new(
        vec![RawSample::new(2.0, 1.0), RawSample::new(1.0, 3.0), RawSample::new(3.0, 11.0)],
        CalibrationSpec::Direct {
            basis: TimeBasis::Unresolved,
        },
    );
    let report = pipeline(PipelineConfig::default()).run(input).unwrap();
    let text = report.render().unwrap();

    assert_eq!(meta(&text, "TimeBasis"), Some("UNRESOLVED"));
    assert_eq!(
        lines_tagged(&text, "DATA")[1..],
        ["DATA;;3,00", "DATA;;1,00", "DATA;;"]
    );
    assert!(text.contains("AUDIT;WARNING;-1;reason=time axis unresolved"));
    assert_eq!(report.counts.delta_too_small_count, 0);
}

#[test]
fn extraction_failures_and_filtering_are_audited() {
    let t0 = ts("01/01/2024 00:00") as f64;
    let input = PipelineInput::new(
        vec![
            RawSample::new(t0, 1.0),
            RawSample::new(f64::NAN, 1.0),
            RawSample::new(t0 + 60.0 * MINUTE_MS, 1.5),
            RawSample::new(t0 + 60.0 * MINUTE_MS, 1.5),
        ],
        CalibrationSpec::Direct {
            basis: TimeBasis::EpochMillis,
        },
    )
    .with_parse_failures(vec![ParseFailure::new(7, "label not found; retried")]);
    let text = pipeline(PipelineConfig::default()).run_to_text(input).unwrap();

    let audit = lines_tagged(&text, "AUDIT");
    assert_eq!(audit[0], "AUDIT;PARSE_FAILURE;7;reason=label not found, retried");
    assert_eq!(
        audit[1],
        "AUDIT;FILTER_SUMMARY;-1;received=4;nonFinite=1;duplicates=1;kept=2"
    );
    assert_eq!(meta(&text, "parseFailureCount"), Some("1"));
    assert_eq!(meta(&text, "totalMeasures"), Some("2"));
}

#[test]
fn nothing_valid_leaves_statistics_empty() {
    let t0 = ts("01/01/2024 00:00") as f64;
    let input = PipelineInput::new(
        vec![RawSample::new(t0, 20.0), RawSample::new(t0 + 60.0 * MINUTE_MS, 30.0)],
        CalibrationSpec::Direct {
            basis: TimeBasis::EpochMillis,
        },
    );
    let text = pipeline(PipelineConfig::default()).run_to_text(input).unwrap();

    assert_eq!(meta(&text, "validMeasures"), Some("0"));
    assert_eq!(meta(&text, "statMin"), Some(""));
    assert!(text.contains("AUDIT;WARNING;-1;reason=no valid values"));
}

#[test]
fn same_input_renders_identical_bytes() {
    let run = || {
        pipeline(PipelineConfig::archival())
            .run_to_text(scenarios::spike_between_valid_points())
            .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn confirmed_form_drives_an_endpoint_run() {
    let form = ReferenceForm::builder()
        .reference("Site #Nantes_46")
        .address("12; rue Crébillon")
        .build();
    let mut driver = ScriptedDriver::new(vec![
        FormDecision::Edit(FormField::StartDate, "01/01/2024 00:00".into()),
        FormDecision::Edit(FormField::EndDate, "01/01/2024 02:00".into()),
        FormDecision::Edit(FormField::StartExposure, "1,0".into()),
        FormDecision::Edit(FormField::EndExposure, "3,0".into()),
        FormDecision::Confirm,
    ]);
    let setup = run_form(form, &mut driver, 10).unwrap();

    let samples = vec![
        RawSample::new(10.0, 200.0),
        RawSample::new(20.0, 150.0),
        RawSample::new(30.0, 100.0),
    ];
    let text = pipeline(PipelineConfig::default())
        .run_to_text(setup.input(samples, Vec::new(), ','))
        .unwrap();

    assert_eq!(meta(&text, "Reference_Capteur"), Some("Site #Nantes_46"));
    assert_eq!(meta(&text, "Adresse_Capteur"), Some("12, rue Crébillon"));
    assert_eq!(meta(&text, "ExpoFin_Vm"), Some("3,00"));
    assert_eq!(meta(&text, "DateMax"), Some(""));
    assert_eq!(
        lines_tagged(&text, "DATA")[1..],
        [
            "DATA;01/01/2024 00:00;1,00",
            "DATA;01/01/2024 01:00;2,00",
            "DATA;01/01/2024 02:00;3,00",
        ]
    );
    assert_eq!(
        setup.artifact_name(),
        "Site_Nantes_46__20240101-0000__20240101-0200.csv"
    );
}
