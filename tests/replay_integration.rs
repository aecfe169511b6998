//! Integration tests for trace replay through the public library API.
//!
//! Loads fixture traces the way the binary does (source → parser → engine)
//! and checks the emitted events and the final frame.

use std::path::Path;
use stickylane::integration::{replay_lines, write_jsonl, ReplayOutcome};
use stickylane::model::{
    DisplayMode, LayoutConstants, LayoutSpec, MeasureKind, MeasureSource, TraceError,
};
use stickylane::source::detect_input_source;
use stickylane::state::EngineEvent;

const ROUND_TRIP_FIXTURE: &str = "tests/fixtures/sticky_round_trip.jsonl";
const MALFORMED_FIXTURE: &str = "tests/fixtures/malformed_lines.jsonl";

fn replay_fixture(path: &str) -> ReplayOutcome {
    let mut source = detect_input_source(Path::new(path)).expect("fixture exists");
    let lines = source.read_lines().expect("fixture readable");
    let constants = LayoutConstants::new(LayoutSpec::pixels()).expect("valid constants");
    replay_lines(lines, constants)
}

#[test]
fn round_trip_trace_enters_and_leaves_sticky() {
    let outcome = replay_fixture(ROUND_TRIP_FIXTURE);

    let modes: Vec<(u64, DisplayMode)> = outcome
        .lines
        .iter()
        .filter_map(|line| match line.event {
            EngineEvent::ModeChanged { to, .. } => Some((line.at_ms, to)),
            _ => None,
        })
        .collect();

    // Measured heights give base 112, enter 122, exit 102
    assert_eq!(
        modes,
        vec![(140, DisplayMode::Sticky), (220, DisplayMode::Resting)]
    );
    assert!(outcome.skipped.is_empty());
}

#[test]
fn round_trip_trace_locks_reported_heights() {
    let outcome = replay_fixture(ROUND_TRIP_FIXTURE);

    let locked: Vec<(MeasureKind, f64, MeasureSource)> = outcome
        .events()
        .filter_map(|event| match event {
            EngineEvent::MeasurementLocked { measurement } => Some((
                measurement.kind,
                measurement.height_px,
                measurement.source,
            )),
            _ => None,
        })
        .collect();

    assert_eq!(
        locked,
        vec![
            (MeasureKind::TopBar, 56.0, MeasureSource::Measured),
            (MeasureKind::ActionBar, 48.0, MeasureSource::Measured),
            (MeasureKind::ScrollHeader, 144.0, MeasureSource::Measured),
        ]
    );
}

#[test]
fn round_trip_trace_snaps_resting_offset_to_base() {
    let outcome = replay_fixture(ROUND_TRIP_FIXTURE);

    let snaps: Vec<f64> = outcome
        .events()
        .filter_map(|event| match event {
            EngineEvent::ScrollTo { offset_y } => Some(*offset_y),
            _ => None,
        })
        .collect();

    // 95 is 17 px from base, inside the 30 px snap zone
    assert_eq!(snaps, vec![112.0]);
    assert_eq!(outcome.summary.at_ms, 1000);
    assert_eq!(outcome.summary.frame.thresholds.base, 112.0);
}

#[test]
fn malformed_fixture_skips_bad_lines_only() {
    let outcome = replay_fixture(MALFORMED_FIXTURE);

    assert_eq!(outcome.skipped.len(), 3);
    assert_eq!(outcome.skipped[0].line(), Some(2));
    assert!(matches!(
        outcome.skipped[1],
        TraceError::NonMonotonic { line: 5, .. }
    ));
    assert_eq!(outcome.skipped[2].line(), Some(6));
    assert_eq!(outcome.summary.frame.mode, DisplayMode::Sticky);
}

#[test]
fn jsonl_output_is_one_object_per_line() {
    let outcome = replay_fixture(ROUND_TRIP_FIXTURE);
    let mut buffer = Vec::new();
    write_jsonl(&outcome, &mut buffer).expect("write to vec");

    let text = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), outcome.lines.len() + 1);

    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line).expect("valid JSON line");
        assert!(value.get("at_ms").is_some());
    }
    let summary: serde_json::Value =
        serde_json::from_str(lines[lines.len() - 1]).expect("summary");
    assert_eq!(summary["frame"]["mode"], "resting");
}

#[test]
fn missing_trace_file_is_reported() {
    let result = detect_input_source(Path::new("tests/fixtures/does_not_exist.jsonl"));
    assert!(matches!(result, Err(TraceError::FileNotFound { .. })));
}
