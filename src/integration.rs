//! Pure core integration functions.
//!
//! Glue between trace parsing and the engine: turn raw lines into records,
//! drive a [`StickyHeader`] with them, and collect what it produced. No I/O
//! beyond the writer handed to [`write_jsonl`].

use crate::model::{LayoutConstants, Timestamp, TraceError};
use crate::parser::{self, TraceEvent, TraceRecord};
use crate::state::{EngineEvent, StickyHeader};
use crate::view_state::RenderFrame;
use serde::Serialize;
use std::io::Write;
use tracing::warn;

/// Process raw JSONL lines into trace records.
///
/// Blank lines are skipped. Records whose timestamp goes backwards are
/// rejected so the engine only ever sees monotonic time.
///
/// # Returns
///
/// Tuple of (successfully parsed records, per-line errors)
pub fn process_lines(
    lines: Vec<String>,
    starting_line_number: usize,
) -> (Vec<TraceRecord>, Vec<TraceError>) {
    let mut records = Vec::new();
    let mut errors = Vec::new();
    let mut previous_ms: Option<u64> = None;

    for (index, line) in lines.into_iter().enumerate() {
        let line_number = starting_line_number + index;
        if parser::is_blank(&line) {
            continue;
        }
        match parser::parse_record(&line, line_number) {
            Ok(record) => match previous_ms {
                Some(previous) if record.at_ms < previous => {
                    errors.push(TraceError::NonMonotonic {
                        line: line_number,
                        at_ms: record.at_ms,
                        previous_ms: previous,
                    });
                }
                _ => {
                    previous_ms = Some(record.at_ms);
                    records.push(record);
                }
            },
            Err(err) => errors.push(err),
        }
    }

    (records, errors)
}

/// Feed one host input to the engine.
pub fn apply_event(engine: &mut StickyHeader, event: &TraceEvent, now: Timestamp) {
    match event {
        TraceEvent::Layout(report) => engine.report_layout(*report, now),
        TraceEvent::Scroll { offset_y } => engine.scroll(*offset_y, now),
        TraceEvent::Category { category } => engine.category_changed(category, now),
        TraceEvent::Dimensions(dimensions) => engine.dimensions_changed(*dimensions, now),
        TraceEvent::Focus { focused } => engine.set_focused(*focused, now),
        TraceEvent::Transition { transitioning } => engine.set_transitioning(*transitioning, now),
        TraceEvent::Advance => engine.advance(now),
        TraceEvent::Unmount => engine.unmount(),
    }
}

/// One engine event stamped with the input that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayLine {
    /// Time of the input that produced the event.
    pub at_ms: u64,
    /// The event.
    pub event: EngineEvent,
}

/// Final state after a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    /// Time of the last input.
    pub at_ms: u64,
    /// Render frame at that time.
    pub frame: RenderFrame,
}

/// Everything a replay produced.
#[derive(Debug)]
pub struct ReplayOutcome {
    /// Engine events, in order.
    pub lines: Vec<ReplayLine>,
    /// Frame after the last input.
    pub summary: FrameSummary,
    /// Lines that were skipped.
    pub skipped: Vec<TraceError>,
}

impl ReplayOutcome {
    /// Engine events only, in order.
    pub fn events(&self) -> impl Iterator<Item = &EngineEvent> {
        self.lines.iter().map(|line| &line.event)
    }
}

/// Replay parsed records through a fresh engine mounted at time zero.
pub fn replay(records: &[TraceRecord], constants: LayoutConstants) -> ReplayOutcome {
    let mut engine = StickyHeader::new(constants, Timestamp::ZERO);
    let mut lines = Vec::new();
    let mut last = Timestamp::ZERO;

    for record in records {
        let now = Timestamp::from_millis(record.at_ms);
        apply_event(&mut engine, &record.event, now);
        lines.extend(engine.drain_events().into_iter().map(|event| ReplayLine {
            at_ms: record.at_ms,
            event,
        }));
        last = now;
    }

    ReplayOutcome {
        lines,
        summary: FrameSummary {
            at_ms: last.as_millis(),
            frame: engine.frame(last),
        },
        skipped: Vec::new(),
    }
}

/// Parse raw lines and replay them. Bad lines are logged and skipped.
pub fn replay_lines(lines: Vec<String>, constants: LayoutConstants) -> ReplayOutcome {
    let (records, errors) = process_lines(lines, 1);
    for err in &errors {
        warn!(line = err.line(), error = %err, "Skipping trace line");
    }
    let mut outcome = replay(&records, constants);
    outcome.skipped = errors;
    outcome
}

/// Write one JSON line per engine event, then the frame summary.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_jsonl(outcome: &ReplayOutcome, mut out: impl Write) -> std::io::Result<()> {
    for line in &outcome.lines {
        serde_json::to_writer(&mut out, line)?;
        out.write_all(b"\n")?;
    }
    serde_json::to_writer(&mut out, &outcome.summary)?;
    out.write_all(b"\n")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DisplayMode, LayoutSpec};

    fn constants() -> LayoutConstants {
        LayoutConstants::new(LayoutSpec {
            reveal_offset_px: 22.0,
            ..LayoutSpec::pixels()
        })
        .expect("valid constants")
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    // ===== process_lines Tests =====

    #[test]
    fn process_lines_collects_records_and_errors() {
        let (records, errors) = process_lines(
            lines(&[
                r#"{"at_ms": 0, "event": {"type": "scroll", "offset_y": 10}}"#,
                "garbage",
                "",
                r#"{"at_ms": 20, "event": {"type": "advance"}}"#,
            ]),
            1,
        );

        assert_eq!(records.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line(), Some(2));
    }

    #[test]
    fn process_lines_rejects_time_going_backwards() {
        let (records, errors) = process_lines(
            lines(&[
                r#"{"at_ms": 50, "event": {"type": "advance"}}"#,
                r#"{"at_ms": 40, "event": {"type": "advance"}}"#,
                r#"{"at_ms": 50, "event": {"type": "advance"}}"#,
            ]),
            1,
        );

        assert_eq!(records.len(), 2, "equal timestamps are fine");
        assert!(matches!(
            errors[0],
            TraceError::NonMonotonic {
                line: 2,
                at_ms: 40,
                previous_ms: 50
            }
        ));
    }

    #[test]
    fn process_lines_honors_starting_line_number() {
        let (_, errors) = process_lines(lines(&["nope"]), 100);
        assert_eq!(errors[0].line(), Some(100));
    }

    // ===== replay Tests =====

    #[test]
    fn replay_stamps_events_with_input_time() {
        let outcome = replay_lines(
            lines(&[r#"{"at_ms": 30, "event": {"type": "scroll", "offset_y": 150}}"#]),
            constants(),
        );

        assert_eq!(
            outcome.lines,
            vec![ReplayLine {
                at_ms: 30,
                event: EngineEvent::ModeChanged {
                    from: DisplayMode::Resting,
                    to: DisplayMode::Sticky,
                    offset_y: 150.0,
                }
            }]
        );
        assert_eq!(outcome.summary.at_ms, 30);
        assert_eq!(outcome.summary.frame.mode, DisplayMode::Sticky);
    }

    #[test]
    fn replay_skips_bad_lines_and_keeps_going() {
        let outcome = replay_lines(
            lines(&[
                "{",
                r#"{"at_ms": 0, "event": {"type": "scroll", "offset_y": 150}}"#,
            ]),
            constants(),
        );
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.summary.frame.mode, DisplayMode::Sticky);
    }

    #[test]
    fn replay_of_silent_trace_locks_estimates() {
        let outcome = replay_lines(
            lines(&[r#"{"at_ms": 1000, "event": {"type": "advance"}}"#]),
            constants(),
        );
        assert!(outcome
            .events()
            .any(|e| matches!(e, EngineEvent::HeaderPublished { .. })));
    }

    #[test]
    fn write_jsonl_emits_events_then_summary() {
        let outcome = replay_lines(
            lines(&[r#"{"at_ms": 5, "event": {"type": "scroll", "offset_y": 150}}"#]),
            constants(),
        );
        let mut buffer = Vec::new();
        write_jsonl(&outcome, &mut buffer).expect("write to vec");

        let text = String::from_utf8(buffer).expect("utf8");
        let written: Vec<&str> = text.lines().collect();
        assert_eq!(written.len(), 2);

        let first: serde_json::Value = serde_json::from_str(written[0]).expect("json");
        assert_eq!(first["event"]["type"], "mode_changed");
        assert_eq!(first["event"]["to"], "sticky");

        let last: serde_json::Value = serde_json::from_str(written[1]).expect("json");
        assert_eq!(last["frame"]["placement"], "floating");
        assert_eq!(last["frame"]["floating"]["pointer_events"], "auto");
    }
}
