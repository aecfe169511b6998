//! Integration tests: replay through the compiled binary.
//!
//! Config and log locations are pointed at a scratch directory so the tests
//! never read the user's config or write to their log.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stickylane_cli_{name}"));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn stickylane(name: &str) -> Command {
    let dir = scratch_dir(name);
    let mut command = Command::new(env!("CARGO_BIN_EXE_stickylane"));
    command
        .env("STICKYLANE_CONFIG", dir.join("missing.toml"))
        .env("STICKYLANE_LOG", dir.join("stickylane.log"))
        .env_remove("STICKYLANE_HYSTERESIS_PX");
    command
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is JSON"))
        .collect()
}

fn event_types(values: &[serde_json::Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| v["event"]["type"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn replays_fixture_file_to_jsonl() {
    let output = stickylane("file")
        .arg("tests/fixtures/sticky_round_trip.jsonl")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let values = json_lines(&output);
    let types = event_types(&values);
    assert_eq!(
        types.iter().filter(|t| *t == "mode_changed").count(),
        2,
        "types: {types:?}"
    );
    assert!(types.iter().any(|t| t == "scroll_to"));

    let summary = values.last().expect("summary line");
    assert_eq!(summary["frame"]["mode"], "resting");
    assert_eq!(summary["frame"]["embedded"]["pointer_events"], "auto");
}

#[test]
fn replays_stdin_when_path_is_dash() {
    let mut child = stickylane("stdin")
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn binary");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(br#"{"at_ms": 0, "event": {"type": "scroll", "offset_y": 500}}"#)
        .expect("write trace");

    let output = child.wait_with_output().expect("binary exits");
    assert!(output.status.success());
    let values = json_lines(&output);
    assert_eq!(values[0]["event"]["type"], "mode_changed");
    assert_eq!(values[0]["event"]["to"], "sticky");
}

#[test]
fn hysteresis_flag_widens_band() {
    // Default band is 112 ± 10: 125 would enter. With ± 20 it stays resting.
    let dir = scratch_dir("hysteresis");
    let trace = dir.join("trace.jsonl");
    std::fs::write(
        &trace,
        "{\"at_ms\": 0, \"event\": {\"type\": \"scroll\", \"offset_y\": 125}}\n",
    )
    .expect("write trace");

    let output = stickylane("hysteresis")
        .arg(&trace)
        .args(["--hysteresis", "20"])
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let values = json_lines(&output);
    assert!(!event_types(&values).iter().any(|t| t == "mode_changed"));
    assert_eq!(values.last().expect("summary")["frame"]["thresholds"]["enter"], 132.0);
}

#[test]
fn missing_trace_file_fails() {
    let output = stickylane("missing")
        .arg("tests/fixtures/does_not_exist.jsonl")
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_hysteresis_is_rejected() {
    let output = stickylane("bad_hysteresis")
        .args(["tests/fixtures/sticky_round_trip.jsonl", "--hysteresis", "0"])
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
}
