use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fridge-monitor"))
}

fn temp_path(name: &str, extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "fridge-monitor-cli-{}-{}.{}",
        name,
        std::process::id(),
        extension
    ))
}

const REPLAY: &str = "axis_x,axis_y,axis_z,temperature_celsius,button_a,button_b\n\
                      10.0,1.0,1.0,5.0,0,0\n\
                      10.0,1.0,1.0,4.0,0,0\n\
                      20.0,1.0,1.0,4.0,0,0\n\
                      9.0,1.0,1.0,4.0,0,0\n";

#[test]
fn default_config_prints_json() {
    let output = cli().arg("default-config").output().expect("default-config");

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON config");
    assert_eq!(json["estimator"]["shake_tolerance"], 2.0);
    assert_eq!(json["timing"]["sample_interval_ms"], 1000);
    assert_eq!(json["output"]["log_path"], "fridge-livedata.csv");
}

#[test]
fn stream_replay_prints_event_lines() {
    let replay = temp_path("stream", "csv");
    std::fs::write(&replay, REPLAY).expect("write replay");

    let output = cli()
        .args(["stream", "--replay", replay.to_str().unwrap()])
        .output()
        .expect("stream command");

    assert!(
        output.status.success(),
        "stream exited with {:?}",
        output.status.code()
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    let kinds: Vec<String> = stdout
        .lines()
        .map(|line| {
            let event: Value = serde_json::from_str(line).expect("event JSON line");
            event["kind"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(kinds, vec!["closed", "cooling", "opened", "closed"]);
    let _ = std::fs::remove_file(&replay);
}

#[test]
fn run_writes_log_and_summary() {
    let replay = temp_path("run-input", "csv");
    let log = temp_path("run-log", "csv");
    std::fs::write(&replay, REPLAY).expect("write replay");

    let output = cli()
        .args([
            "run",
            "--replay",
            replay.to_str().unwrap(),
            "--log-path",
            log.to_str().unwrap(),
            "--settle-ms",
            "0",
            "--interval-ms",
            "0",
        ])
        .output()
        .expect("run command");

    assert!(
        output.status.success(),
        "run exited with {:?}",
        output.status.code()
    );
    let summary: Value = serde_json::from_slice(&output.stdout).expect("summary JSON");
    assert_eq!(summary["samples"], 4);
    assert_eq!(summary["stop_reason"], "source_exhausted");

    let contents = std::fs::read_to_string(&log).expect("event log written");
    let labels: Vec<&str> = contents
        .lines()
        .skip(1)
        .filter_map(|line| line.split(',').next())
        .collect();
    assert_eq!(labels, vec!["Closed", "Lowering", "Open", "Closed"]);

    let _ = std::fs::remove_file(&replay);
    let _ = std::fs::remove_file(&log);
}

#[test]
fn record_then_replay_round_trips_readings() {
    let recording = temp_path("record", "csv");

    let output = cli()
        .args([
            "record",
            "--simulate",
            "--seed",
            "5",
            "--cycles",
            "1",
            "--interval-ms",
            "0",
            "--output",
            recording.to_str().unwrap(),
        ])
        .output()
        .expect("record command");
    assert!(
        output.status.success(),
        "record exited with {:?}",
        output.status.code()
    );

    let contents = std::fs::read_to_string(&recording).expect("recording written");
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("axis_x,axis_y,axis_z,temperature_celsius,button_a,button_b,seconds_since_start")
    );
    let last = contents.lines().last().unwrap_or_default();
    assert!(last.contains(",1,1,"), "last row should hold the stop press: {last}");

    let output = cli()
        .args(["stream", "--replay", recording.to_str().unwrap()])
        .output()
        .expect("stream command");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.contains("\"kind\":\"opened\""), "got {stdout}");

    let _ = std::fs::remove_file(&recording);
}

#[test]
fn missing_source_is_rejected() {
    let output = cli().arg("stream").output().expect("stream command");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.contains("--replay or --simulate"), "got {stderr}");
}
