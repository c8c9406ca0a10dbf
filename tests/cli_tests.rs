//! Integration tests for the frameprof binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE_STREAM: &str = "\
# call no gpu_start gpu_dura cpu_start cpu_dura pixels program name
call 0 1000 500 0 0 4096 3 glDrawArrays
call 1 1500 250 0 0 -1 0 glFlush
frame_end
call 2 1750 1000 0 0 2048 3 glDrawElements
frame_end
";

fn write_stream(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("replay.prof");
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Text report
// ============================================================================

#[test]
fn test_text_report_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_stream(&dir, SAMPLE_STREAM);

    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Rendered 2 frames, 3 calls, 1 programs"))
        .stdout(predicate::str::contains("% time"))
        .stdout(predicate::str::contains(" frame "));
}

#[test]
fn test_text_report_from_stdin() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.write_stdin(SAMPLE_STREAM);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Rendered 2 frames"));
}

#[test]
fn test_dash_reads_stdin() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.arg("-").write_stdin(SAMPLE_STREAM);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Rendered 2 frames"));
}

#[test]
fn test_empty_input_reports_no_events() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.write_stdin("");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No events aggregated."));
}

#[test]
fn test_call_listing_shows_call_names() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.arg("--calls").write_stdin(SAMPLE_STREAM);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("glDrawElements"))
        .stdout(predicate::str::contains("glFlush"));
}

#[test]
fn test_call_listing_hidden_by_default() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.write_stdin(SAMPLE_STREAM);

    // Program and frame tables carry no call names.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("glDrawArrays").not());
}

#[test]
fn test_filter_restricts_the_listing() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.args(["--calls", "--filter", "^glDraw"])
        .write_stdin(SAMPLE_STREAM);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("glDrawArrays"))
        .stdout(predicate::str::contains("glFlush").not());
}

#[test]
fn test_top_limits_the_listing() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.args(["--calls", "--top", "1"]).write_stdin(SAMPLE_STREAM);

    // Only the most expensive call is listed.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("glDrawElements"))
        .stdout(predicate::str::contains("glDrawArrays").not());
}

#[test]
fn test_program_restricts_the_listing() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.args(["--calls", "--program", "0"]).write_stdin(SAMPLE_STREAM);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("glFlush"))
        .stdout(predicate::str::contains("glDrawArrays").not());
}

// ============================================================================
// JSON and CSV formats
// ============================================================================

#[test]
fn test_json_output() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.args(["--format", "json"]).write_stdin(SAMPLE_STREAM);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"format\": \"frameprof-json-v1\""))
        .stdout(predicate::str::contains("\"name\": \"glDrawArrays\""))
        .stdout(predicate::str::contains("\"pixel_total\": 6144"));
}

#[test]
fn test_json_output_is_parseable() {
    let dir = TempDir::new().unwrap();
    let path = write_stream(&dir, SAMPLE_STREAM);

    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    let output = cmd.args(["--format", "json"]).arg(&path).output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["summary"]["calls"], 3);
    assert_eq!(parsed["summary"]["frames"], 2);
    assert_eq!(parsed["summary"]["gpu_total"], 1750);
}

#[test]
fn test_csv_defaults_to_program_stats() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.args(["--format", "csv"]).write_stdin(SAMPLE_STREAM);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("program,calls,gpu_total,cpu_total,pixel_total"))
        .stdout(predicate::str::contains("3,2,1500,0,6144"));
}

#[test]
fn test_csv_calls_mode() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.args(["--format", "csv", "--calls"]).write_stdin(SAMPLE_STREAM);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "no,name,program,pixels,gpu_start,gpu_duration,cpu_start,cpu_duration",
        ))
        .stdout(predicate::str::contains("0,glDrawArrays,3,4096,1000,500,0,0"));
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_malformed_lines_are_skipped_not_fatal() {
    let stream = "\
call 0 1000 500 0 0 64 1 glDrawArrays
call 1 oops 500 0 0 64 1 glDrawArrays
call broken
frame_end
";
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.write_stdin(stream);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Rendered 1 frames, 1 calls"))
        .stdout(predicate::str::contains("2 malformed lines skipped"));
}

#[test]
fn test_non_utf8_bytes_are_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("replay.prof");
    let stream: Vec<u8> = [
        &b"call 0 1000 500 0 0 64 1 glDrawArrays\n"[..],
        b"call 1 20\xFF00 500 0 0 64 1 glDrawArrays\n",
        b"frame_end\n",
    ]
    .concat();
    fs::write(&path, &stream).unwrap();

    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Rendered 1 frames, 1 calls"))
        .stdout(predicate::str::contains("1 malformed lines skipped"));
}

#[test]
fn test_missing_file_fails() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.arg("/nonexistent/replay.prof");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}

#[test]
fn test_invalid_filter_pattern_fails() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.args(["--filter", "gl[Draw"]).write_stdin(SAMPLE_STREAM);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid call filter pattern"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("frameprof").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("frameprof"));
}
