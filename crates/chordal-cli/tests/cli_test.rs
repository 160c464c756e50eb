use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

const ABC: &str = r#"[
  { "": "A", "A": 0, "B": 10, "C": 0 },
  { "": "B", "A": 4, "B": 0, "C": 6 },
  { "": "C", "A": 0, "B": 0, "C": 0 }
]"#;

fn write_fixture(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("write fixture");
    path
}

fn run_json(args: &[&str]) -> Value {
    let exe = assert_cmd::cargo_bin!("chordal-cli");
    let output = Command::new(exe).args(args).output().expect("run cli");
    assert!(
        output.status.success(),
        "cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn layout_prints_the_scene() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(&tmp, "abc.json", ABC);

    let scene = run_json(&["layout", input.to_string_lossy().as_ref()]);
    assert_eq!(scene["width"], 800.0);
    assert_eq!(scene["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(scene["zones"].as_array().unwrap().len(), 6);
    assert_eq!(scene["chords"].as_array().unwrap().len(), 3);
    assert_eq!(scene["chords"][0]["title"], "10");
    assert_eq!(scene["guides"][0]["id"], "labelCircle0");
}

#[test]
fn config_and_id_are_applied() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(&tmp, "abc.json", ABC);
    let config = write_fixture(
        &tmp,
        "config.json",
        r##"{ "width": 400, "primaryColor": "#000000" }"##,
    );

    let scene = run_json(&[
        "layout",
        "--config",
        config.to_string_lossy().as_ref(),
        "--id",
        "flows",
        input.to_string_lossy().as_ref(),
    ]);
    assert_eq!(scene["width"], 400.0);
    assert_eq!(scene["translateX"], 200.0);
    assert_eq!(scene["zones"][0]["paint"]["fill"], "#000000");
    assert_eq!(scene["guides"][1]["id"], "flows-labelCircle1");
}

#[test]
fn highlight_reports_events_and_emphasis() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(&tmp, "abc.json", ABC);

    let out = run_json(&["highlight", "--chord", "B:A", input.to_string_lossy().as_ref()]);
    assert_eq!(out["focused"], true);
    assert_eq!(out["events"][0]["event"], "highlightChord");
    assert_eq!(out["events"][0]["sourceName"], "B");
    assert_eq!(out["events"][0]["value"], 4.0);
    assert_eq!(out["scene"]["chords"][0]["emphasis"], "full");
    assert_eq!(out["scene"]["chords"][1]["hovered"], true);
    assert_eq!(out["scene"]["chords"][2]["emphasis"], "dimmed");
}

#[test]
fn highlight_of_unknown_node_stays_idle() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(&tmp, "abc.json", ABC);

    let out = run_json(&["highlight", "--node", "Z", input.to_string_lossy().as_ref()]);
    assert_eq!(out["focused"], false);
    assert_eq!(out["events"].as_array().unwrap().len(), 0);
    assert_eq!(out["scene"]["nodes"][0]["emphasis"], "default");
}

#[test]
fn reads_records_from_stdin() {
    let exe = assert_cmd::cargo_bin!("chordal-cli");
    let output = assert_cmd::Command::new(exe)
        .args(["highlight", "--zone", "A:out", "-"])
        .write_stdin(ABC)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let out: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(out["events"][0]["event"], "highlightZone");
    assert_eq!(out["events"][0]["direction"], "outgoing");
    assert_eq!(out["events"][0]["value"], 10.0);
}

#[test]
fn usage_errors_exit_with_code_2() {
    let exe = assert_cmd::cargo_bin!("chordal-cli");
    Command::new(exe).arg("--bogus").assert().code(2);

    let exe = assert_cmd::cargo_bin!("chordal-cli");
    Command::new(exe).args(["highlight", "-"]).assert().code(2);
}

#[test]
fn invalid_records_exit_with_code_1() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(&tmp, "dup.json", r#"[{ "": "A" }, { "": "A" }]"#);

    let exe = assert_cmd::cargo_bin!("chordal-cli");
    let output = Command::new(exe)
        .arg(input.to_string_lossy().as_ref())
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Duplicate entity name: A"));
}
