//! End-to-end tests for the `selectkit` binary.

use std::path::PathBuf;
use std::process::{Command, Output};

const MANIFEST: &str = r"
config:
  searchable: true
options:
  - { value: mpm, label: Maputo }
  - { value: bei, label: Beira }
  - { value: nam, label: Nampula, disabled: true }
value: bei
";

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("selectkit-cli");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn selectkit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_selectkit"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_check_valid_manifest() {
    let manifest = write_temp("check.yaml", MANIFEST);
    let output = selectkit(&["check", manifest.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Manifest valid!\n"));
    assert!(text.contains("Mode: single"));
    assert!(text.contains("Value: [bei]"));
}

#[test]
fn test_check_missing_file_fails() {
    let output = selectkit(&["check", "/nonexistent/select.yaml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to load"));
}

#[test]
fn test_filter_text() {
    let manifest = write_temp("filter.yaml", MANIFEST);
    let output = selectkit(&["filter", manifest.to_str().unwrap(), "BE"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Beira [bei]\n");
}

#[test]
fn test_filter_json_manifest() {
    let manifest = write_temp(
        "filter.json",
        r#"{"options": [{"value": 1, "label": "One"}, {"value": 2, "label": "Two", "group": "Even"}]}"#,
    );
    let output = selectkit(&["filter", manifest.to_str().unwrap(), "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[1]["group"], "Even");
}

#[test]
fn test_replay_script() {
    let manifest = write_temp("replay.yaml", MANIFEST);
    let script = write_temp("replay.script", "# pick maputo\nkey down\nkey enter\n");
    let output = selectkit(&[
        "replay",
        manifest.to_str().unwrap(),
        script.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let lines: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["render"]["is_open"], true);
    assert_eq!(lines[1]["changes"][0]["value"], "mpm");
    assert_eq!(lines[1]["closed"][0], "commit");
    assert_eq!(lines[1]["render"]["selected_label"], "Maputo");
}

#[test]
fn test_replay_reports_bad_line() {
    let manifest = write_temp("bad.yaml", MANIFEST);
    let script = write_temp("bad.script", "key down\n\nkey sideways\n");
    let output = selectkit(&[
        "replay",
        manifest.to_str().unwrap(),
        script.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("script line 3"));
}
