//! CLI integration tests
//!
//! Run the built binary against trees and configs written to a temp dir.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const TREE: &str = r#"{
  "entries": [
    {
      "path": "/ifs",
      "operation": "modify",
      "element": {"name": "ifs"},
      "children": [
        {"path": "/ifs/eth0", "operation": "add", "element": {"name": "eth0", "mtu": 1500}}
      ]
    },
    {"path": "/hostname", "operation": "modify", "element": "edge-1"}
  ]
}"#;

const CONFIG: &str = r#"
passes = "until-settled"
log_profile = "production"

[[callbacks]]
path = "/ifs/eth0"

[[callbacks]]
path = "/ifs"

[[callbacks]]
path = "/hostname"
"#;

fn setup(temp_dir: &TempDir, tree: &str, config: &str) -> (PathBuf, PathBuf) {
    let tree_path = temp_dir.path().join("tree.json");
    let config_path = temp_dir.path().join("dispatch.toml");
    fs::write(&tree_path, tree).unwrap();
    fs::write(&config_path, config).unwrap();
    (tree_path, config_path)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cfgdispatch"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_dispatch_until_settled_children_first() {
    let temp_dir = TempDir::new().unwrap();
    let (tree, config) = setup(&temp_dir, TREE, CONFIG);

    let output = run(&[
        "dispatch",
        tree.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout_lines(&output),
        vec![
            "add /ifs/eth0",
            "modify /ifs",
            "modify /hostname",
            "dispatched 3 callback(s) in 2 pass(es)",
        ]
    );
}

#[test]
fn test_passes_flag_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    let (tree, config) = setup(&temp_dir, TREE, CONFIG);

    let output = run(&[
        "dispatch",
        tree.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--passes",
        "single",
    ]);

    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![
            "add /ifs/eth0",
            "modify /ifs",
            "dispatched 2 callback(s) in 1 pass(es)",
        ]
    );
}

#[test]
fn test_fail_on_aborts_with_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let (tree, config) = setup(&temp_dir, TREE, CONFIG);

    let output = run(&[
        "dispatch",
        tree.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--fail-on",
        "/ifs/eth0",
    ]);

    assert_eq!(output.status.code(), Some(1));
    // The failing callback ran; its parent and later entries did not
    assert_eq!(stdout_lines(&output), vec!["add /ifs/eth0"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Callback for path /ifs/eth0 failed (1)"));
}

#[test]
fn test_unmatched_tree_reports_no_callback() {
    let temp_dir = TempDir::new().unwrap();
    let config = "[[callbacks]]\npath = \"/ntp\"\n";
    let (tree, config) = setup(&temp_dir, TREE, config);

    let output = run(&[
        "dispatch",
        tree.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["no callback found"]);
}

#[test]
fn test_empty_tree_reports_nothing_changed() {
    let temp_dir = TempDir::new().unwrap();
    let (tree, config) = setup(&temp_dir, r#"{"entries": []}"#, CONFIG);

    let output = run(&[
        "dispatch",
        tree.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["nothing changed"]);
}

#[test]
fn test_show_outline_with_priority_preview() {
    let temp_dir = TempDir::new().unwrap();
    let (tree, config) = setup(&temp_dir, TREE, CONFIG);

    let plain = run(&["show", tree.to_str().unwrap()]);
    assert!(plain.status.success());
    let plain_lines = stdout_lines(&plain);
    assert_eq!(plain_lines[0], "## Diff Tree (3 nodes, 0 applied, 0 pending)");
    assert!(plain_lines.contains(&"~ /ifs".to_string()));
    assert!(plain_lines.contains(&"  + /ifs/eth0".to_string()));

    let preview = run(&[
        "show",
        tree.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(preview.status.success());
    let preview_lines = stdout_lines(&preview);
    assert_eq!(preview_lines[0], "## Diff Tree (3 nodes, 0 applied, 3 pending)");
    assert!(preview_lines.contains(&"~ /ifs [prio 2] pending".to_string()));
    assert!(preview_lines.contains(&"  + /ifs/eth0 [prio 1] pending".to_string()));
}

#[test]
fn test_malformed_tree_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let (tree, _) = setup(&temp_dir, "{ \"entries\": [ { \"path\": ", CONFIG);

    let output = run(&["show", tree.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: "));
}
