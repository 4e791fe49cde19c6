use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("futureflow-{nanos}-{file_name}"))
}

fn run(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_flow");
    Command::new(exe)
        .args(args)
        .env("FLOW_CONFIG_PATH", temp_path("cli-add-config.json"))
        .output()
        .expect("failed to run flow")
}

#[test]
fn add_task_prints_confirmation() {
    let output = run(&["add", "task", "Write report", "--priority", "high"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: Write report (task-"));
}

#[test]
fn add_task_json_includes_normalized_fields() {
    let output = run(&[
        "--json",
        "add",
        "task",
        "  Write report  ",
        "-p",
        "h",
        "--due",
        "2025-12-21",
        "--subject",
        "   ",
    ]);

    assert!(output.status.success());
    let task: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(task["title"], "Write report");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["due_date"], "2025-12-21");
    assert_eq!(task["subject"], serde_json::Value::Null);
    assert_eq!(task["completed"], false);
    assert!(task["id"].as_str().unwrap().starts_with("task-"));
}

#[test]
fn add_task_without_title_is_rejected() {
    let output = run(&["add", "task", "--priority", "low"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn add_task_rejects_unknown_priority() {
    let output = run(&["add", "task", "Write report", "--priority", "urgent"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn add_note_requires_content() {
    let output = run(&["add", "note", "Lecture 3"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn add_goal_clamps_initial_progress() {
    let output = run(&[
        "--json", "add", "goal", "Read pages", "--target", "10", "--current", "25",
    ]);

    assert!(output.status.success());
    let goal: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(goal["target"], 10);
    assert_eq!(goal["current"], 10);
}

#[test]
fn add_goal_rejects_zero_target() {
    let output = run(&["add", "goal", "Read pages", "--target", "0"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}
