//! CLI integration tests
//!
//! Runs the `vf` binary against throwaway projects with an in-memory DuckDB
//! warehouse.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the compiled vf binary (resolved at compile time)
fn vf_bin() -> String {
    env!("CARGO_BIN_EXE_vf").to_string()
}

const CONFIG: &str = "\
warehouse:
  type: duckdb
  catalog: memory
  schema: analytics
";

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("viewforge.yml"), CONFIG).unwrap();
    let views = temp.path().join("sql/views");
    std::fs::create_dir_all(&views).unwrap();
    for (name, content) in files {
        std::fs::write(views.join(name), content).unwrap();
    }
    temp
}

fn chain_project() -> TempDir {
    project(&[
        ("base.sql", "SELECT 1 AS id"),
        ("mid.sql", "SELECT * FROM {{ ref('base') }}"),
        ("top.sql", "SELECT * FROM {{ ref('mid') }}"),
    ])
}

fn vf(dir: &Path, args: &[&str]) -> Output {
    Command::new(vf_bin())
        .args(args)
        .arg("--project-dir")
        .arg(dir)
        .env_remove("VIEWFORGE_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run vf")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ── vf run ──────────────────────────────────────────────────────────────

#[test]
fn test_run_deploys_in_dependency_order() {
    let temp = chain_project();
    let output = vf(temp.path(), &["run"]);
    let out = stdout(&output);

    assert!(
        output.status.success(),
        "run should succeed.\nstdout: {}\nstderr: {}",
        out,
        stderr(&output)
    );
    let base = out.find("[1/3] Deploying base...").unwrap();
    let mid = out.find("[2/3] Deploying mid...").unwrap();
    let top = out.find("[3/3] Deploying top...").unwrap();
    assert!(base < mid && mid < top);
    assert!(out.contains("Successfully deployed all 3 views"));
    assert!(temp.path().join("compiled/views/mid.sql").exists());
}

#[test]
fn test_run_dry_shows_details() {
    let temp = chain_project();
    let output = vf(temp.path(), &["run", "--dry", "--verbose"]);
    let out = stdout(&output);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("[1/3] Dry-run checking base..."));
    assert!(out.contains("Schema:    analytics"));
    assert!(out.contains(r#"Full name: "memory"."analytics"."mid""#));
    assert!(out.contains("SQL:"));
    assert!(out.contains("Successfully validated all 3 views"));
}

#[test]
fn test_run_json_output() {
    let temp = chain_project();
    let output = vf(temp.path(), &["run", "--dry", "--output", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["order"], serde_json::json!(["base", "mid", "top"]));
    assert_eq!(json["outcome"], "all_succeeded");
    assert_eq!(json["success_count"], 3);
    assert_eq!(json["results"][0]["status"], "success");
    assert!(json["timestamp"].is_string());
}

#[test]
fn test_run_selected_view_only() {
    let temp = chain_project();
    let output = vf(temp.path(), &["run", "--dry", "mid"]);
    let out = stdout(&output);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("[1/1] Dry-run checking mid..."));
    assert!(out.contains(r#""memory"."analytics"."mid""#));
}

#[test]
fn test_run_aborts_on_dangling_reference() {
    let temp = project(&[
        ("base.sql", "SELECT 1 AS id"),
        ("bad.sql", "SELECT * FROM {{ ref('ghost') }}"),
    ]);
    let output = vf(temp.path(), &["run"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("View 'bad' references unknown view 'ghost'"), "{}", err);
    assert!(!stdout(&output).contains("Deploying base"));
}

#[test]
fn test_run_aborts_on_cycle() {
    let temp = project(&[
        ("a.sql", "SELECT * FROM {{ ref('b') }}"),
        ("b.sql", "SELECT * FROM {{ ref('a') }}"),
    ]);
    let output = vf(temp.path(), &["run"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Circular dependencies"));
}

#[test]
fn test_run_all_failed_exits_non_zero() {
    let temp = project(&[("broken.sql", "SELECT * FROM missing_table")]);
    let output = vf(temp.path(), &["run"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("All 1 views failed"));
}

#[test]
fn test_run_missing_config() {
    let temp = TempDir::new().unwrap();
    let output = vf(temp.path(), &["run"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Config file not found"));
}

// ── vf compile ──────────────────────────────────────────────────────────

#[test]
fn test_compile_writes_output() {
    let temp = chain_project();
    let out_dir = temp.path().join("build");
    let output = vf(
        temp.path(),
        &["compile", "--output-dir", out_dir.to_str().unwrap()],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Compiled 3/3 views"));
    let mid = std::fs::read_to_string(out_dir.join("mid.sql")).unwrap();
    assert!(mid.contains(r#""memory"."analytics"."base""#));
    assert!(mid.starts_with("-- Compiled SQL from:"));
}

// ── vf deps ─────────────────────────────────────────────────────────────

#[test]
fn test_deps_shows_order() {
    let temp = chain_project();
    let output = vf(temp.path(), &["deps"]);
    let out = stdout(&output);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("1. base"));
    assert!(out.contains("2. mid"));
    assert!(out.contains("3. top"));
}

#[test]
fn test_deps_falls_back_on_cycle() {
    let temp = project(&[
        ("a.sql", "SELECT * FROM {{ ref('b') }}"),
        ("b.sql", "SELECT * FROM {{ ref('a') }}"),
    ]);
    let output = vf(temp.path(), &["deps", "--output", "json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["order"], serde_json::json!(["a", "b"]));
    assert_eq!(json["cycle"], serde_json::json!(["a", "b"]));
}

// ── vf validate ─────────────────────────────────────────────────────────

#[test]
fn test_validate_clean_project() {
    let temp = chain_project();
    let output = vf(temp.path(), &["validate"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("All references are valid"));
}

#[test]
fn test_validate_reports_every_error() {
    let temp = project(&[
        ("a.sql", "SELECT * FROM {{ ref('x') }} JOIN {{ ref('y') }}"),
        ("b.sql", "SELECT * FROM {{ ref('a') }}"),
    ]);
    let output = vf(temp.path(), &["validate", "--output", "json"]);

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["failure_count"], 1);
    assert_eq!(json["success_count"], 1);
    assert_eq!(json["results"][0]["errors"].as_array().unwrap().len(), 2);
}
