use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn log_census() -> Command {
    Command::new(env!("CARGO_BIN_EXE_log-census"))
}

fn write_sample(root: &Path, name: &str, log: &str, content: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("failed to create sample dir");
    fs::write(dir.join(log), content).expect("failed to write log");
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = log_census()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run log-census");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

#[test]
fn scan_writes_default_summary() {
    let root = tempfile::tempdir().unwrap();
    write_sample(root.path(), "A", "build.log", "");
    write_sample(root.path(), "B", "build.log", "SyntaxError: invalid syntax");

    let output = log_census()
        .args(["scan", "--log-kind", "build", "--parser", "--root"])
        .arg(root.path())
        .output()
        .expect("failed to run log-census");
    assert!(
        output.status.success(),
        "scan failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rows=2 available=1 unavailable=1"));

    let summary = fs::read_to_string(root.path().join("summary_build.csv")).unwrap();
    let mut lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.remove(0), "gist_id,path,log_type,available,error_type");
    lines.sort();
    assert!(lines[0].starts_with("A,") && lines[0].ends_with(",build,False,"));
    assert!(lines[1].starts_with("B,") && lines[1].ends_with(",build,True,SyntaxError"));
}

#[test]
fn scan_json_report() {
    let root = tempfile::tempdir().unwrap();
    write_sample(root.path(), "r1", "run.log", "START\nok");
    let out_path = root.path().join("out").join("runs.csv");

    let output = log_census()
        .args(["scan", "--log-kind", "run", "--format", "json", "--root"])
        .arg(root.path())
        .arg("--output")
        .arg(&out_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["rows"], 1);
    assert_eq!(report["mode"], "flags");
    assert_eq!(report["log_kind"], "run");
    assert!(out_path.exists());
}

#[test]
fn scan_missing_root_fails() {
    let root = tempfile::tempdir().unwrap();
    let output = log_census()
        .args(["scan", "--log-kind", "build", "--root"])
        .arg(root.path().join("missing"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

// ---------------------------------------------------------------------------
// plot
// ---------------------------------------------------------------------------

#[test]
fn plot_parser_summary_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let summary = dir.path().join("summary_run.csv");
    fs::write(
        &summary,
        "gist_id,path,log_type,available,error_type\n\
         a,/r/a,run,True,OtherPass\n\
         b,/r/b,run,True,OtherPass\n\
         c,/r/c,run,False,\n",
    )
    .unwrap();

    let output = log_census()
        .args(["plot", "--parser", "--format", "json", "--summary"])
        .arg(&summary)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "plot failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_rows"], 3);
    let buckets = report["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0]["label"], "no_error");
    assert_eq!(buckets[0]["count"], 2);
    assert_eq!(buckets[0]["color"], "green");
    assert_eq!(buckets[1]["label"], "unavailable");
    assert_eq!(buckets[1]["color"], "red");

    let svg = fs::read_to_string(dir.path().join("summary_run.svg")).unwrap();
    assert!(svg.contains("<title>total: 3</title>"));
}

#[test]
fn plot_no_chart_prints_table_only() {
    let dir = tempfile::tempdir().unwrap();
    let summary = dir.path().join("summary_build.csv");
    fs::write(
        &summary,
        "gist_id,path,log_type,available,Error,Warning\n\
         a,/r/a,build,True,False,True\n",
    )
    .unwrap();

    let output = log_census()
        .args(["plot", "--no-chart", "--summary"])
        .arg(&summary)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("warning_only"));
    assert!(stdout.contains("total rows: 1"));
    assert!(!dir.path().join("summary_build.svg").exists());
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

#[test]
fn classify_stdin_parser_reports_rule() {
    let output = run_with_stdin(
        &["classify", "--parser"],
        "ImportError: x\nModuleNotFoundError: y",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "ModuleNotFound (rule 0: \"ModuleNotFound\")");
}

#[test]
fn classify_run_without_start_is_unavailable() {
    let output = run_with_stdin(
        &["classify", "--log-kind", "run", "--format", "json"],
        "ERROR: crashed",
    );
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["available"], false);
    assert!(value.get("keywords").is_none());
}

#[test]
fn classify_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("build.log");
    fs::write(&log, "KeyError: 'missing'").unwrap();

    let output = log_census()
        .args(["classify", "--input"])
        .arg(&log)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Error, KeyError");
}

// ---------------------------------------------------------------------------
// batch
// ---------------------------------------------------------------------------

#[test]
fn batch_runs_configured_passes() {
    let root = tempfile::tempdir().unwrap();
    write_sample(root.path(), "g1", "build.log", "Successfully built");
    write_sample(root.path(), "g1", "run.log", "START\nNameError: name 'x'");
    let config = root.path().join("census.yml");
    fs::write(
        &config,
        format!(
            "root: {}\npasses:\n  - log_kind: build\n    mode: flags\n  - log_kind: run\n    mode: parser\nchart_dir: charts\n",
            root.path().display()
        ),
    )
    .unwrap();

    let output = log_census()
        .args(["batch", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "batch failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(root.path().join("summary_build.csv").exists());
    assert!(root.path().join("summary_run.csv").exists());
    assert!(root.path().join("charts").join("summary_run.svg").exists());
    assert!(String::from_utf8_lossy(&output.stdout).contains("NameError"));

    let run_summary = fs::read_to_string(root.path().join("summary_run.csv")).unwrap();
    let rows: Vec<&str> = run_summary.lines().skip(1).collect();
    assert_eq!(rows.len(), 1, "unexpected rows: {rows:?}");
    assert!(rows[0].starts_with("g1,"));
}

#[test]
fn batch_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = log_census()
        .args(["batch", "--config"])
        .arg(dir.path().join("absent.yml"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load"));
}
