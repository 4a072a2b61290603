//! End-to-end tests for the gcmt binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write a config file and return its directory and path.
fn config_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gcmt.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

fn gcmt(config: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("gcmt").unwrap();
    cmd.arg("--no-color").arg("--config").arg(config);
    cmd.env_remove("GCMON_PREFIX")
        .env_remove("GCMON_QUEUE_CAPACITY")
        .env_remove("GCMON_WORKER_NAME")
        .env_remove("GCMT_VERBOSE");
    cmd
}

const SEEDED: &str = "[host]\nseed = 7\ninterval_ms = 10\n";

#[test]
fn test_snapshot_without_warmup_reports_idle_collectors() {
    let (_dir, config) = config_file(SEEDED);

    gcmt(&config)
        .arg("snapshot")
        .assert()
        .success()
        .stdout(predicate::str::contains("[gcmon] Calculating GC statistics..."))
        .stdout(predicate::str::contains("> Garbage Collector statistics"))
        .stdout(predicate::str::contains("    G1 Young Generation collector:"))
        .stdout(predicate::str::contains("    G1 Old Generation collector:"))
        .stdout(predicate::str::contains("      0 collections"));
}

#[test]
fn test_snapshot_json() {
    let (_dir, config) = config_file(SEEDED);

    let output = gcmt(&config)
        .args(["snapshot", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let summaries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0]["name"], "G1 Young Generation");
    assert_eq!(summaries[0]["collection_count"], 0);
    assert!(summaries[0]["average_frequency_ms"].is_null());
}

#[test]
fn test_snapshot_after_warmup_counts_collections() {
    let (_dir, config) = config_file(
        "[host]\nseed = 7\ninterval_ms = 5\nmajor_ratio = 0.0\n",
    );

    gcmt(&config)
        .args(["snapshot", "--warmup-ms", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total collections"))
        .stdout(predicate::str::contains("avg frequency"));
}

#[test]
fn test_custom_prefix_from_config() {
    let (_dir, config) = config_file("[monitor]\nmessage_prefix = \"(gc) \"\n");

    gcmt(&config)
        .arg("snapshot")
        .assert()
        .success()
        .stdout(predicate::str::contains("(gc) Calculating GC statistics..."));
}

#[test]
fn test_prefix_from_environment() {
    let (_dir, config) = config_file(SEEDED);

    gcmt(&config)
        .env("GCMON_PREFIX", "<env> ")
        .arg("snapshot")
        .assert()
        .success()
        .stdout(predicate::str::contains("<env> Calculating GC statistics..."));
}

#[test]
fn test_monitor_streams_reports() {
    let (_dir, config) = config_file(SEEDED);

    gcmt(&config)
        .args(["monitor", "--duration-ms", "300"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[gcmon] GC monitor enabled."))
        .stdout(predicate::str::contains("GC lasting"))
        .stdout(predicate::str::contains("freed from G1 Eden Space"))
        .stdout(predicate::str::ends_with("[gcmon] GC monitor disabled.\n"));
}

#[test]
fn test_monitor_without_notifications() {
    let (_dir, config) = config_file("[host]\nnotifications = false\ninterval_ms = 10\n");

    gcmt(&config)
        .args(["monitor", "--duration-ms", "100"])
        .assert()
        .success()
        .stdout("[gcmon] GC monitor enabled.\n[gcmon] GC monitor disabled.\n");
}

#[test]
fn test_repl_runs_commands_from_stdin() {
    let (_dir, config) = config_file(SEEDED);

    gcmt(&config)
        .args(["repl", "--paused"])
        .write_stdin("help\ngc\nnope\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[gcmon] Commands: gc, gcmonitor, gcmonitoring, help, exit",
        ))
        .stdout(predicate::str::contains("> Garbage Collector statistics"))
        .stdout(predicate::str::contains(
            "[gcmon] Unknown command: nope. Type 'help' for a list.",
        ));
}

#[test]
fn test_repl_toggle_until_end_of_input() {
    let (_dir, config) = config_file(SEEDED);

    gcmt(&config)
        .args(["repl", "--paused"])
        .write_stdin("gcmonitor\ngcmonitoring\n")
        .assert()
        .success()
        .stdout("[gcmon] GC monitor enabled.\n[gcmon] GC monitor disabled.\n");
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    gcmt(&missing)
        .arg("snapshot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_invalid_host_config_fails() {
    let (_dir, config) = config_file("[host]\nmajor_ratio = 2.0\n");

    gcmt(&config)
        .arg("snapshot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("major_ratio"));
}
