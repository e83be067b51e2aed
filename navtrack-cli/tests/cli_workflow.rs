//! End-to-end tests for the navtrack binary.
//!
//! Each test writes a route file into a temporary directory and runs the
//! binary with `HOME` pointed there, so logs and config stay isolated.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use navtrack::geometry::{destination, Point};
use navtrack::route::RouteBuilder;
use tempfile::TempDir;

/// Write a two-turn route with instructions to `dir/route.json`.
fn write_route(dir: &Path) -> PathBuf {
    let a = Point::new(13.0, 52.0);
    let b = destination(a, 400.0, 90.0);
    let c = destination(b, 300.0, 0.0);
    let route = RouteBuilder::new()
        .leg(vec![vec![a, b], vec![b, c], vec![c, c]])
        .with_instructions()
        .build();

    let path = dir.join("route.json");
    std::fs::write(&path, serde_json::to_string_pretty(&route).unwrap()).unwrap();
    path
}

/// Run the CLI with an isolated home directory.
fn run_cli(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_navtrack"))
        .args(args)
        .env("HOME", home)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute CLI command")
}

/// Assert a command succeeded.
fn assert_success(output: &Output, context: &str) {
    if !output.status.success() {
        panic!(
            "{} failed:\nstdout: {}\nstderr: {}",
            context,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[test]
fn test_inspect_prints_steps() {
    let temp = TempDir::new().unwrap();
    let route = write_route(temp.path());

    let output = run_cli(temp.path(), &["inspect", route.to_str().unwrap()]);
    assert_success(&output, "inspect");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 legs, 3 steps"));
    assert!(stdout.contains("depart"));
    assert!(stdout.contains("arrive"));
}

#[test]
fn test_inspect_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.json");

    let output = run_cli(temp.path(), &["inspect", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read route"));
}

#[test]
fn test_replay_reaches_destination() {
    let temp = TempDir::new().unwrap();
    let route = write_route(temp.path());

    let output = run_cli(
        temp.path(),
        &[
            "replay",
            route.to_str().unwrap(),
            "--speed",
            "500",
            "--interval-ms",
            "10",
        ],
    );
    assert_success(&output, "replay");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("milestone 1:"));
    assert!(stdout.contains("arrived"));
    assert!(!stdout.contains("OFF ROUTE"));
    assert!(temp.path().join(".navtrack/logs/navtrack.log").exists());
}

#[test]
fn test_replay_rejects_invalid_config() {
    let temp = TempDir::new().unwrap();
    let route = write_route(temp.path());
    let config = temp.path().join("config.ini");
    std::fs::write(&config, "[navigation]\nmaneuver_zone_radius = wide\n").unwrap();

    let output = run_cli(
        temp.path(),
        &[
            "replay",
            route.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}
