//! Integration tests for the `mirrorpack` binary entry point.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let clock = dir.path().join("modules/default/clock");
    fs::create_dir_all(&clock).expect("create overlay");
    fs::write(clock.join("clock.js"), "").expect("write module");
    fs::write(
        dir.path().join("config.js"),
        "let config = { modules: [{ module: 'clock' }] };\n",
    )
    .expect("write config");
    dir
}

#[test]
fn help_lists_subcommands() {
    let mut command = cargo_bin_cmd!("mirrorpack");
    command.arg("--help");
    command
        .assert()
        .success()
        .stdout(contains("resolve").and(contains("migrate")));
}

#[test]
fn resolve_uses_the_relative_resolution_root() {
    let dir = project();
    let mut command = cargo_bin_cmd!("mirrorpack");
    command
        .current_dir(dir.path())
        .env_remove("MIRRORPACK_RESOLUTION_ROOT")
        .args(["--log-filter", "off", "resolve", "config.js"]);
    command
        .assert()
        .success()
        .stdout(contains("modules/default/clock/clock.js"));
}

#[test]
fn configuration_flags_precede_the_subcommand() {
    let dir = project();
    let mut command = cargo_bin_cmd!("mirrorpack");
    command
        .current_dir(dir.path())
        .args(["--log-filter=off", "--code-split", "lazy", "resolve", "config.js"]);
    command
        .assert()
        .success()
        .stdout(contains("() => import("));
}

#[test]
fn unreadable_config_exits_with_failure() {
    let dir = project();
    let mut command = cargo_bin_cmd!("mirrorpack");
    command
        .current_dir(dir.path())
        .args(["resolve", "missing.js"]);
    command
        .assert()
        .failure()
        .stderr(contains("failed to read missing.js"));
}
