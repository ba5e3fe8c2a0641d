//! Behaviour-driven tests for the command line.

use std::cell::RefCell;
use std::fs;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use mirrorpack_config::Config;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use super::support::{StaticConfigLoader, build_args};
use crate::{IoStreams, run_with_loader};

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

struct TestWorld {
    _dir: TempDir,
    root: Utf8PathBuf,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit_code: Option<ExitCode>,
}

impl TestWorld {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Self {
            _dir: dir,
            root,
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit_code: None,
        }
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, contents).expect("write file");
    }

    fn run(&mut self, command: &str) {
        self.stdout.clear();
        self.stderr.clear();
        let config = Config {
            resolution_root: self.root.join("modules"),
            log_filter: "warn".into(),
            ..Config::default()
        };
        let loader = StaticConfigLoader::new(config);
        let args = build_args(&command.replace("{root}", self.root.as_str()));
        let mut io = IoStreams::new(&mut self.stdout, &mut self.stderr);
        self.exit_code = Some(run_with_loader(args, &mut io, &loader));
    }

    fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.clone()).expect("stdout utf8")
    }

    fn stderr_text(&self) -> String {
        String::from_utf8(self.stderr.clone()).expect("stderr utf8")
    }

    fn exit_code(&self) -> ExitCode {
        self.exit_code.expect("exit code recorded")
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("a module file {path}")]
fn given_module_file(world: &RefCell<TestWorld>, path: String) {
    world
        .borrow()
        .write(&format!("modules/{}", path.trim_matches('"')), "");
}

#[given("the file {path} containing {contents}")]
fn given_file(world: &RefCell<TestWorld>, path: String, contents: String) {
    world
        .borrow()
        .write(path.trim_matches('"'), contents.trim_matches('"'));
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the operator runs {command}")]
fn when_operator_runs(world: &RefCell<TestWorld>, command: String) {
    world.borrow_mut().run(command.trim_matches('"'));
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the CLI succeeds")]
fn then_succeeds(world: &RefCell<TestWorld>) {
    let world = world.borrow();
    assert_eq!(
        world.exit_code(),
        ExitCode::SUCCESS,
        "stderr: {}",
        world.stderr_text()
    );
}

#[then("the CLI fails")]
fn then_fails(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().exit_code(), ExitCode::FAILURE);
}

#[then("stdout contains {snippet}")]
fn then_stdout_contains(world: &RefCell<TestWorld>, snippet: String) {
    let stdout = world.borrow().stdout_text();
    let snippet = snippet.trim_matches('"');
    assert!(
        stdout.contains(snippet),
        "stdout {stdout:?} did not contain {snippet:?}"
    );
}

#[then("stderr contains {snippet}")]
fn then_stderr_contains(world: &RefCell<TestWorld>, snippet: String) {
    let stderr = world.borrow().stderr_text();
    let snippet = snippet.trim_matches('"');
    assert!(
        stderr.contains(snippet),
        "stderr {stderr:?} did not contain {snippet:?}"
    );
}

#[then("stdout lists {names}")]
fn then_stdout_lists(world: &RefCell<TestWorld>, names: String) {
    let stdout = world.borrow().stdout_text();
    let listed: Vec<&str> = stdout.lines().collect();
    let expected: Vec<&str> = names.trim_matches('"').split_whitespace().collect();
    assert_eq!(listed, expected);
}

#[then("the report marks {name} as built in")]
fn then_report_marks_default(world: &RefCell<TestWorld>, name: String) {
    let stdout = world.borrow().stdout_text();
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("report is JSON");
    let entries = report.as_array().expect("report is an array");
    let entry = entries
        .iter()
        .find(|entry| entry["name"] == name.trim_matches('"'))
        .expect("module listed in report");
    assert_eq!(entry["isDefault"], true);
    assert!(entry["helperPath"].is_null());
}

#[then("the file {path} contains {text}")]
fn then_file_contains(world: &RefCell<TestWorld>, path: String, text: String) {
    let file = world.borrow().root.join(path.trim_matches('"'));
    let contents = fs::read_to_string(&file).expect("read file");
    let text = text.trim_matches('"');
    assert!(
        contents.contains(text),
        "{file} {contents:?} did not contain {text:?}"
    );
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/mirrorpack_cli.feature",
    name = "Resolving a configuration prints the rewritten source"
)]
fn resolve_prints_source(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_cli.feature",
    name = "Resolution reports can be written as JSON"
)]
fn resolve_reports_json(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_cli.feature",
    name = "Missing modules fail the build"
)]
fn resolve_missing_module(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_cli.feature",
    name = "Checking a legacy module reports pending migrations"
)]
fn migrate_check(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_cli.feature",
    name = "Migrating in place rewrites the module"
)]
fn migrate_in_place(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_cli.feature",
    name = "Built-in modules are listed"
)]
fn defaults_listed(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_cli.feature",
    name = "Migrating without files is a usage error"
)]
fn migrate_usage_error(world: RefCell<TestWorld>) {
    let _ = world;
}
