//! Behaviour-driven tests for resolution and migration.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use mirrorpack_syntax::Printer;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use crate::{
    BuildSession, ConfigOutput, ConfigTransformOptions, LegacyTransformOptions, PluginOutput,
    TransformError,
};

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

struct TestWorld {
    _dir: TempDir,
    root: Utf8PathBuf,
    session: BuildSession,
    config: String,
    resolved: Option<Result<ConfigOutput, TransformError>>,
    legacy_path: Utf8PathBuf,
    legacy_source: String,
    migrated: Option<PluginOutput>,
}

#[fixture]
fn world() -> TestWorld {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
    TestWorld {
        _dir: dir,
        root,
        session: BuildSession::new(Printer::default()),
        config: String::new(),
        resolved: None,
        legacy_path: Utf8PathBuf::new(),
        legacy_source: String::new(),
        migrated: None,
    }
}

fn legacy_options() -> LegacyTransformOptions {
    LegacyTransformOptions {
        legacy_package_name: "mirrorpack".into(),
        legacy_global_names: vec!["Log".into()],
        helper_package_name: "mirrorpack/node-helper".into(),
    }
}

fn resolved(world: &TestWorld) -> &ConfigOutput {
    world
        .resolved
        .as_ref()
        .expect("no resolution captured")
        .as_ref()
        .expect("expected success but got error")
}

fn resolution_error(world: &TestWorld) -> &TransformError {
    world
        .resolved
        .as_ref()
        .expect("no resolution captured")
        .as_ref()
        .expect_err("expected error but got success")
}

fn migrated(world: &TestWorld) -> &PluginOutput {
    world.migrated.as_ref().expect("no migration captured")
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("a module file {path}")]
fn given_module_file(world: &mut TestWorld, path: String) {
    let file = world.root.join(path.trim_matches('"'));
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(file, "").expect("write module");
}

#[given("the configuration {source}")]
fn given_configuration(world: &mut TestWorld, source: String) {
    world.config = source.trim_matches('"').to_owned();
}

#[given("the legacy file {path} containing {source}")]
fn given_legacy_file(world: &mut TestWorld, path: String, source: String) {
    world.legacy_path = world.root.join(path.trim_matches('"'));
    world.legacy_source = source.trim_matches('"').to_owned();
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the configuration is resolved")]
fn when_resolved(world: &mut TestWorld) {
    let options = ConfigTransformOptions::new(world.root.clone());
    world.resolved = Some(world.session.resolve_config(
        &world.config,
        Utf8Path::new("config/config.js"),
        &options,
    ));
}

#[when("the legacy file is migrated")]
fn when_migrated(world: &mut TestWorld) {
    let output = world
        .session
        .migrate_plugin(&world.legacy_source, &world.legacy_path, &legacy_options())
        .expect("migration succeeds");
    world.migrated = Some(output);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("module {name} resolves to {relative}")]
fn then_resolves_to(world: &mut TestWorld, name: String, relative: String) {
    let output = resolved(world);
    let plugin = output
        .plugins
        .iter()
        .find(|plugin| plugin.name() == name.trim_matches('"'))
        .expect("plugin resolved");
    let found = plugin
        .source_path()
        .strip_prefix(&world.root)
        .expect("path under root");
    assert_eq!(found.as_str(), relative.trim_matches('"'));
    assert!(output.source.contains("_path"));
}

#[then("the configuration is unchanged")]
fn then_configuration_unchanged(world: &mut TestWorld) {
    assert_eq!(resolved(world).source, world.config);
}

#[then("{count} module is resolved")]
fn then_module_count(world: &mut TestWorld, count: usize) {
    assert_eq!(resolved(world).plugins.len(), count);
}

#[then("the resolved source contains {text}")]
fn then_source_contains(world: &mut TestWorld, text: String) {
    let source = &resolved(world).source;
    let expected = text.trim_matches('"');
    assert!(source.contains(expected), "expected '{expected}' in: {source}");
}

#[then("resolution fails with {kind}")]
fn then_resolution_fails(world: &mut TestWorld, kind: String) {
    let err = resolution_error(world);
    match kind.trim_matches('"') {
        "invalid_name" => assert!(
            matches!(err, TransformError::InvalidName { .. }),
            "expected InvalidName, got: {err}"
        ),
        "not_found" => assert!(
            matches!(err, TransformError::NotFound { .. }),
            "expected NotFound, got: {err}"
        ),
        other => panic!("unsupported error kind: '{other}' (supported: invalid_name, not_found)"),
    }
}

#[then("the error mentions {text}")]
fn then_error_mentions(world: &mut TestWorld, text: String) {
    let message = resolution_error(world).to_string();
    let expected = text.trim_matches('"');
    assert!(message.contains(expected), "expected '{expected}' in: {message}");
}

#[then("the migrated source starts with {prefix}")]
fn then_migrated_starts_with(world: &mut TestWorld, prefix: String) {
    let output = migrated(world);
    assert!(output.outcome.registration_migrated);
    assert!(
        output.source.starts_with(prefix.trim_matches('"')),
        "unexpected output: {}",
        output.source
    );
}

#[then("migrating the output again changes nothing")]
fn then_second_migration_no_op(world: &mut TestWorld) {
    let once = migrated(world).source.clone();
    let twice = world
        .session
        .migrate_plugin(&once, &world.legacy_path, &legacy_options())
        .expect("second migration succeeds");
    assert!(!twice.outcome.is_changed());
    assert_eq!(twice.source, once);
}

#[then("the migrated source is unchanged")]
fn then_migrated_unchanged(world: &mut TestWorld) {
    let output = migrated(world);
    assert!(!output.outcome.is_changed());
    assert_eq!(output.source, world.legacy_source);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/mirrorpack_resolve.feature",
    name = "A module in its own directory resolves to its entry point"
)]
fn nested_module(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_resolve.feature",
    name = "Built-in modules resolve under the overlay directory"
)]
fn overlay_module(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_resolve.feature",
    name = "Disabled entries are left alone"
)]
fn disabled_entries(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_resolve.feature",
    name = "Unsafe module names are rejected"
)]
fn unsafe_names(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_resolve.feature",
    name = "Missing modules list what was tried"
)]
fn missing_modules(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_resolve.feature",
    name = "Legacy entry points are migrated once"
)]
fn legacy_migration(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_resolve.feature",
    name = "Files not named after their directory are not migrated"
)]
fn non_entry_points(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/mirrorpack_resolve.feature",
    name = "The clock and helloworld configuration resolves the overlay clock only"
)]
fn clock_and_helloworld(world: TestWorld) {
    let _ = world;
}
