//! Execution of the `resolve`, `migrate` and `defaults` subcommands.

use std::fs;
use std::io::Write;
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use mirrorpack_config::{CodeSplitMode, Config, PragmaStyle};
use mirrorpack_resolve::{BuildSession, ConfigTransformOptions, LegacyTransformOptions};
use mirrorpack_syntax::{ChunkPragma, CodeSplitHint, Printer};
use tracing::{debug, info};

use crate::cli::CliCommand;
use crate::{AppError, CLI_TARGET, IoStreams};

/// Runs `command` against `config`, writing results to `io`.
pub(crate) fn execute<W, E>(
    command: &CliCommand,
    config: &Config,
    io: &mut IoStreams<'_, W, E>,
) -> Result<ExitCode, AppError>
where
    W: Write,
    E: Write,
{
    let session = BuildSession::new(Printer::new(chunk_pragma(config.chunk_pragma())));
    match command {
        CliCommand::Resolve {
            config: config_path,
            report,
            output,
        } => {
            let options = transform_options(config)?;
            resolve(&session, config_path, &options, *report, output.as_deref(), io)?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Migrate {
            files,
            in_place,
            check,
        } => {
            let mode = MigrateMode::new(*in_place, *check);
            migrate(&session, files, &legacy_options(config), mode, io)
        }
        CliCommand::Defaults => {
            let root = resolution_root(config)?;
            let names = session.registry().names_in(&root)?;
            for name in &*names {
                writeln!(io.stdout, "{name}").map_err(AppError::EmitOutput)?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve<W, E>(
    session: &BuildSession,
    config_path: &Utf8Path,
    options: &ConfigTransformOptions,
    report: bool,
    output: Option<&Utf8Path>,
    io: &mut IoStreams<'_, W, E>,
) -> Result<(), AppError>
where
    W: Write,
    E: Write,
{
    let source = read_source(config_path)?;
    let resolved = session.resolve_config(&source, config_path, options)?;
    info!(
        target: CLI_TARGET,
        config = %config_path,
        modules = resolved.plugins.len(),
        "resolved configuration"
    );

    let text = if report {
        let mut json =
            serde_json::to_string_pretty(&resolved.plugins).map_err(AppError::SerialiseReport)?;
        json.push('\n');
        json
    } else {
        resolved.source
    };

    output.map_or_else(
        || {
            io.stdout
                .write_all(text.as_bytes())
                .map_err(AppError::EmitOutput)
        },
        |path| write_file(path, &text),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MigrateMode {
    Print,
    InPlace,
    Check,
}

impl MigrateMode {
    const fn new(in_place: bool, check: bool) -> Self {
        if check {
            Self::Check
        } else if in_place {
            Self::InPlace
        } else {
            Self::Print
        }
    }
}

fn migrate<W, E>(
    session: &BuildSession,
    files: &[Utf8PathBuf],
    options: &LegacyTransformOptions,
    mode: MigrateMode,
    io: &mut IoStreams<'_, W, E>,
) -> Result<ExitCode, AppError>
where
    W: Write,
    E: Write,
{
    let mut pending = 0_usize;
    for file in files {
        let source = read_source(file)?;
        let migrated = session.migrate_plugin(&source, file, options)?;
        let changed = migrated.outcome.is_changed();
        debug!(target: CLI_TARGET, file = %file, changed, "migration finished");
        match mode {
            MigrateMode::Print => io
                .stdout
                .write_all(migrated.source.as_bytes())
                .map_err(AppError::EmitOutput)?,
            MigrateMode::InPlace if changed => {
                write_file(file, &migrated.source)?;
                writeln!(io.stdout, "migrated {file}").map_err(AppError::EmitOutput)?;
            }
            MigrateMode::InPlace => {}
            MigrateMode::Check if changed => {
                pending = pending.saturating_add(1);
                writeln!(io.stderr, "{file}: needs migration").map_err(AppError::EmitOutput)?;
            }
            MigrateMode::Check => {}
        }
    }

    if pending > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn transform_options(config: &Config) -> Result<ConfigTransformOptions, AppError> {
    Ok(ConfigTransformOptions::new(resolution_root(config)?)
        .with_extensions(config.extensions().iter().cloned())
        .with_code_split(code_split_hint(config.code_split())))
}

fn legacy_options(config: &Config) -> LegacyTransformOptions {
    LegacyTransformOptions {
        legacy_package_name: config.legacy_package_name().to_owned(),
        legacy_global_names: config.legacy_globals().to_vec(),
        helper_package_name: config.helper_package_name().to_owned(),
    }
}

/// Anchors a relative resolution root at the working directory.
fn resolution_root(config: &Config) -> Result<Utf8PathBuf, AppError> {
    if config.resolution_root().is_absolute() {
        return Ok(config.resolution_root().to_owned());
    }
    let current = std::env::current_dir().map_err(AppError::WorkingDirectory)?;
    let cwd = Utf8PathBuf::from_path_buf(current)
        .map_err(|path| AppError::NonUtf8WorkingDirectory(path.display().to_string()))?;
    Ok(config.absolute_resolution_root(&cwd))
}

const fn code_split_hint(mode: CodeSplitMode) -> CodeSplitHint {
    match mode {
        CodeSplitMode::Eager => CodeSplitHint::Eager,
        CodeSplitMode::Lazy => CodeSplitHint::Lazy,
    }
}

const fn chunk_pragma(style: PragmaStyle) -> ChunkPragma {
    match style {
        PragmaStyle::Webpack => ChunkPragma::Webpack,
        PragmaStyle::Bare => ChunkPragma::Bare,
    }
}

fn read_source(path: &Utf8Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::ReadSource {
        path: path.to_owned(),
        source,
    })
}

fn write_file(path: &Utf8Path, contents: &str) -> Result<(), AppError> {
    fs::write(path, contents).map_err(|source| AppError::WriteOutput {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, false, MigrateMode::Print)]
    #[case(true, false, MigrateMode::InPlace)]
    #[case(false, true, MigrateMode::Check)]
    fn migrate_modes_follow_flags(
        #[case] in_place: bool,
        #[case] check: bool,
        #[case] expected: MigrateMode,
    ) {
        assert_eq!(MigrateMode::new(in_place, check), expected);
    }

    #[test]
    fn legacy_options_mirror_configuration() {
        let config = Config {
            legacy_globals: vec!["Log".into(), "config".into()],
            ..Config::default()
        };
        let options = legacy_options(&config);
        assert_eq!(options.legacy_package_name, "mirrorpack");
        assert_eq!(options.legacy_global_names, ["Log", "config"]);
        assert_eq!(options.helper_package_name, "mirrorpack/node-helper");
    }

    #[test]
    fn absolute_roots_skip_the_working_directory() {
        let config = Config {
            resolution_root: Utf8PathBuf::from("/srv/modules"),
            ..Config::default()
        };
        let options = transform_options(&config).expect("options");
        assert_eq!(options.resolution_root, Utf8PathBuf::from("/srv/modules"));
        assert_eq!(options.code_split, CodeSplitHint::Eager);
    }
}
