//! Command-line runtime for the mirrorpack build tooling.
//!
//! The runtime splits configuration flags from the subcommand, loads the
//! layered configuration, installs telemetry and runs one of the build-time
//! transforms. Configuration loading and the IO streams can be substituted
//! so the whole flow is testable in-process.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod config;
mod errors;
mod telemetry;

use cli::Cli;
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;

/// Tracing target for CLI events.
pub(crate) const CLI_TARGET: &str = "mirrorpack::cli";

/// CLI flags recognised by the configuration loader.
///
/// Keep in sync with the fields of `mirrorpack_config::Config`.
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--resolution-root",
    "--extensions",
    "--code-split",
    "--chunk-pragma",
    "--legacy-package-name",
    "--legacy-globals",
    "--helper-package-name",
    "--log-filter",
    "--log-format",
];

/// Bundles the output streams handed to the runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, 'io, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'io, W, E>,
    loader: &'a L,
}

impl<'a, 'io, W, E, L> CliRunner<'a, 'io, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(io: &'a mut IoStreams<'io, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let arguments: Vec<OsString> = args.into_iter().collect();
        let ConfigArgumentSplit {
            config_arguments,
            command_arguments,
        } = split_config_arguments(&arguments);

        let result = Cli::try_parse_from(command_arguments)
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                self.loader
                    .load(&config_arguments)
                    .map(|config| (cli, config))
            })
            .and_then(|(cli, config)| {
                telemetry::initialise(&config)?;
                commands::execute(&cli.command, &config, self.io)
            });

        match result {
            Ok(exit_code) => exit_code,
            Err(AppError::CliUsage(error)) => {
                // Help and version requests surface as errors that succeed.
                if error.use_stderr() {
                    let _ = write!(self.io.stderr, "{error}");
                    ExitCode::FAILURE
                } else {
                    let _ = write!(self.io.stdout, "{error}");
                    ExitCode::SUCCESS
                }
            }
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }
}

/// Runs the CLI using the provided arguments and output handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

#[cfg(test)]
mod tests;
