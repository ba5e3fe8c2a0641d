//! Command-line argument definitions for `mirrorpack`.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Build-time module resolution and legacy module migration.
#[derive(Parser, Debug)]
#[command(name = "mirrorpack", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// The operation to run.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Subcommands accepted by the binary.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Resolves every module named in a configuration file.
    Resolve {
        /// The configuration source file.
        #[arg(value_name = "CONFIG")]
        config: Utf8PathBuf,
        /// Prints the resolved modules as JSON instead of the rewritten source.
        #[arg(long)]
        report: bool,
        /// Writes the result to this file instead of stdout.
        #[arg(long, value_name = "FILE")]
        output: Option<Utf8PathBuf>,
    },
    /// Rewrites legacy module sources into the current module shape.
    Migrate {
        /// Module source files to migrate.
        #[arg(value_name = "FILE", required = true)]
        files: Vec<Utf8PathBuf>,
        /// Rewrites changed files on disk.
        #[arg(long, conflicts_with = "check")]
        in_place: bool,
        /// Fails when any file would change, without writing anything.
        #[arg(long)]
        check: bool,
    },
    /// Lists the built-in modules of the resolution root.
    Defaults,
}
