//! Shared helpers for the CLI tests.

use std::ffi::OsString;

use mirrorpack_config::Config;

use crate::{AppError, ConfigLoader};

/// Loader returning a fixed configuration.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Builds an argument vector from a whitespace-separated command line.
pub(super) fn build_args(command: &str) -> Vec<OsString> {
    let mut args = vec![OsString::from("mirrorpack")];
    args.extend(
        command
            .split_whitespace()
            .map(|token| OsString::from(token.trim_matches('"'))),
    );
    args
}
