//! Layered configuration for the mirrorpack tooling.
//!
//! [`Config`] merges built-in defaults, an optional configuration file,
//! `MIRRORPACK_*` environment variables and command-line flags, in that order
//! of increasing precedence.
//!
//! ```no_run
//! use mirrorpack_config::Config;
//!
//! let config = Config::load_from_iter(["mirrorpack", "--code-split", "lazy"])?;
//! assert_eq!(config.code_split().to_string(), "lazy");
//! # Ok::<(), std::sync::Arc<ortho_config::OrthoError>>(())
//! ```

mod bundling;
mod defaults;
mod logging;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use self::bundling::{BundlingParseError, CodeSplitMode, PragmaStyle};
pub use self::defaults::{
    DEFAULT_EXTENSIONS, DEFAULT_HELPER_PACKAGE_NAME, DEFAULT_LEGACY_GLOBALS,
    DEFAULT_LEGACY_PACKAGE_NAME, DEFAULT_LOG_FILTER, DEFAULT_RESOLUTION_ROOT,
    default_chunk_pragma, default_code_split, default_extensions, default_helper_package_name,
    default_legacy_globals, default_legacy_package_name, default_log_filter,
    default_log_filter_string, default_log_format, default_resolution_root,
};
pub use self::logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by every mirrorpack command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "MIRRORPACK")]
pub struct Config {
    /// Directory containing one subdirectory per module.
    #[ortho_config(default = crate::defaults::default_resolution_root())]
    pub resolution_root: Utf8PathBuf,
    /// Extensions tried after each candidate file name.
    #[ortho_config(default = crate::defaults::default_extensions())]
    pub extensions: Vec<String>,
    /// How `_path` annotations are emitted.
    #[ortho_config(default = crate::defaults::default_code_split())]
    pub code_split: CodeSplitMode,
    /// Chunk comment style for deferred imports.
    #[ortho_config(default = crate::defaults::default_chunk_pragma())]
    pub chunk_pragma: PragmaStyle,
    /// Package migrated modules import `Module` from.
    #[ortho_config(default = crate::defaults::default_legacy_package_name())]
    pub legacy_package_name: String,
    /// Globals added to the migrated import after `Module`.
    #[ortho_config(default = crate::defaults::default_legacy_globals())]
    pub legacy_globals: Vec<String>,
    /// Package replacing `require("node_helper")`.
    #[ortho_config(default = crate::defaults::default_helper_package_name())]
    pub helper_package_name: String,
    /// `tracing` filter expression.
    #[ortho_config(default = crate::defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = crate::defaults::default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolution_root: default_resolution_root(),
            extensions: default_extensions(),
            code_split: default_code_split(),
            chunk_pragma: default_chunk_pragma(),
            legacy_package_name: default_legacy_package_name(),
            legacy_globals: default_legacy_globals(),
            helper_package_name: default_helper_package_name(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Returns the configured resolution root, possibly relative.
    #[must_use]
    pub fn resolution_root(&self) -> &Utf8Path {
        &self.resolution_root
    }

    /// Returns the resolution root joined onto `cwd` when it is relative.
    #[must_use]
    pub fn absolute_resolution_root(&self, cwd: &Utf8Path) -> Utf8PathBuf {
        if self.resolution_root.is_absolute() {
            self.resolution_root.clone()
        } else {
            cwd.join(&self.resolution_root)
        }
    }

    /// Returns the extension list.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns the code splitting mode.
    #[must_use]
    pub const fn code_split(&self) -> CodeSplitMode {
        self.code_split
    }

    /// Returns the chunk pragma style.
    #[must_use]
    pub const fn chunk_pragma(&self) -> PragmaStyle {
        self.chunk_pragma
    }

    /// Returns the package migrated modules import from.
    #[must_use]
    pub fn legacy_package_name(&self) -> &str {
        &self.legacy_package_name
    }

    /// Returns the legacy global names.
    #[must_use]
    pub fn legacy_globals(&self) -> &[String] {
        &self.legacy_globals
    }

    /// Returns the helper package name.
    #[must_use]
    pub fn helper_package_name(&self) -> &str {
        &self.helper_package_name
    }

    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
