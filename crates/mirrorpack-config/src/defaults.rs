use camino::Utf8PathBuf;

use crate::bundling::{CodeSplitMode, PragmaStyle};
use crate::logging::LogFormat;

/// Directory holding one subdirectory per module, relative to the working
/// directory unless configured as an absolute path.
pub const DEFAULT_RESOLUTION_ROOT: &str = "modules";

/// Extensions tried after each candidate name, in order.
pub const DEFAULT_EXTENSIONS: [&str; 5] = [".js", ".jsx", ".ts", ".tsx", ".mjs"];

/// Package legacy modules import `Module` and their globals from.
pub const DEFAULT_LEGACY_PACKAGE_NAME: &str = "mirrorpack";

/// Globals legacy modules relied on without importing them.
pub const DEFAULT_LEGACY_GLOBALS: [&str; 2] = ["Log", "MM"];

/// Package replacing `require("node_helper")` in migrated modules.
pub const DEFAULT_HELPER_PACKAGE_NAME: &str = "mirrorpack/node-helper";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default resolution root.
#[must_use]
pub fn default_resolution_root() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_RESOLUTION_ROOT)
}

/// Owned copy of [`DEFAULT_EXTENSIONS`].
#[must_use]
pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect()
}

/// Default code splitting mode.
#[must_use]
pub const fn default_code_split() -> CodeSplitMode {
    CodeSplitMode::Eager
}

/// Default chunk pragma style.
#[must_use]
pub const fn default_chunk_pragma() -> PragmaStyle {
    PragmaStyle::Webpack
}

/// Owned copy of [`DEFAULT_LEGACY_PACKAGE_NAME`].
#[must_use]
pub fn default_legacy_package_name() -> String {
    DEFAULT_LEGACY_PACKAGE_NAME.to_owned()
}

/// Owned copy of [`DEFAULT_LEGACY_GLOBALS`].
#[must_use]
pub fn default_legacy_globals() -> Vec<String> {
    DEFAULT_LEGACY_GLOBALS.iter().map(|name| (*name).to_owned()).collect()
}

/// Owned copy of [`DEFAULT_HELPER_PACKAGE_NAME`].
#[must_use]
pub fn default_helper_package_name() -> String {
    DEFAULT_HELPER_PACKAGE_NAME.to_owned()
}

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
