//! Static module resolution and legacy module migration.
//!
//! The `mirrorpack-resolve` crate implements the two compile-time source
//! transforms of the mirrorpack build:
//!
//! - [`ConfigTransformer`] resolves every module named in a configuration's
//!   `modules` list to a concrete file, consulting the built-in overlay
//!   ([`DefaultRegistry`]) and the file-naming conventions
//!   ([`PathResolver`]), and annotates each entry with `_path` and
//!   `_helperPath`.
//! - [`LegacyModuleTransformer`] rewrites `Module.register(...)` entry points
//!   into default exports and repoints `require("node_helper")`.
//!
//! Both operate on [`mirrorpack_syntax::SyntaxTree`] values. [`BuildSession`]
//! wraps them into source-in, source-out calls that share one registry
//! cache.
//!
//! # Filesystem layout
//!
//! ```text
//! <root>/<name>[.ext]
//! <root>/<name>/<name>[.ext]
//! <root>/default/<name>[.ext]
//! <root>/default/<name>/<name>[.ext]
//! <root>/<base>/<name>/node_helper[.ext]
//! <root>/<base>/<name>/node-helper[.ext]
//! ```

mod config_transform;
mod error;
mod legacy_transform;
mod name;
mod path_resolver;
mod registry;
mod session;

#[cfg(test)]
mod tests;

/// Tracing target for resolution events.
pub const RESOLVE_TARGET: &str = "mirrorpack::resolve";

pub use self::config_transform::{
    ConfigTransformOptions, ConfigTransformer, HELPER_CANDIDATES, ResolvedPlugin,
    helper_candidates,
};
pub use self::error::{Location, TransformError};
pub use self::legacy_transform::{
    LegacyModuleTransformer, LegacyOutcome, LegacyTransformOptions, is_helper_file,
    is_legacy_entry_point, is_migration_candidate,
};
pub use self::name::{is_uri_safe, is_valid_plugin_name};
pub use self::path_resolver::{DEFAULT_EXTENSIONS, PathResolver, Unresolved};
pub use self::registry::{
    DefaultRegistry, FsOverlayScanner, OVERLAY_DIR, OverlayNames, OverlayScanner,
};
pub use self::session::{BuildSession, ConfigOutput, PluginOutput};
