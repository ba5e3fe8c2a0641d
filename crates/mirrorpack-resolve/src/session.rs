//! Source-to-source facade over the transforms.
//!
//! A [`BuildSession`] owns the built-in module cache for one build, so every
//! configuration resolved through it shares a single scan per resolution
//! root. It parses source text, runs one transform and prints the result.

use camino::Utf8Path;
use mirrorpack_syntax::{Printer, SupportedLanguage, SyntaxTree};

use crate::config_transform::{ConfigTransformOptions, ConfigTransformer, ResolvedPlugin};
use crate::error::TransformError;
use crate::legacy_transform::{
    LegacyModuleTransformer, LegacyOutcome, LegacyTransformOptions, is_migration_candidate,
};
use crate::registry::{DefaultRegistry, FsOverlayScanner, OverlayScanner};

/// Output of resolving a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOutput {
    /// The rewritten configuration source.
    pub source: String,
    /// The modules that were resolved, in list order.
    pub plugins: Vec<ResolvedPlugin>,
}

/// Output of migrating one module file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOutput {
    /// The migrated source; identical to the input when nothing changed.
    pub source: String,
    /// What the migration changed.
    pub outcome: LegacyOutcome,
}

/// One build's worth of transforms sharing a registry cache.
#[derive(Debug)]
pub struct BuildSession<S = FsOverlayScanner> {
    registry: DefaultRegistry<S>,
    printer: Printer,
}

impl BuildSession {
    /// Creates a session backed by the local filesystem.
    #[must_use]
    pub fn new(printer: Printer) -> Self {
        Self::with_registry(DefaultRegistry::new(), printer)
    }
}

impl<S: OverlayScanner> BuildSession<S> {
    /// Creates a session around an existing registry.
    #[must_use]
    pub const fn with_registry(registry: DefaultRegistry<S>, printer: Printer) -> Self {
        Self { registry, printer }
    }

    /// Returns the session's registry, for lookups and invalidation.
    #[must_use]
    pub const fn registry(&self) -> &DefaultRegistry<S> {
        &self.registry
    }

    /// Resolves the module list of the configuration `source` read from
    /// `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnsupportedFile`] when `path` has no
    /// JavaScript or TypeScript extension, [`TransformError::Syntax`] when
    /// the source does not parse, and any resolution error from
    /// [`ConfigTransformer::transform`].
    pub fn resolve_config(
        &self,
        source: &str,
        path: &Utf8Path,
        options: &ConfigTransformOptions,
    ) -> Result<ConfigOutput, TransformError> {
        let mut tree = parse(source, path)?;
        let plugins = ConfigTransformer::new(&self.registry).transform(&mut tree, path, options)?;
        Ok(ConfigOutput {
            source: tree.to_source(&self.printer),
            plugins,
        })
    }

    /// Migrates the legacy module `source` read from `path`.
    ///
    /// Files that are neither entry points nor helper files are returned
    /// unchanged without being parsed.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnsupportedFile`] or
    /// [`TransformError::Syntax`] for candidate files that cannot be parsed.
    pub fn migrate_plugin(
        &self,
        source: &str,
        path: &Utf8Path,
        options: &LegacyTransformOptions,
    ) -> Result<PluginOutput, TransformError> {
        if !is_migration_candidate(path) {
            return Ok(PluginOutput {
                source: source.to_owned(),
                outcome: LegacyOutcome::default(),
            });
        }
        let mut tree = parse(source, path)?;
        let outcome = LegacyModuleTransformer::new(options.clone()).transform(&mut tree, path);
        let migrated = if outcome.is_changed() {
            tree.to_source(&self.printer)
        } else {
            source.to_owned()
        };
        Ok(PluginOutput {
            source: migrated,
            outcome,
        })
    }
}

fn parse(source: &str, path: &Utf8Path) -> Result<SyntaxTree, TransformError> {
    let language = SupportedLanguage::from_path(path.as_std_path()).ok_or_else(|| {
        TransformError::UnsupportedFile {
            path: path.to_owned(),
        }
    })?;
    SyntaxTree::parse(source, language).map_err(|error| TransformError::syntax(path, error))
}
