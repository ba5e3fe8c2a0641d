//! Errors raised while resolving and rewriting plugin sources.
//!
//! The first fatal error fails the whole pass over a file; nothing is
//! mutated when an error is returned. I/O errors are wrapped in `Arc` so the
//! error stays cheap to clone.

use std::fmt;
use std::io;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use mirrorpack_syntax::{Span, SyntaxError};
use thiserror::Error;

/// A position in a source file, displayed as `path:line:column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// File the position refers to.
    pub path: Utf8PathBuf,
    /// One-based line.
    pub line: u32,
    /// One-based column.
    pub column: u32,
}

impl Location {
    /// Creates a location from a lowered node's span.
    ///
    /// Synthesized nodes have no span and point at the start of the file.
    #[must_use]
    pub fn from_span(path: &Utf8Path, span: Option<&Span>) -> Self {
        let (line, column) = span.map_or((1, 1), |span| (span.line, span.column));
        Self {
            path: path.to_owned(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// Errors from the configuration and legacy module transforms.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// A plugin name is not safe to use as a path segment.
    #[error("{location}: invalid module name '{name}': names must be URI-safe path segments")]
    InvalidName {
        /// The offending name.
        name: String,
        /// Position of the `module` property.
        location: Location,
    },

    /// No file matched any candidate for a plugin.
    #[error(
        "{location}: module '{name}' not found; tried {} with extensions [{}]",
        join_paths(.candidates),
        .extensions.join(", ")
    )]
    NotFound {
        /// The plugin name.
        name: String,
        /// Candidate paths that were tried, in order.
        candidates: Vec<Utf8PathBuf>,
        /// Extension suffixes tried after each literal candidate.
        extensions: Vec<String>,
        /// Position of the `module` property.
        location: Location,
    },

    /// The resolution root is not an absolute path.
    #[error("resolution root must be absolute: {root}")]
    RelativeRoot {
        /// The configured root.
        root: Utf8PathBuf,
    },

    /// The overlay directory of a resolution root could not be listed.
    #[error("failed to list built-in modules under {root}: {source}")]
    Registry {
        /// The resolution root.
        root: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// A source file could not be parsed.
    #[error("{path}: {source}")]
    Syntax {
        /// The file that failed to parse.
        path: Utf8PathBuf,
        /// Underlying parse failure.
        #[source]
        source: Arc<SyntaxError>,
    },

    /// The file extension does not map to a supported language.
    #[error("unsupported source file: {path}")]
    UnsupportedFile {
        /// The rejected path.
        path: Utf8PathBuf,
    },
}

impl TransformError {
    /// Creates a registry listing error.
    #[must_use]
    pub fn registry(root: &Utf8Path, source: io::Error) -> Self {
        Self::Registry {
            root: root.to_owned(),
            source: Arc::new(source),
        }
    }

    /// Creates a parse error for `path`.
    #[must_use]
    pub fn syntax(path: &Utf8Path, source: SyntaxError) -> Self {
        Self::Syntax {
            path: path.to_owned(),
            source: Arc::new(source),
        }
    }
}

fn join_paths(paths: &[Utf8PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
