//! Source dialects accepted by the build pipeline.

use std::path::Path;

use strum::{Display, EnumString, IntoStaticStr};

/// Error returned when a language name is not recognised.
pub type LanguageParseError = strum::ParseError;

/// Dialect of a configuration or plugin source file.
///
/// Plugins are frequently React components, so both dialects are parsed
/// with the TSX grammar and JSX is accepted in either.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum SupportedLanguage {
    /// `.js`, `.mjs`, `.cjs` and `.jsx` files.
    #[default]
    #[strum(to_string = "javascript", serialize = "js")]
    JavaScript,
    /// `.ts`, `.mts`, `.cts` and `.tsx` files.
    #[strum(to_string = "typescript", serialize = "ts")]
    TypeScript,
}

const EXTENSIONS: &[(&str, SupportedLanguage)] = &[
    ("js", SupportedLanguage::JavaScript),
    ("mjs", SupportedLanguage::JavaScript),
    ("cjs", SupportedLanguage::JavaScript),
    ("jsx", SupportedLanguage::JavaScript),
    ("ts", SupportedLanguage::TypeScript),
    ("mts", SupportedLanguage::TypeScript),
    ("cts", SupportedLanguage::TypeScript),
    ("tsx", SupportedLanguage::TypeScript),
];

impl SupportedLanguage {
    /// Maps a file extension (without the dot) to a dialect.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(extension))
            .map(|&(_, language)| language)
    }

    /// Maps a file path to a dialect by its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str().and_then(Self::from_extension)
    }

    pub(crate) fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::JavaScript | Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}
