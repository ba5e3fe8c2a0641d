//! Failures raised while turning source text into a [`crate::SyntaxTree`].

use thiserror::Error;

use crate::language::SupportedLanguage;
use crate::parser::SyntaxErrorInfo;

/// Errors from parsing and lowering.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Tree-sitter refused to load the grammar.
    #[error("cannot load the {language} grammar: {reason}")]
    Grammar {
        /// Dialect whose grammar failed to load.
        language: SupportedLanguage,
        /// Message from Tree-sitter.
        reason: String,
    },

    /// Tree-sitter gave up without producing a tree.
    #[error("the {language} parser produced no tree")]
    NoTree {
        /// Dialect being parsed.
        language: SupportedLanguage,
    },

    /// The source parsed with errors. Only the first is kept.
    #[error("invalid {language} source at {}: {problem}", .problem.span)]
    InvalidSource {
        /// Dialect the source was parsed as.
        language: SupportedLanguage,
        /// The earliest problem in the file.
        problem: SyntaxErrorInfo,
    },
}

impl SyntaxError {
    /// Returns the one-based line of the offending input, when there is one.
    #[must_use]
    pub const fn line(&self) -> Option<u32> {
        match self {
            Self::InvalidSource { problem, .. } => Some(problem.span.line),
            Self::Grammar { .. } | Self::NoTree { .. } => None,
        }
    }
}
