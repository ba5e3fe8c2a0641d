//! Thin front end over the Tree-sitter parser.
//!
//! Tree-sitter recovers from bad input instead of failing, so a
//! [`ParseResult`] always holds a tree. Callers that need clean input ask
//! it for [`ParseResult::first_error`]. Lowering lives in [`crate::lower`].

use std::fmt;

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::position::Span;

/// Characters of offending source echoed back in a diagnostic.
const SNIPPET_CHARS: usize = 40;

/// A Tree-sitter tree together with the text it was built from.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
    language: SupportedLanguage,
}

impl ParseResult {
    /// Returns the parsed text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the dialect the text was parsed as.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the `program` node.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Returns whether recovery inserted any error or missing node.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Returns the earliest syntax problem in document order.
    #[must_use]
    pub fn first_error(&self) -> Option<SyntaxErrorInfo> {
        self.problems().next()
    }

    /// Lists every syntax problem in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        self.problems().collect()
    }

    fn problems(&self) -> impl Iterator<Item = SyntaxErrorInfo> + '_ {
        ProblemNodes::new(self.tree.root_node())
            .map(|node| SyntaxErrorInfo::describe(node, &self.source))
    }
}

/// One place where the source does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Location of the offending node.
    pub span: Span,
    /// First line of the offending text, shortened for display.
    pub snippet: String,
    /// Grammar kind the parser had to invent, when input ended early or a
    /// token was left out.
    pub missing: Option<String>,
}

impl SyntaxErrorInfo {
    fn describe(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let span = Span::of(node);
        let snippet = span
            .text(source)
            .and_then(|text| text.lines().next())
            .map(shorten)
            .unwrap_or_default();
        Self {
            span,
            snippet,
            missing: node.is_missing().then(|| node.kind().to_owned()),
        }
    }
}

impl fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.missing {
            Some(kind) => write!(f, "expected `{kind}`"),
            None if self.snippet.is_empty() => f.write_str("unexpected input"),
            None => write!(f, "unexpected `{}`", self.snippet),
        }
    }
}

fn shorten(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Pre-order walk that yields error and missing nodes.
///
/// Subtrees without errors are skipped, as are the children of an error
/// node.
struct ProblemNodes<'tree> {
    cursor: tree_sitter::TreeCursor<'tree>,
    finished: bool,
}

impl<'tree> ProblemNodes<'tree> {
    fn new(root: tree_sitter::Node<'tree>) -> Self {
        Self {
            cursor: root.walk(),
            finished: false,
        }
    }

    fn skip_subtree(&mut self) {
        while !self.cursor.goto_next_sibling() {
            if !self.cursor.goto_parent() {
                self.finished = true;
                return;
            }
        }
    }
}

impl<'tree> Iterator for ProblemNodes<'tree> {
    type Item = tree_sitter::Node<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let node = self.cursor.node();
            let problem = node.is_error() || node.is_missing();
            let descended = !problem && node.has_error() && self.cursor.goto_first_child();
            if !descended {
                self.skip_subtree();
            }
            if problem {
                return Some(node);
            }
        }
        None
    }
}

/// Tree-sitter parser bound to one dialect.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Loads the grammar for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::Grammar`] when Tree-sitter rejects the
    /// grammar, which happens on an ABI mismatch.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let grammar = language.grammar();
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&grammar)
            .map_err(|error| SyntaxError::Grammar {
                language,
                reason: error.to_string(),
            })?;
        Ok(Self { inner, language })
    }

    /// Parses `source` from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::NoTree`] if Tree-sitter gives up without a
    /// tree. Syntax errors are not failures here; see
    /// [`ParseResult::first_error`].
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let Some(tree) = self.inner.parse(source, None) else {
            return Err(SyntaxError::NoTree {
                language: self.language,
            });
        };
        Ok(ParseResult {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}
