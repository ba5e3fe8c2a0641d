//! Parsed source files as neutral trees.

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::lower::lower_program;
use crate::parser::Parser;
use crate::printer::Printer;
use crate::tree::{Node, Piece, Verbatim};

/// Grammar kind of a `#!` interpreter line.
const HASH_BANG_KIND: &str = "hash_bang_line";

/// A source file lowered into the neutral node model.
///
/// The root is a `program` [`Verbatim`] node whose nested nodes are the
/// top-level statements (and comments) in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    root: Node,
    language: SupportedLanguage,
}

impl SyntaxTree {
    /// Parses and lowers `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::InvalidSource`] carrying the first syntax
    /// problem when the source does not parse cleanly, or a parser error
    /// when Tree-sitter cannot load the grammar.
    pub fn parse(source: &str, language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut parser = Parser::new(language)?;
        let parsed = parser.parse(source)?;
        if let Some(problem) = parsed.first_error() {
            return Err(SyntaxError::InvalidSource { language, problem });
        }
        Ok(Self {
            root: lower_program(&parsed),
            language,
        })
    }

    /// Returns the language the tree was parsed as.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the `program` root node.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the root node for mutation.
    pub const fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Iterates over the top-level statements.
    pub fn statements(&self) -> impl Iterator<Item = &Node> {
        self.root.as_verbatim().into_iter().flat_map(Verbatim::nodes)
    }

    /// Iterates mutably over the top-level statements.
    pub fn statements_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.root
            .as_verbatim_mut()
            .into_iter()
            .flat_map(Verbatim::nodes_mut)
    }

    /// Inserts `statement` as the first statement of the file, after any
    /// `#!` line, followed by a newline.
    pub fn prepend_statement(&mut self, statement: Node) {
        let Some(program) = self.root.as_verbatim_mut() else {
            return;
        };
        let hash_bang = program.pieces.iter().position(|piece| {
            matches!(piece, Piece::Node(node) if node.verbatim_kind() == Some(HASH_BANG_KIND))
        });
        let at = hash_bang.map_or(0, |index| index.saturating_add(1));
        let inserted = if at == 0 {
            [Piece::Node(statement), Piece::Text("\n".to_owned())]
        } else {
            [Piece::Text("\n".to_owned()), Piece::Node(statement)]
        };
        program.pieces.splice(at..at, inserted);
    }

    /// Prints the tree back to source text.
    #[must_use]
    pub fn to_source(&self, printer: &Printer) -> String {
        printer.print(&self.root)
    }
}
