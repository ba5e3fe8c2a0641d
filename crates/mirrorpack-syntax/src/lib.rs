//! Tree-sitter powered source handling for the mirrorpack build pipeline.
//!
//! This crate turns JavaScript and TypeScript sources into a neutral tagged
//! tree that the resolution transforms can inspect and rewrite, and prints
//! the tree back out:
//!
//! - **Parsing** via [`Parser`] and [`SyntaxTree::parse`], which rejects
//!   sources with syntax errors
//! - **The neutral tree** ([`Node`], [`NodeKind`]), which keeps the source
//!   layout of every construct it does not model
//! - **Traversal** via [`VisitMut`] and [`walk_node_mut`]
//! - **Code generation** via [`Printer`], which spells lazy module
//!   references for the configured bundler ([`ChunkPragma`])
//!
//! # Supported Languages
//!
//! - JavaScript (`.js`, `.mjs`, `.cjs`, `.jsx`)
//! - TypeScript (`.ts`, `.mts`, `.cts`, `.tsx`)
//!
//! Both are parsed with the TSX grammar so JSX is accepted everywhere.
//!
//! # Example
//!
//! ```
//! use mirrorpack_syntax::{Printer, SupportedLanguage, SyntaxTree};
//!
//! let source = "let config = { modules: [] };\n";
//! let tree = SyntaxTree::parse(source, SupportedLanguage::JavaScript)?;
//! assert_eq!(tree.to_source(&Printer::default()), source);
//! # Ok::<(), mirrorpack_syntax::SyntaxError>(())
//! ```

mod document;
mod error;
mod language;
mod literal;
mod lower;
mod parser;
mod position;
mod printer;
mod tree;
mod visit;

pub use document::SyntaxTree;
pub use error::SyntaxError;
pub use language::{LanguageParseError, SupportedLanguage};
pub use lower::PROGRAM_KIND;
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use position::Span;
pub use printer::{ChunkPragma, Printer};
pub use tree::{
    Call, CodeSplitHint, ImportDecl, Member, ModuleRef, Node, NodeKind, ObjectMember, Piece,
    Property, PropertyKey, Seq, StrLit, Verbatim,
};
pub use visit::{VisitMut, walk_node_mut};

#[cfg(test)]
mod tests;
