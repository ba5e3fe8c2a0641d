//! Code generation from the neutral tree back to source text.
//!
//! Parsed nodes print with their original spelling and layout; synthesized
//! nodes print in a fixed house style. Lazy [`ModuleRef`] nodes become a
//! zero-argument arrow function around a dynamic `import()`, annotated for
//! the configured bundler.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::literal::quote;
use crate::tree::{
    CodeSplitHint, ImportDecl, ModuleRef, Node, NodeKind, ObjectMember, Piece, Property,
    PropertyKey, Seq, StrLit,
};

/// How chunk hints are spelled inside lazy `import()` calls.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ChunkPragma {
    /// `import(/* webpackChunkName: "clock" */ "...")`.
    #[default]
    Webpack,
    /// `import("...")` with no annotation.
    Bare,
}

/// Prints [`Node`] trees as source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    pragma: ChunkPragma,
}

impl Printer {
    /// Creates a printer that spells lazy references with `pragma`.
    #[must_use]
    pub const fn new(pragma: ChunkPragma) -> Self {
        Self { pragma }
    }

    /// Returns the chunk pragma style.
    #[must_use]
    pub const fn pragma(&self) -> ChunkPragma {
        self.pragma
    }

    /// Prints `node` and all of its descendants.
    #[must_use]
    pub fn print(&self, node: &Node) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: &Node, out: &mut String) {
        match node.kind() {
            NodeKind::Object(members) => {
                out.push('{');
                write_seq(members, out, |member, buffer| match member {
                    ObjectMember::Property(property) => self.write_property(property, buffer),
                    ObjectMember::Other(other) => self.write_node(other, buffer),
                });
                out.push('}');
            }
            NodeKind::Array(elements) => {
                out.push('[');
                write_seq(elements, out, |element, buffer| {
                    self.write_node(element, buffer);
                });
                out.push(']');
            }
            NodeKind::Call(call) => {
                self.write_node(&call.callee, out);
                out.push_str(&call.between);
                out.push('(');
                write_seq(&call.arguments, out, |argument, buffer| {
                    self.write_node(argument, buffer);
                });
                out.push(')');
            }
            NodeKind::Member(member) => {
                self.write_node(&member.object, out);
                out.push_str(&member.operator);
                out.push_str(&member.property);
            }
            NodeKind::Str(literal) => write_str(literal, out),
            NodeKind::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
            NodeKind::Ident(name) => out.push_str(name),
            NodeKind::Import(import) => write_import(import, out),
            NodeKind::ExportDefault(inner) => {
                out.push_str("export default ");
                self.write_node(inner, out);
                out.push(';');
            }
            NodeKind::ModuleRef(reference) => self.write_module_ref(reference, out),
            NodeKind::Verbatim(verbatim) => {
                for piece in &verbatim.pieces {
                    match piece {
                        Piece::Text(text) => out.push_str(text),
                        Piece::Node(child) => self.write_node(child, out),
                    }
                }
            }
        }
    }

    fn write_property(&self, property: &Property, out: &mut String) {
        match property.key() {
            PropertyKey::Ident(name) => out.push_str(name),
            PropertyKey::Str(literal) => write_str(literal, out),
            PropertyKey::Computed(key) => self.write_node(key, out),
        }
        out.push_str(property.colon());
        self.write_node(property.value(), out);
    }

    fn write_module_ref(&self, reference: &ModuleRef, out: &mut String) {
        let specifier = quote(&reference.specifier);
        match reference.hint {
            CodeSplitHint::Eager => out.push_str(&specifier),
            CodeSplitHint::Lazy => {
                out.push_str("() => import(");
                if self.pragma == ChunkPragma::Webpack {
                    out.push_str("/* webpackChunkName: ");
                    out.push_str(&quote(&reference.chunk_name));
                    out.push_str(" */ ");
                }
                out.push_str(&specifier);
                out.push(')');
            }
        }
    }
}

/// Writes items interleaved with the recorded gaps, leading gap first.
fn write_seq<T>(seq: &Seq<T>, out: &mut String, mut write_item: impl FnMut(&T, &mut String)) {
    let mut gaps = seq.gaps().iter();
    if let Some(leading) = gaps.next() {
        out.push_str(leading);
    }
    for (item, gap) in seq.iter().zip(gaps) {
        write_item(item, out);
        out.push_str(gap);
    }
}

fn write_str(literal: &StrLit, out: &mut String) {
    match literal.raw() {
        Some(raw) => out.push_str(raw),
        None => out.push_str(&quote(literal.value())),
    }
}

fn write_import(import: &ImportDecl, out: &mut String) {
    out.push_str("import { ");
    out.push_str(&import.names.join(", "));
    out.push_str(" } from ");
    out.push_str(&quote(&import.source));
    out.push(';');
}
