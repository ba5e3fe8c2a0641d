//! Lowering from the Tree-sitter concrete tree into the neutral node model.
//!
//! Only the constructs the transforms inspect get a structured variant.
//! Everything else becomes [`Verbatim`]: the source text between a node's
//! named children is kept as text and the children are lowered recursively,
//! so calls nested inside functions, classes or template substitutions stay
//! reachable by visitors.

use std::ops::Range;

use tree_sitter::Node as TsNode;

use crate::literal::decode_escape;
use crate::parser::ParseResult;
use crate::position::Span;
use crate::tree::{
    Call, Member, Node, NodeKind, ObjectMember, Piece, Property, PropertyKey, Seq, StrLit,
    Verbatim,
};

/// Grammar kind of the lowered root node.
pub const PROGRAM_KIND: &str = "program";

/// Lowers a parse result into a `program` verbatim node covering the whole
/// source, including any leading and trailing whitespace.
pub(crate) fn lower_program(parsed: &ParseResult) -> Node {
    let source = parsed.source();
    let root = parsed.root_node();
    let lowerer = Lowerer { source };
    let verbatim = Verbatim {
        kind: PROGRAM_KIND.to_owned(),
        pieces: lowerer.pieces(root, 0, source.len()),
    };
    Node::spanned(NodeKind::Verbatim(verbatim), Span::of(root))
}

struct Lowerer<'src> {
    source: &'src str,
}

impl<'src> Lowerer<'src> {
    fn text(&self, range: Range<usize>) -> &'src str {
        self.source.get(range).unwrap_or_default()
    }

    fn lower(&self, node: TsNode<'_>) -> Node {
        let kind = self
            .structured(node)
            .unwrap_or_else(|| NodeKind::Verbatim(self.verbatim(node)));
        Node::spanned(kind, Span::of(node))
    }

    fn structured(&self, node: TsNode<'_>) -> Option<NodeKind> {
        match node.kind() {
            "object" => self
                .sequence(node, b'{', b'}', |child| self.object_member(child))
                .map(NodeKind::Object),
            "array" => self
                .sequence(node, b'[', b']', |child| self.lower(child))
                .map(NodeKind::Array),
            "call_expression" => self.call(node).map(NodeKind::Call),
            "member_expression" => self.member(node).map(NodeKind::Member),
            "string" => Some(NodeKind::Str(self.string(node))),
            "true" => Some(NodeKind::Bool(true)),
            "false" => Some(NodeKind::Bool(false)),
            "identifier" => Some(NodeKind::Ident(self.text(node.byte_range()).to_owned())),
            _ => None,
        }
    }

    fn verbatim(&self, node: TsNode<'_>) -> Verbatim {
        Verbatim {
            kind: node.kind().to_owned(),
            pieces: self.pieces(node, node.start_byte(), node.end_byte()),
        }
    }

    fn pieces(&self, node: TsNode<'_>, start: usize, end: usize) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut position = start;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            push_text(&mut pieces, self.text(position..child.start_byte()));
            pieces.push(Piece::Node(self.lower(child)));
            position = child.end_byte();
        }
        push_text(&mut pieces, self.text(position..end));
        pieces
    }

    /// Splits a delimited container into items and the text around them.
    /// Comments stay in the layout text.
    fn sequence<T>(
        &self,
        node: TsNode<'_>,
        open: u8,
        close: u8,
        mut lower_item: impl FnMut(TsNode<'_>) -> T,
    ) -> Option<Seq<T>> {
        let range = node.byte_range();
        let bytes = self.source.as_bytes();
        let inner_start = range.start.checked_add(1)?;
        let inner_end = range.end.checked_sub(1)?;
        if inner_start > inner_end
            || bytes.get(range.start) != Some(&open)
            || bytes.get(inner_end) != Some(&close)
        {
            return None;
        }

        let mut items = Vec::new();
        let mut gaps = Vec::new();
        let mut position = inner_start;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "comment" {
                continue;
            }
            gaps.push(self.text(position..child.start_byte()).to_owned());
            items.push(lower_item(child));
            position = child.end_byte();
        }
        gaps.push(self.text(position..inner_end).to_owned());
        Some(Seq::from_parts(items, gaps))
    }

    fn object_member(&self, node: TsNode<'_>) -> ObjectMember {
        if node.kind() == "pair"
            && let Some(property) = self.pair(node)
        {
            return ObjectMember::Property(property);
        }
        ObjectMember::Other(self.lower(node))
    }

    fn pair(&self, node: TsNode<'_>) -> Option<Property> {
        let key = node.child_by_field_name("key")?;
        let value = node.child_by_field_name("value")?;
        let lowered_key = match key.kind() {
            "property_identifier" => PropertyKey::Ident(self.text(key.byte_range()).to_owned()),
            "string" => PropertyKey::Str(self.string(key)),
            _ => PropertyKey::Computed(self.lower(key)),
        };
        let colon = self.text(key.end_byte()..value.start_byte()).to_owned();
        Some(Property::from_parts(
            lowered_key,
            colon,
            self.lower(value),
            Span::of(node),
        ))
    }

    fn call(&self, node: TsNode<'_>) -> Option<Call> {
        let function = node.child_by_field_name("function")?;
        let arguments = node.child_by_field_name("arguments")?;
        // Tagged templates put a template string in the arguments slot.
        if arguments.kind() != "arguments" {
            return None;
        }
        let lowered_arguments = self.sequence(arguments, b'(', b')', |child| self.lower(child))?;
        Some(Call {
            callee: Box::new(self.lower(function)),
            between: self
                .text(function.end_byte()..arguments.start_byte())
                .to_owned(),
            arguments: lowered_arguments,
        })
    }

    fn member(&self, node: TsNode<'_>) -> Option<Member> {
        let object = node.child_by_field_name("object")?;
        let property = node.child_by_field_name("property")?;
        Some(Member {
            object: Box::new(self.lower(object)),
            operator: self
                .text(object.end_byte()..property.start_byte())
                .to_owned(),
            property: self.text(property.byte_range()).to_owned(),
        })
    }

    fn string(&self, node: TsNode<'_>) -> StrLit {
        let mut value = String::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            let text = self.text(child.byte_range());
            if child.kind() == "escape_sequence" {
                value.push_str(&decode_escape(text));
            } else {
                value.push_str(text);
            }
        }
        StrLit::parsed(value, self.text(node.byte_range()).to_owned())
    }
}

fn push_text(pieces: &mut Vec<Piece>, text: &str) {
    if !text.is_empty() {
        pieces.push(Piece::Text(text.to_owned()));
    }
}
