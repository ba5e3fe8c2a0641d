//! Neutral tagged-node representation of a source file.
//!
//! Transforms never touch Tree-sitter nodes directly. The concrete tree is
//! lowered into [`Node`] values that model only what the transforms inspect
//! (objects, arrays, calls, member accesses, literals, identifiers); every
//! other construct is kept as [`Verbatim`] text with its nested nodes still
//! reachable. Sequences remember the exact source between their items, so a
//! subtree that is not mutated prints back unchanged.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::position::Span;

/// How a downstream bundler should load a resolved module reference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CodeSplitHint {
    /// Inline the module into the referencing chunk.
    #[default]
    Eager,
    /// Load the module on demand from its own chunk.
    Lazy,
}

/// A node in the neutral tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    span: Option<Span>,
}

/// The variants a [`Node`] can take.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An object literal: `{ key: value, ... }`.
    Object(Seq<ObjectMember>),
    /// An array literal: `[a, b, ...]`.
    Array(Seq<Node>),
    /// A call expression: `callee(args)`.
    Call(Call),
    /// A member access: `object.property`.
    Member(Member),
    /// A string literal.
    Str(StrLit),
    /// A boolean literal.
    Bool(bool),
    /// A bare identifier.
    Ident(String),
    /// A synthesized named import declaration.
    Import(ImportDecl),
    /// A synthesized `export default <expr>;` statement.
    ExportDefault(Box<Node>),
    /// A synthesized reference to a resolved module on disk.
    ModuleRef(ModuleRef),
    /// Any other construct, kept as source text around nested nodes.
    Verbatim(Verbatim),
}

impl Node {
    /// Creates a synthesized node with no source position.
    #[must_use]
    pub const fn new(kind: NodeKind) -> Self {
        Self { kind, span: None }
    }

    pub(crate) const fn spanned(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span: Some(span),
        }
    }

    /// Creates a synthesized string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Str(StrLit::new(value)))
    }

    /// Returns the node's variant.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the node's variant for mutation.
    pub const fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Consumes the node, returning its variant.
    #[must_use]
    pub fn into_kind(self) -> NodeKind {
        self.kind
    }

    /// Returns where the node was parsed from, if it was not synthesized.
    #[must_use]
    pub const fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }

    /// Returns the members when the node is an object literal.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Seq<ObjectMember>> {
        match &self.kind {
            NodeKind::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Returns the members for mutation when the node is an object literal.
    pub const fn as_object_mut(&mut self) -> Option<&mut Seq<ObjectMember>> {
        match &mut self.kind {
            NodeKind::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Returns the elements when the node is an array literal.
    #[must_use]
    pub const fn as_array(&self) -> Option<&Seq<Self>> {
        match &self.kind {
            NodeKind::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the elements for mutation when the node is an array literal.
    pub const fn as_array_mut(&mut self) -> Option<&mut Seq<Self>> {
        match &mut self.kind {
            NodeKind::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the decoded value when the node is a string literal.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Str(literal) => Some(literal.value()),
            _ => None,
        }
    }

    /// Returns the literal when the node is a string literal.
    pub const fn as_str_lit_mut(&mut self) -> Option<&mut StrLit> {
        match &mut self.kind {
            NodeKind::Str(literal) => Some(literal),
            _ => None,
        }
    }

    /// Returns the value when the node is a boolean literal.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self.kind {
            NodeKind::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the name when the node is a bare identifier.
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the call when the node is a call expression.
    #[must_use]
    pub const fn as_call(&self) -> Option<&Call> {
        match &self.kind {
            NodeKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Returns the opaque construct when the node is verbatim text.
    #[must_use]
    pub const fn as_verbatim(&self) -> Option<&Verbatim> {
        match &self.kind {
            NodeKind::Verbatim(verbatim) => Some(verbatim),
            _ => None,
        }
    }

    /// Returns the opaque construct for mutation when the node is verbatim text.
    pub const fn as_verbatim_mut(&mut self) -> Option<&mut Verbatim> {
        match &mut self.kind {
            NodeKind::Verbatim(verbatim) => Some(verbatim),
            _ => None,
        }
    }

    /// Returns the grammar kind of a verbatim node (for example
    /// `lexical_declaration`).
    #[must_use]
    pub fn verbatim_kind(&self) -> Option<&str> {
        self.as_verbatim().map(|verbatim| verbatim.kind.as_str())
    }
}

/// A delimited, comma-separated sequence that keeps its original layout.
///
/// `gaps` always holds one more entry than `items`: the text between the
/// opening delimiter and the first item, the separators between items, and
/// the text between the last item and the closing delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct Seq<T> {
    items: Vec<T>,
    gaps: Vec<String>,
}

impl<T> Seq<T> {
    /// Creates a synthesized sequence separated by `", "`.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        let mut gaps = vec![String::new()];
        for _ in 1..items.len() {
            gaps.push(", ".to_owned());
        }
        if !items.is_empty() {
            gaps.push(String::new());
        }
        Self { items, gaps }
    }

    pub(crate) fn from_parts(items: Vec<T>, gaps: Vec<String>) -> Self {
        debug_assert_eq!(gaps.len(), items.len().saturating_add(1));
        Self { items, gaps }
    }

    /// Returns the items in source order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns the items for in-place mutation.
    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Returns the layout text surrounding the items.
    #[must_use]
    pub fn gaps(&self) -> &[String] {
        &self.gaps
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the sequence has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterates mutably over the items.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Inserts `item` at `index`, reusing the sequence's own separator style.
    ///
    /// Indices past the end append.
    pub fn insert(&mut self, index: usize, item: T) {
        let separator = self.separator();
        if self.items.is_empty() {
            self.items.push(item);
            self.gaps.push(String::new());
            return;
        }
        if index >= self.items.len() {
            // The closing gap (which may hold a trailing comma) stays last.
            let last = self.gaps.len().saturating_sub(1);
            self.items.push(item);
            self.gaps.insert(last, separator);
            return;
        }
        self.items.insert(index, item);
        self.gaps.insert(index.saturating_add(1), separator);
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        // Drop the separator that followed the item; the last item has none,
        // so drop the one that preceded it instead.
        let gap = if index.saturating_add(1) < self.gaps.len().saturating_sub(1) {
            index.saturating_add(1)
        } else {
            index
        };
        if self.items.is_empty() {
            self.gaps.truncate(1);
        } else {
            self.gaps.remove(gap);
        }
        Some(item)
    }

    /// Derives the separator to use for new items from existing layout.
    fn separator(&self) -> String {
        let sample = match self.gaps.get(1..self.items.len()) {
            Some(inner) if !inner.is_empty() => inner.first(),
            _ => self.gaps.first(),
        };
        sample.map_or_else(|| ", ".to_owned(), |gap| separator_from(gap))
    }
}

impl<T> Default for Seq<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn separator_from(gap: &str) -> String {
    if let Some((before, indent)) = gap.rsplit_once('\n') {
        if indent.chars().all(char::is_whitespace) {
            let line_end = if before.ends_with('\r') { "\r\n" } else { "\n" };
            return format!(",{line_end}{indent}");
        }
        return ", ".to_owned();
    }
    let trimmed = gap.trim();
    if trimmed == "," {
        gap.to_owned()
    } else {
        ", ".to_owned()
    }
}

/// An entry in an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    /// A `key: value` pair.
    Property(Property),
    /// Spreads, methods, shorthand properties and anything else.
    Other(Node),
}

impl ObjectMember {
    /// Returns the pair when the member is a `key: value` property.
    #[must_use]
    pub const fn as_property(&self) -> Option<&Property> {
        match self {
            Self::Property(property) => Some(property),
            Self::Other(_) => None,
        }
    }

    /// Returns the pair for mutation when the member is a property.
    pub const fn as_property_mut(&mut self) -> Option<&mut Property> {
        match self {
            Self::Property(property) => Some(property),
            Self::Other(_) => None,
        }
    }
}

/// A `key: value` pair in an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    key: PropertyKey,
    colon: String,
    value: Node,
    span: Option<Span>,
}

impl Property {
    /// Creates a synthesized property.
    ///
    /// The key is written bare when it is a plain identifier and quoted
    /// otherwise.
    #[must_use]
    pub fn new(key: &str, value: Node) -> Self {
        let key = if is_identifier(key) {
            PropertyKey::Ident(key.to_owned())
        } else {
            PropertyKey::Str(StrLit::new(key))
        };
        Self {
            key,
            colon: ": ".to_owned(),
            value,
            span: None,
        }
    }

    pub(crate) const fn from_parts(
        key: PropertyKey,
        colon: String,
        value: Node,
        span: Span,
    ) -> Self {
        Self {
            key,
            colon,
            value,
            span: Some(span),
        }
    }

    /// Returns the key.
    #[must_use]
    pub const fn key(&self) -> &PropertyKey {
        &self.key
    }

    /// Returns the static key name, if the key is not computed.
    #[must_use]
    pub fn key_name(&self) -> Option<&str> {
        match &self.key {
            PropertyKey::Ident(name) => Some(name),
            PropertyKey::Str(literal) => Some(literal.value()),
            PropertyKey::Computed(_) => None,
        }
    }

    /// Returns the text between the key and the value.
    #[must_use]
    pub fn colon(&self) -> &str {
        &self.colon
    }

    /// Returns the value.
    #[must_use]
    pub const fn value(&self) -> &Node {
        &self.value
    }

    /// Returns the value for mutation.
    pub const fn value_mut(&mut self) -> &mut Node {
        &mut self.value
    }

    /// Replaces the value.
    pub fn set_value(&mut self, value: Node) {
        self.value = value;
    }

    /// Returns the key mutably (computed keys may contain nested nodes).
    pub const fn key_mut(&mut self) -> &mut PropertyKey {
        &mut self.key
    }

    /// Returns where the property was parsed from.
    #[must_use]
    pub const fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }
}

/// The key of an object property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// A bare identifier key: `{ module: ... }`.
    Ident(String),
    /// A quoted key: `{ "module": ... }`.
    Str(StrLit),
    /// Numeric, computed or private keys.
    Computed(Node),
}

/// A string literal with its original spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrLit {
    value: String,
    raw: Option<String>,
}

impl StrLit {
    /// Creates a synthesized literal, printed with double quotes.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            raw: None,
        }
    }

    pub(crate) const fn parsed(value: String, raw: String) -> Self {
        Self {
            value,
            raw: Some(raw),
        }
    }

    /// Returns the decoded value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the source spelling, if the literal has not been modified.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Replaces the value; the literal is re-quoted when printed.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.raw = None;
    }
}

/// A call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// The called expression.
    pub callee: Box<Node>,
    /// Source text between the callee and the argument list (type arguments,
    /// optional chaining).
    pub between: String,
    /// The arguments.
    pub arguments: Seq<Node>,
}

/// A member access expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// The accessed object.
    pub object: Box<Node>,
    /// The access operator as written, including surrounding whitespace.
    pub operator: String,
    /// The property name.
    pub property: String,
}

impl Member {
    /// Returns `true` for `object.property` with a bare identifier object.
    #[must_use]
    pub fn is_static_path(&self, object: &str, property: &str) -> bool {
        self.operator.trim() == "."
            && self.property == property
            && self.object.as_ident() == Some(object)
    }
}

/// A named import declaration: `import { a, b } from "source";`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Imported binding names.
    pub names: Vec<String>,
    /// Module specifier.
    pub source: String,
}

/// A reference to a resolved module on disk, annotated for the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRef {
    /// Absolute path of the module.
    pub specifier: String,
    /// Chunk name used when the module is split out.
    pub chunk_name: String,
    /// How the bundler should load the module.
    pub hint: CodeSplitHint,
}

/// An opaque construct kept as source text around nested nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Verbatim {
    /// The Tree-sitter grammar kind the construct was lowered from.
    pub kind: String,
    /// Source text interleaved with nested nodes.
    pub pieces: Vec<Piece>,
}

impl Verbatim {
    /// Iterates over the nested nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.pieces.iter().filter_map(|piece| match piece {
            Piece::Node(node) => Some(node),
            Piece::Text(_) => None,
        })
    }

    /// Iterates mutably over the nested nodes.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.pieces.iter_mut().filter_map(|piece| match piece {
            Piece::Node(node) => Some(node),
            Piece::Text(_) => None,
        })
    }
}

/// A fragment of a [`Verbatim`] construct.
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    /// Source text copied as written.
    Text(String),
    /// A nested node.
    Node(Node),
}

/// Returns `true` when `name` can be written as a bare property key.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first == '$' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}
