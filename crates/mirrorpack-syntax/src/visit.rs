//! Generic mutable traversal over the neutral tree.
//!
//! Implement [`VisitMut::visit_node`] to inspect or rewrite nodes and call
//! [`walk_node_mut`] from it to continue into the children.
//!
//! ```
//! use mirrorpack_syntax::{Node, NodeKind, VisitMut, walk_node_mut};
//!
//! struct CountStrings(usize);
//!
//! impl VisitMut for CountStrings {
//!     fn visit_node(&mut self, node: &mut Node) {
//!         if matches!(node.kind(), NodeKind::Str(_)) {
//!             self.0 += 1;
//!         }
//!         walk_node_mut(self, node);
//!     }
//! }
//! ```

use crate::tree::{Node, NodeKind, ObjectMember, Piece, PropertyKey};

/// A mutable visitor over [`Node`] trees.
pub trait VisitMut {
    /// Visits one node. The default implementation visits every child.
    fn visit_node(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }
}

/// Visits the direct children of `node` with `visitor`.
pub fn walk_node_mut<V: VisitMut + ?Sized>(visitor: &mut V, node: &mut Node) {
    match node.kind_mut() {
        NodeKind::Object(members) => {
            for member in members.iter_mut() {
                match member {
                    ObjectMember::Property(property) => {
                        if let PropertyKey::Computed(key) = property.key_mut() {
                            visitor.visit_node(key);
                        }
                        visitor.visit_node(property.value_mut());
                    }
                    ObjectMember::Other(other) => visitor.visit_node(other),
                }
            }
        }
        NodeKind::Array(elements) => {
            for element in elements.iter_mut() {
                visitor.visit_node(element);
            }
        }
        NodeKind::Call(call) => {
            visitor.visit_node(&mut call.callee);
            for argument in call.arguments.iter_mut() {
                visitor.visit_node(argument);
            }
        }
        NodeKind::Member(member) => visitor.visit_node(&mut member.object),
        NodeKind::ExportDefault(inner) => visitor.visit_node(inner),
        NodeKind::Verbatim(verbatim) => {
            for piece in &mut verbatim.pieces {
                if let Piece::Node(child) = piece {
                    visitor.visit_node(child);
                }
            }
        }
        NodeKind::Str(_)
        | NodeKind::Bool(_)
        | NodeKind::Ident(_)
        | NodeKind::Import(_)
        | NodeKind::ModuleRef(_) => {}
    }
}
