//! Migration of legacy `Module.register` modules.
//!
//! A legacy entry point is a file named after its directory
//! (`clock/clock.js`) whose top level calls
//! `Module.register("name", { ... })`. The call statement becomes
//! `export default Module.register(...)` and an import of `Module` plus the
//! configured globals is prepended. Separately, `require("node_helper")`
//! calls in entry points and helper files are pointed at the current helper
//! package. Running the migration on its own output changes nothing.

use camino::Utf8Path;
use mirrorpack_syntax::{
    ImportDecl, Node, NodeKind, Piece, SyntaxTree, Verbatim, VisitMut, walk_node_mut,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::RESOLVE_TARGET;
use crate::config_transform::HELPER_CANDIDATES;

const REGISTER_OBJECT: &str = "Module";
const REGISTER_METHOD: &str = "register";
const REQUIRE: &str = "require";
const LEGACY_HELPER_SPECIFIER: &str = "node_helper";
const EXPRESSION_STATEMENT: &str = "expression_statement";

/// Options for the legacy module migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransformOptions {
    /// Package the migrated import reads `Module` and the globals from.
    pub legacy_package_name: String,
    /// Globals legacy modules used without importing, in import order.
    pub legacy_global_names: Vec<String>,
    /// Package that replaces `require("node_helper")`.
    pub helper_package_name: String,
}

/// What the migration changed in one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyOutcome {
    /// The registration call was turned into a default export.
    pub registration_migrated: bool,
    /// Number of `require("node_helper")` specifiers rewritten.
    pub helper_requires_rewritten: usize,
}

impl LegacyOutcome {
    /// Returns `true` when the file was modified.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.registration_migrated || self.helper_requires_rewritten > 0
    }
}

/// Returns `true` when the file stem equals the name of its directory.
#[must_use]
pub fn is_legacy_entry_point(path: &Utf8Path) -> bool {
    let Some(stem) = path.file_stem() else {
        return false;
    };
    path.parent()
        .and_then(Utf8Path::file_name)
        .is_some_and(|dir| dir == stem)
}

/// Returns `true` for `node_helper.*` and `node-helper.*` files.
#[must_use]
pub fn is_helper_file(path: &Utf8Path) -> bool {
    path.file_stem()
        .is_some_and(|stem| HELPER_CANDIDATES.contains(&stem))
}

/// Returns `true` when [`LegacyModuleTransformer::transform`] may change
/// the file at `path`.
#[must_use]
pub fn is_migration_candidate(path: &Utf8Path) -> bool {
    is_legacy_entry_point(path) || is_helper_file(path)
}

/// Rewrites legacy module sources into the current module shape.
#[derive(Debug, Clone)]
pub struct LegacyModuleTransformer {
    options: LegacyTransformOptions,
}

impl LegacyModuleTransformer {
    /// Creates a transformer with `options`.
    #[must_use]
    pub const fn new(options: LegacyTransformOptions) -> Self {
        Self { options }
    }

    /// Returns the configured options.
    #[must_use]
    pub const fn options(&self) -> &LegacyTransformOptions {
        &self.options
    }

    /// Migrates `tree`, parsed from `path`, in place.
    ///
    /// Files that are neither entry points nor helper files are left alone.
    pub fn transform(&self, tree: &mut SyntaxTree, path: &Utf8Path) -> LegacyOutcome {
        let mut outcome = LegacyOutcome::default();
        if !is_migration_candidate(path) {
            debug!(target: RESOLVE_TARGET, file = %path, "not a module entry point or helper");
            return outcome;
        }

        if is_legacy_entry_point(path) && self.migrate_registration(tree) {
            outcome.registration_migrated = true;
        }

        let mut rewriter = HelperRequireRewriter {
            package: &self.options.helper_package_name,
            rewritten: 0,
        };
        rewriter.visit_node(tree.root_mut());
        outcome.helper_requires_rewritten = rewriter.rewritten;

        if outcome.is_changed() {
            info!(
                target: RESOLVE_TARGET,
                file = %path,
                registration = outcome.registration_migrated,
                requires = outcome.helper_requires_rewritten,
                "migrated legacy module"
            );
        }
        outcome
    }

    /// Replaces the first top-level registration statement and prepends the
    /// import. Returns `false` when no statement matched.
    fn migrate_registration(&self, tree: &mut SyntaxTree) -> bool {
        let Some(statement) = tree.statements_mut().find(|node| registration_call(node).is_some())
        else {
            return false;
        };
        let Some(exported) = export_registration(statement) else {
            return false;
        };
        *statement = exported;
        tree.prepend_statement(Node::new(NodeKind::Import(ImportDecl {
            names: self.import_names(),
            source: self.options.legacy_package_name.clone(),
        })));
        true
    }

    /// `Module` followed by the globals, first occurrence wins.
    fn import_names(&self) -> Vec<String> {
        let mut names: Vec<String> = vec![REGISTER_OBJECT.to_owned()];
        for global in &self.options.legacy_global_names {
            if !names.contains(global) {
                names.push(global.clone());
            }
        }
        names
    }
}

/// Returns the call node when `statement` is exactly
/// `Module.register("<name>", { ... });`.
fn registration_call(statement: &Node) -> Option<&Node> {
    let verbatim = statement.as_verbatim()?;
    if verbatim.kind != EXPRESSION_STATEMENT {
        return None;
    }
    let expression = verbatim.nodes().next()?;
    let call = expression.as_call()?;
    let NodeKind::Member(callee) = call.callee.kind() else {
        return None;
    };
    if !callee.is_static_path(REGISTER_OBJECT, REGISTER_METHOD) || !call.between.is_empty() {
        return None;
    }
    match call.arguments.items() {
        [name, definition] if name.as_str().is_some() && definition.as_object().is_some() => {
            Some(expression)
        }
        _ => None,
    }
}

/// Wraps the registration call of `statement` in `export default ...;`.
///
/// Text and comments after the call are kept; only the statement's own
/// `;` is dropped since the export supplies one.
fn export_registration(statement: &Node) -> Option<Node> {
    let call = registration_call(statement)?;
    let verbatim = statement.as_verbatim()?;
    let mut pieces = vec![Piece::Node(Node::new(NodeKind::ExportDefault(Box::new(
        call.clone(),
    ))))];
    let mut semicolon_dropped = false;
    let trailing = verbatim
        .pieces
        .iter()
        .skip_while(|piece| !matches!(piece, Piece::Node(_)))
        .skip(1);
    for piece in trailing {
        match piece {
            Piece::Text(text) if !semicolon_dropped && text.contains(';') => {
                semicolon_dropped = true;
                let kept = text.replacen(';', "", 1);
                if !kept.is_empty() {
                    pieces.push(Piece::Text(kept));
                }
            }
            other => pieces.push(other.clone()),
        }
    }
    Some(Node::new(NodeKind::Verbatim(Verbatim {
        kind: verbatim.kind.clone(),
        pieces,
    })))
}

struct HelperRequireRewriter<'a> {
    package: &'a str,
    rewritten: usize,
}

impl VisitMut for HelperRequireRewriter<'_> {
    fn visit_node(&mut self, node: &mut Node) {
        if let NodeKind::Call(call) = node.kind_mut()
            && call.callee.as_ident() == Some(REQUIRE)
            && call.arguments.len() == 1
            && let Some(literal) = call
                .arguments
                .items_mut()
                .first_mut()
                .and_then(Node::as_str_lit_mut)
            && literal.value() == LEGACY_HELPER_SPECIFIER
        {
            literal.set_value(self.package);
            self.rewritten = self.rewritten.saturating_add(1);
        }
        walk_node_mut(self, node);
    }
}
