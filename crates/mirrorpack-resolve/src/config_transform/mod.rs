//! Static resolution of the configuration's module list.
//!
//! The transformer finds the top-level configuration object, walks its
//! `modules` array and, for every enabled entry with a literal `module` name,
//! resolves the module's source file and optional helper file. Entries are
//! annotated with `_path` (and `_helperPath` when a helper exists) directly
//! after their `module` property.
//!
//! Resolution runs to completion before anything is written back, so a
//! failing entry leaves the whole tree untouched.

use camino::{Utf8Path, Utf8PathBuf};
use mirrorpack_syntax::{
    CodeSplitHint, ModuleRef, Node, NodeKind, ObjectMember, Property, Seq, SyntaxTree,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::RESOLVE_TARGET;
use crate::error::{Location, TransformError};
use crate::name::is_valid_plugin_name;
use crate::path_resolver::{DEFAULT_EXTENSIONS, PathResolver};
use crate::registry::{DefaultRegistry, FsOverlayScanner, OVERLAY_DIR, OverlayScanner};

const MODULES_KEY: &str = "modules";
const MODULE_KEY: &str = "module";
const DISABLED_KEY: &str = "disabled";
const PATH_KEY: &str = "_path";
const HELPER_PATH_KEY: &str = "_helperPath";

/// File stems tried, in order, for a module's server-side helper.
pub const HELPER_CANDIDATES: [&str; 2] = ["node_helper", "node-helper"];

/// Returns the helper file stems, in the order they are tried.
#[must_use]
pub const fn helper_candidates() -> &'static [&'static str] {
    &HELPER_CANDIDATES
}

/// Grammar kinds the configuration object may be nested in.
const CONTAINER_KINDS: &[&str] = &[
    "lexical_declaration",
    "variable_declaration",
    "variable_declarator",
    "expression_statement",
    "assignment_expression",
    "export_statement",
    "parenthesized_expression",
    "as_expression",
    "satisfies_expression",
];

/// Options for one configuration transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTransformOptions {
    /// Absolute directory holding one subdirectory per module.
    pub resolution_root: Utf8PathBuf,
    /// Extensions tried after each literal candidate, in order.
    pub extensions: Vec<String>,
    /// How resolved sources are referenced.
    pub code_split: CodeSplitHint,
}

impl ConfigTransformOptions {
    /// Creates options with the default extensions and eager references.
    #[must_use]
    pub fn new(resolution_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            resolution_root: resolution_root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect(),
            code_split: CodeSplitHint::default(),
        }
    }

    /// Replaces the extension list.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the code-split hint attached to `_path`.
    #[must_use]
    pub const fn with_code_split(mut self, code_split: CodeSplitHint) -> Self {
        self.code_split = code_split;
        self
    }
}

/// A module entry resolved to files on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPlugin {
    name: String,
    source_path: Utf8PathBuf,
    helper_path: Option<Utf8PathBuf>,
    is_default: bool,
}

impl ResolvedPlugin {
    /// Returns the module name as written in the configuration.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the absolute path of the module's source file.
    #[must_use]
    pub fn source_path(&self) -> &Utf8Path {
        &self.source_path
    }

    /// Returns the absolute path of the module's helper file, if any.
    #[must_use]
    pub fn helper_path(&self) -> Option<&Utf8Path> {
        self.helper_path.as_deref()
    }

    /// Returns `true` when the module was found in the built-in overlay.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }
}

/// Rewrites configuration sources against a [`DefaultRegistry`].
#[derive(Debug)]
pub struct ConfigTransformer<'r, S = FsOverlayScanner> {
    registry: &'r DefaultRegistry<S>,
}

impl<'r, S: OverlayScanner> ConfigTransformer<'r, S> {
    /// Creates a transformer that consults `registry` for built-in modules.
    #[must_use]
    pub const fn new(registry: &'r DefaultRegistry<S>) -> Self {
        Self { registry }
    }

    /// Resolves and annotates every qualifying entry of the configuration in
    /// `tree`. `file` is used for error locations only.
    ///
    /// Returns the resolved modules in list order. A configuration without
    /// a literal `modules` list is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::RelativeRoot`] for a relative resolution
    /// root, [`TransformError::InvalidName`] for a name that is not URI-safe,
    /// [`TransformError::NotFound`] when no candidate file exists, and
    /// [`TransformError::Registry`] when the overlay cannot be listed. The
    /// tree is not modified when an error is returned.
    pub fn transform(
        &self,
        tree: &mut SyntaxTree,
        file: &Utf8Path,
        options: &ConfigTransformOptions,
    ) -> Result<Vec<ResolvedPlugin>, TransformError> {
        let root = options.resolution_root.as_path();
        if !root.is_absolute() {
            return Err(TransformError::RelativeRoot {
                root: root.to_owned(),
            });
        }

        let Some(config) = tree.statements_mut().find_map(find_config) else {
            debug!(target: RESOLVE_TARGET, file = %file, "no modules list found");
            return Ok(Vec::new());
        };

        let planned = self.plan(config, file, options)?;

        if let Some(entries) = modules_list_mut(config) {
            for (index, plugin) in &planned {
                if let Some(members) = entries.items_mut().get_mut(*index).and_then(Node::as_object_mut)
                {
                    annotate(members, plugin, options.code_split);
                }
            }
        }

        info!(
            target: RESOLVE_TARGET,
            file = %file,
            root = %root,
            resolved = planned.len(),
            "resolved configuration modules"
        );
        Ok(planned.into_iter().map(|(_, plugin)| plugin).collect())
    }

    /// Resolves every qualifying entry without touching the tree.
    fn plan(
        &self,
        config: &Node,
        file: &Utf8Path,
        options: &ConfigTransformOptions,
    ) -> Result<Vec<(usize, ResolvedPlugin)>, TransformError> {
        let Some(entries) = modules_list(config) else {
            return Ok(Vec::new());
        };
        let resolver = PathResolver::new(&options.extensions);
        let mut planned = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let Some(members) = entry.as_object() else {
                continue;
            };
            if is_disabled(members) {
                debug!(target: RESOLVE_TARGET, index, "skipping disabled entry");
                continue;
            }
            let Some((module, name)) = module_name(members) else {
                continue;
            };
            let location = Location::from_span(file, module.span());
            if !is_valid_plugin_name(name) {
                return Err(TransformError::InvalidName {
                    name: name.to_owned(),
                    location,
                });
            }
            let plugin = self.resolve(&resolver, &options.resolution_root, name, location)?;
            planned.push((index, plugin));
        }
        Ok(planned)
    }

    fn resolve(
        &self,
        resolver: &PathResolver,
        root: &Utf8Path,
        name: &str,
        location: Location,
    ) -> Result<ResolvedPlugin, TransformError> {
        let is_default = self.registry.contains(root, name)?;
        let base = if is_default {
            root.join(OVERLAY_DIR)
        } else {
            root.to_owned()
        };
        let candidates = [name.to_owned(), format!("{name}/{name}")];
        let source_path =
            resolver
                .resolve(&base, &candidates)
                .map_err(|unresolved| TransformError::NotFound {
                    name: name.to_owned(),
                    candidates: unresolved.candidates,
                    extensions: unresolved.extensions,
                    location,
                })?;
        let helper_path = resolver.resolve(&base.join(name), &HELPER_CANDIDATES).ok();
        debug!(
            target: RESOLVE_TARGET,
            plugin = name,
            source = %source_path,
            helper = ?helper_path,
            is_default,
            "resolved module"
        );
        Ok(ResolvedPlugin {
            name: name.to_owned(),
            source_path,
            helper_path,
            is_default,
        })
    }
}

/// Returns `node` or the first configuration object nested in it.
fn find_config(node: &mut Node) -> Option<&mut Node> {
    if modules_list(node).is_some() {
        return Some(node);
    }
    let verbatim = node.as_verbatim_mut()?;
    if !CONTAINER_KINDS.contains(&verbatim.kind.as_str()) {
        return None;
    }
    verbatim.nodes_mut().find_map(find_config)
}

/// Object literals let a repeated key override earlier ones, so lookups
/// take the last match.
fn find_property<'a>(members: &'a Seq<ObjectMember>, key: &str) -> Option<&'a Property> {
    members
        .iter()
        .filter_map(ObjectMember::as_property)
        .rfind(|property| property.key_name() == Some(key))
}

fn position_of(members: &Seq<ObjectMember>, key: &str) -> Option<usize> {
    members.iter().rposition(|member| {
        member
            .as_property()
            .is_some_and(|property| property.key_name() == Some(key))
    })
}

fn modules_list(node: &Node) -> Option<&Seq<Node>> {
    find_property(node.as_object()?, MODULES_KEY)?.value().as_array()
}

fn modules_list_mut(node: &mut Node) -> Option<&mut Seq<Node>> {
    node.as_object_mut()?
        .iter_mut()
        .filter_map(ObjectMember::as_property_mut)
        .rfind(|property| property.key_name() == Some(MODULES_KEY))?
        .value_mut()
        .as_array_mut()
}

fn is_disabled(members: &Seq<ObjectMember>) -> bool {
    find_property(members, DISABLED_KEY).is_some_and(|property| property.value().as_bool() == Some(true))
}

/// Returns the `module` property and its name when the value is a literal
/// string.
fn module_name(members: &Seq<ObjectMember>) -> Option<(&Property, &str)> {
    let property = find_property(members, MODULE_KEY)?;
    let name = property.value().as_str()?;
    Some((property, name))
}

fn annotate(members: &mut Seq<ObjectMember>, plugin: &ResolvedPlugin, hint: CodeSplitHint) {
    let Some(module_index) = position_of(members, MODULE_KEY) else {
        return;
    };
    let reference = Node::new(NodeKind::ModuleRef(ModuleRef {
        specifier: plugin.source_path.to_string(),
        chunk_name: plugin.name.clone(),
        hint,
    }));
    let path_index = upsert(members, module_index, PATH_KEY, reference);
    let helper = plugin
        .helper_path
        .as_ref()
        .map(|path| Node::string(path.as_str()));
    set_or_remove(members, path_index, HELPER_PATH_KEY, helper);
}

/// Replaces the value of `key`, or inserts it directly after `after`.
/// Returns the property's index.
fn upsert(members: &mut Seq<ObjectMember>, after: usize, key: &str, value: Node) -> usize {
    if let Some(existing) = position_of(members, key) {
        if let Some(property) = members
            .items_mut()
            .get_mut(existing)
            .and_then(ObjectMember::as_property_mut)
        {
            property.set_value(value);
        }
        return existing;
    }
    let at = after.saturating_add(1);
    members.insert(at, ObjectMember::Property(Property::new(key, value)));
    at
}

fn set_or_remove(members: &mut Seq<ObjectMember>, after: usize, key: &str, value: Option<Node>) {
    let Some(node) = value else {
        while let Some(stale) = position_of(members, key) {
            members.remove(stale);
        }
        return;
    };
    upsert(members, after, key, node);
}
