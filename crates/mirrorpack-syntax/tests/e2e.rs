//! End-to-end tests for mirrorpack-syntax through its public API.

use insta::assert_snapshot;
use rstest::rstest;

use mirrorpack_syntax::{
    ChunkPragma, CodeSplitHint, ImportDecl, ModuleRef, Node, NodeKind, ObjectMember, Printer,
    Property, SupportedLanguage, SyntaxTree, VisitMut, walk_node_mut,
};

/// Annotates every `module: "<name>"` entry the way the resolver does.
struct Annotate {
    hint: CodeSplitHint,
}

impl VisitMut for Annotate {
    fn visit_node(&mut self, node: &mut Node) {
        if let Some(members) = node.as_object_mut() {
            let found = members.iter().enumerate().find_map(|(index, member)| {
                let property = member.as_property()?;
                (property.key_name() == Some("module"))
                    .then(|| property.value().as_str().map(|name| (index, name.to_owned())))
                    .flatten()
            });
            if let Some((index, name)) = found {
                let reference = Node::new(NodeKind::ModuleRef(ModuleRef {
                    specifier: format!("/srv/modules/{name}/{name}.js"),
                    chunk_name: name,
                    hint: self.hint,
                }));
                members.insert(
                    index.saturating_add(1),
                    ObjectMember::Property(Property::new("_path", reference)),
                );
                return;
            }
        }
        walk_node_mut(self, node);
    }
}

const CONFIG: &str = "let config = {\n\tmodules: [\n\t\t{\n\t\t\tmodule: \"clock\",\n\t\t\tposition: \"top_left\"\n\t\t}\n\t]\n};\n";

#[test]
fn eager_annotation_prints_absolute_path() {
    let mut tree = SyntaxTree::parse(CONFIG, SupportedLanguage::JavaScript)
        .unwrap_or_else(|err| panic!("parse: {err}"));
    Annotate {
        hint: CodeSplitHint::Eager,
    }
    .visit_node(tree.root_mut());

    assert_snapshot!(tree.to_source(&Printer::default()), @r#"
    let config = {
    	modules: [
    		{
    			module: "clock",
    			_path: "/srv/modules/clock/clock.js",
    			position: "top_left"
    		}
    	]
    };
    "#);
}

#[test]
fn lazy_annotation_prints_dynamic_import() {
    let mut tree = SyntaxTree::parse(CONFIG, SupportedLanguage::JavaScript)
        .unwrap_or_else(|err| panic!("parse: {err}"));
    Annotate {
        hint: CodeSplitHint::Lazy,
    }
    .visit_node(tree.root_mut());

    assert_snapshot!(tree.to_source(&Printer::new(ChunkPragma::Webpack)), @r#"
    let config = {
    	modules: [
    		{
    			module: "clock",
    			_path: () => import(/* webpackChunkName: "clock" */ "/srv/modules/clock/clock.js"),
    			position: "top_left"
    		}
    	]
    };
    "#);
}

#[test]
fn prepended_import_and_export_default() {
    let source = "Module.register(\"clock\", {\n\tstart() {}\n});\n";
    let mut tree = SyntaxTree::parse(source, SupportedLanguage::JavaScript)
        .unwrap_or_else(|err| panic!("parse: {err}"));
    let statement = tree
        .statements_mut()
        .next()
        .unwrap_or_else(|| panic!("expected a statement"));
    let call = statement
        .as_verbatim()
        .and_then(|verbatim| verbatim.nodes().next())
        .cloned()
        .unwrap_or_else(|| panic!("expected a call"));
    *statement = Node::new(NodeKind::ExportDefault(Box::new(call)));
    tree.prepend_statement(Node::new(NodeKind::Import(ImportDecl {
        names: vec!["Module".into(), "Log".into()],
        source: "mirrorpack".into(),
    })));

    assert_snapshot!(tree.to_source(&Printer::default()), @r#"
    import { Module, Log } from "mirrorpack";
    export default Module.register("clock", {
    	start() {}
    });
    "#);
}

#[rstest]
#[case("clock.js", Some(SupportedLanguage::JavaScript))]
#[case("clock.mjs", Some(SupportedLanguage::JavaScript))]
#[case("clock.jsx", Some(SupportedLanguage::JavaScript))]
#[case("clock.ts", Some(SupportedLanguage::TypeScript))]
#[case("clock.tsx", Some(SupportedLanguage::TypeScript))]
#[case("clock.css", None)]
#[case("clock", None)]
fn language_detection(#[case] file: &str, #[case] expected: Option<SupportedLanguage>) {
    assert_eq!(
        SupportedLanguage::from_path(std::path::Path::new(file)),
        expected
    );
}
