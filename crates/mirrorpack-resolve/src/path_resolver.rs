//! Candidate-based file lookup.
//!
//! [`PathResolver`] tries each candidate relative to a base directory: the
//! literal path first, then the path with each configured extension appended.
//! When a candidate names a directory, the directory's `package.json` `main`
//! entry and then its `index` file are tried before the next candidate.

use std::fs;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::RESOLVE_TARGET;

/// Extensions tried after each literal candidate, in order.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx", ".mjs"];

const PACKAGE_MANIFEST: &str = "package.json";
const INDEX_STEM: &str = "index";

/// Failure value listing everything that was tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    /// Candidate paths, joined onto the base directory, in the order tried.
    pub candidates: Vec<Utf8PathBuf>,
    /// Extensions tried after each literal candidate.
    pub extensions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    main: Option<String>,
}

/// Resolves candidate names to files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    extensions: Vec<String>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl PathResolver {
    /// Creates a resolver that tries `extensions` in order.
    ///
    /// A leading `.` is added to extensions that lack one.
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| {
                let suffix = ext.as_ref();
                if suffix.starts_with('.') {
                    suffix.to_owned()
                } else {
                    format!(".{suffix}")
                }
            })
            .collect();
        Self { extensions }
    }

    /// Returns the extension suffixes in the order they are tried.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns the first candidate under `base` that exists as a file.
    ///
    /// # Errors
    ///
    /// Returns [`Unresolved`] with the full candidate and extension lists
    /// when nothing matches.
    pub fn resolve<S: AsRef<str>>(
        &self,
        base: &Utf8Path,
        candidates: &[S],
    ) -> Result<Utf8PathBuf, Unresolved> {
        let mut tried = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let path = base.join(candidate.as_ref());
            if let Some(found) = self.resolve_candidate(&path) {
                debug!(target: RESOLVE_TARGET, candidate = %path, found = %found, "candidate resolved");
                return Ok(found);
            }
            tried.push(path);
        }
        Err(Unresolved {
            candidates: tried,
            extensions: self.extensions.clone(),
        })
    }

    fn resolve_candidate(&self, path: &Utf8Path) -> Option<Utf8PathBuf> {
        if let Some(found) = self.resolve_file(path) {
            return Some(found);
        }
        if !path.is_dir() {
            return None;
        }
        if let Some(main) = read_manifest_main(path)
            && let Some(found) = self.resolve_file(&path.join(main))
        {
            return Some(found);
        }
        self.with_extensions(&path.join(INDEX_STEM))
    }

    /// Tries `path` literally, then with each extension.
    fn resolve_file(&self, path: &Utf8Path) -> Option<Utf8PathBuf> {
        if path.is_file() {
            return Some(path.to_owned());
        }
        self.with_extensions(path)
    }

    fn with_extensions(&self, path: &Utf8Path) -> Option<Utf8PathBuf> {
        self.extensions
            .iter()
            .map(|ext| Utf8PathBuf::from(format!("{path}{ext}")))
            .find(|candidate| candidate.is_file())
    }
}

/// Reads the `main` entry of `dir/package.json`, ignoring unreadable or
/// malformed manifests and entries that point outside `dir`.
fn read_manifest_main(dir: &Utf8Path) -> Option<String> {
    let manifest_path = dir.join(PACKAGE_MANIFEST);
    let contents = fs::read_to_string(&manifest_path).ok()?;
    match serde_json::from_str::<PackageManifest>(&contents) {
        Ok(manifest) => {
            let main = manifest.main.filter(|main| !main.is_empty())?;
            if stays_inside(Utf8Path::new(&main)) {
                return Some(main);
            }
            warn!(
                target: RESOLVE_TARGET,
                path = %manifest_path,
                %main,
                "ignoring package main outside the module directory"
            );
            None
        }
        Err(error) => {
            warn!(
                target: RESOLVE_TARGET,
                path = %manifest_path,
                %error,
                "ignoring malformed package manifest"
            );
            None
        }
    }
}

/// Returns whether `relative` names a path under its base once `.` and `..`
/// are applied lexically.
fn stays_inside(relative: &Utf8Path) -> bool {
    let mut depth = 0_usize;
    for component in relative.components() {
        match component {
            Utf8Component::Normal(_) => depth = depth.saturating_add(1),
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                let Some(parent) = depth.checked_sub(1) else {
                    return false;
                };
                depth = parent;
            }
            Utf8Component::RootDir | Utf8Component::Prefix(_) => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Tree {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    impl Tree {
        fn touch(&self, relative: &str, contents: &str) {
            let path = self.root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent");
            }
            fs::write(path, contents).expect("write file");
        }

        fn relative(&self, path: &Utf8Path) -> String {
            path.strip_prefix(&self.root)
                .expect("path under root")
                .to_string()
        }
    }

    #[fixture]
    fn tree() -> Tree {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Tree { _dir: dir, root }
    }

    #[rstest]
    fn nested_entry_point_resolves(tree: Tree) {
        tree.touch("clock/clock.js", "");
        let found = PathResolver::default()
            .resolve(&tree.root, &["clock", "clock/clock"])
            .expect("resolved");
        assert_eq!(tree.relative(&found), "clock/clock.js");
    }

    #[rstest]
    fn literal_match_wins_over_extensions(tree: Tree) {
        tree.touch("clock", "");
        tree.touch("clock.js", "");
        let found = PathResolver::default()
            .resolve(&tree.root, &["clock"])
            .expect("resolved");
        assert_eq!(tree.relative(&found), "clock");
    }

    #[rstest]
    fn extensions_are_tried_in_order(tree: Tree) {
        tree.touch("clock.ts", "");
        tree.touch("clock.mjs", "");
        let resolver = PathResolver::new([".mjs", ".ts"]);
        let found = resolver.resolve(&tree.root, &["clock"]).expect("resolved");
        assert_eq!(tree.relative(&found), "clock.mjs");
    }

    #[rstest]
    fn directory_index_is_tried_before_next_candidate(tree: Tree) {
        tree.touch("clock/index.js", "");
        tree.touch("clock/clock.js", "");
        let found = PathResolver::default()
            .resolve(&tree.root, &["clock", "clock/clock"])
            .expect("resolved");
        assert_eq!(tree.relative(&found), "clock/index.js");
    }

    #[rstest]
    fn package_main_is_preferred_over_index(tree: Tree) {
        tree.touch("clock/package.json", r#"{ "main": "dist/main" }"#);
        tree.touch("clock/dist/main.js", "");
        tree.touch("clock/index.js", "");
        let found = PathResolver::default()
            .resolve(&tree.root, &["clock"])
            .expect("resolved");
        assert_eq!(tree.relative(&found), "clock/dist/main.js");
    }

    #[rstest]
    fn malformed_manifest_falls_back_to_index(tree: Tree) {
        tree.touch("clock/package.json", "{ not json");
        tree.touch("clock/index.ts", "");
        let found = PathResolver::default()
            .resolve(&tree.root, &["clock"])
            .expect("resolved");
        assert_eq!(tree.relative(&found), "clock/index.ts");
    }

    #[rstest]
    #[case("../outside")]
    #[case("dist/../../outside")]
    #[case("/outside")]
    fn package_main_outside_directory_is_ignored(tree: Tree, #[case] main: &str) {
        tree.touch("clock/package.json", &format!(r#"{{ "main": "{main}" }}"#));
        tree.touch("outside.js", "");
        tree.touch("clock/index.js", "");
        let found = PathResolver::default()
            .resolve(&tree.root, &["clock"])
            .expect("resolved");
        assert_eq!(tree.relative(&found), "clock/index.js");
    }

    #[rstest]
    #[case("dist/main", true)]
    #[case("./dist/../main", true)]
    #[case("dist/../../main", false)]
    #[case("../main", false)]
    #[case("/main", false)]
    fn lexical_containment(#[case] relative: &str, #[case] inside: bool) {
        assert_eq!(stays_inside(Utf8Path::new(relative)), inside);
    }

    #[rstest]
    fn failure_lists_every_candidate(tree: Tree) {
        let resolver = PathResolver::new(["js", ".ts"]);
        let err = resolver
            .resolve(&tree.root, &["clock", "clock/clock"])
            .expect_err("nothing on disk");
        assert_eq!(
            err.candidates,
            vec![tree.root.join("clock"), tree.root.join("clock/clock")]
        );
        assert_eq!(err.extensions, vec![".js".to_owned(), ".ts".to_owned()]);
    }
}
