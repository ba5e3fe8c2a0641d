//! Built-in module discovery.
//!
//! Each resolution root may carry a reserved `default` overlay directory whose
//! immediate subdirectories are modules addressable by bare name. The
//! [`DefaultRegistry`] lists those names once per root and caches the result
//! for the lifetime of the registry. Concurrent first lookups for the same
//! root collapse into a single scan; the other callers block until it
//! completes. Failed scans are not cached.

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::RESOLVE_TARGET;
use crate::error::TransformError;

/// Name of the reserved overlay directory under a resolution root.
pub const OVERLAY_DIR: &str = "default";

/// Names of the built-in modules under one resolution root.
pub type OverlayNames = Arc<BTreeSet<String>>;

type Slot = Arc<OnceCell<OverlayNames>>;

/// Lists the module directories inside an overlay directory.
pub trait OverlayScanner: Send + Sync {
    /// Returns the visible subdirectory names of `overlay`.
    ///
    /// A missing overlay directory yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory exists but cannot be read.
    fn scan(&self, overlay: &Utf8Path) -> io::Result<BTreeSet<String>>;
}

/// Scans overlay directories on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOverlayScanner;

impl OverlayScanner for FsOverlayScanner {
    fn scan(&self, overlay: &Utf8Path) -> io::Result<BTreeSet<String>> {
        let dir = match Dir::open_ambient_dir(overlay, ambient_authority()) {
            Ok(dir) => dir,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(error) => return Err(error),
        };

        let mut names = BTreeSet::new();
        for item in dir.entries()? {
            let entry = item?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let file_type = entry.file_type()?;
            let is_dir = if file_type.is_symlink() {
                dir.metadata(&name).is_ok_and(|metadata| metadata.is_dir())
            } else {
                file_type.is_dir()
            };
            if is_dir {
                names.insert(name);
            }
        }
        Ok(names)
    }
}

/// Per-root cache of built-in module names.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use mirrorpack_resolve::DefaultRegistry;
///
/// let registry = DefaultRegistry::new();
/// let names = registry.names_in(Utf8Path::new("/srv/app/modules"))?;
/// println!("{} built-in modules", names.len());
/// # Ok::<(), mirrorpack_resolve::TransformError>(())
/// ```
#[derive(Debug, Default)]
pub struct DefaultRegistry<S = FsOverlayScanner> {
    scanner: S,
    cache: Mutex<HashMap<Utf8PathBuf, Slot>>,
}

impl DefaultRegistry {
    /// Creates a registry backed by the local filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: OverlayScanner> DefaultRegistry<S> {
    /// Creates a registry backed by `scanner`.
    #[must_use]
    pub fn with_scanner(scanner: S) -> Self {
        Self {
            scanner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the built-in module names under `root/default`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Registry`] when the overlay directory exists
    /// but cannot be listed.
    pub fn names_in(&self, root: &Utf8Path) -> Result<OverlayNames, TransformError> {
        let slot = self.slot(root);
        slot.get_or_try_init(|| {
            let overlay = root.join(OVERLAY_DIR);
            let names = self
                .scanner
                .scan(&overlay)
                .map_err(|error| TransformError::registry(root, error))?;
            debug!(
                target: RESOLVE_TARGET,
                root = %root,
                count = names.len(),
                "scanned built-in modules"
            );
            Ok(Arc::new(names))
        })
        .map(Arc::clone)
    }

    /// Returns `true` when `name` is a built-in module under `root`.
    ///
    /// # Errors
    ///
    /// Propagates listing failures from [`Self::names_in`].
    pub fn contains(&self, root: &Utf8Path, name: &str) -> Result<bool, TransformError> {
        Ok(self.names_in(root)?.contains(name))
    }

    /// Drops the cached names for `root`; the next lookup rescans.
    pub fn invalidate(&self, root: &Utf8Path) {
        self.lock().remove(root);
    }

    /// Drops every cached root.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn slot(&self, root: &Utf8Path) -> Slot {
        let mut cache = self.lock();
        Arc::clone(cache.entry(root.to_owned()).or_default())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Utf8PathBuf, Slot>> {
        // The map holds no invariants a panicking holder could break.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
