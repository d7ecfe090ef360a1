//! Path guard: decides whether a filesystem path lies inside the allowed roots.
//!
//! Every input is resolved to a canonical absolute path first (symlinks
//! followed, `..` collapsed) and then compared component-wise against the
//! canonical roots, so `/data-evil` never passes for `/data`.

use std::io;
use std::path::{Path, PathBuf};
use toolgate_domain::tool::value_objects::ToolError;
use tracing::{debug, warn};

/// Immutable set of canonical directory roots
#[derive(Debug, Clone, Default)]
pub struct PathGuard {
    roots: Vec<PathBuf>,
}

impl PathGuard {
    /// Canonicalize `roots`; entries that cannot be resolved or are not
    /// directories are skipped with a warning. No roots means deny-all.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut canonical: Vec<PathBuf> = Vec::new();

        for root in roots {
            let root = root.as_ref();
            match root.canonicalize() {
                Ok(path) if path.is_dir() => {
                    if !canonical.contains(&path) {
                        debug!(root = %path.display(), "Allowed root registered");
                        canonical.push(path);
                    }
                }
                Ok(_) => {
                    warn!(root = %root.display(), "Allowed root is not a directory, skipping");
                }
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "Allowed root cannot be resolved, skipping");
                }
            }
        }

        Self { roots: canonical }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// True iff the canonical form of `path` lies under an allowed root.
    ///
    /// Resolution failures (missing parent, permission error, symlink loop)
    /// count as "not allowed".
    pub fn is_allowed(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).is_some()
    }

    /// Canonical form of `path` if it is allowed
    pub fn resolve(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        let resolved = resolve_lenient(path.as_ref())?;
        self.contains_canonical(&resolved).then_some(resolved)
    }

    /// Like [`resolve`](Self::resolve) but fails with `AccessDenied`
    pub fn check(&self, path: &str) -> Result<PathBuf, ToolError> {
        self.resolve(path).ok_or_else(|| {
            debug!(path, "Path rejected by guard");
            ToolError::access_denied(format!("'{}' is outside the allowed directories", path))
                .with_details(format!("allowed: {}", self.describe_roots()))
        })
    }

    /// Whether an already-canonical path lies under a root
    pub fn contains_canonical(&self, canonical: &Path) -> bool {
        self.roots.iter().any(|root| canonical.starts_with(root))
    }

    fn describe_roots(&self) -> String {
        if self.roots.is_empty() {
            return "none".to_string();
        }
        self.roots
            .iter()
            .map(|r| r.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Canonicalize `path`, falling back to the canonical parent plus the final
/// name when the target itself does not exist yet.
fn resolve_lenient(path: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        return None;
    }

    match path.canonicalize() {
        Ok(resolved) => Some(resolved),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // file_name() is None for a trailing `..`
            let name = path.file_name()?;
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            let parent = parent.canonicalize().ok()?;
            Some(parent.join(name))
        }
        Err(_) => None,
    }
}
