//! Bounded, read-only filesystem access.
//!
//! All three operations resolve their input through the [`PathGuard`] first
//! and apply the size and count caps from [`ExecutionLimits`]. They are
//! synchronous; tool handlers run them on the blocking pool.

use super::path_guard::PathGuard;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use toolgate_domain::sandbox::ExecutionLimits;
use toolgate_domain::tool::value_objects::ToolError;
use tracing::debug;
use walkdir::WalkDir;

/// Text read by [`BoundedReader::read_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: PathBuf,
    pub text: String,
    /// Size of the file on disk
    pub bytes: u64,
    /// Lines dropped by the `max_lines` cap
    pub omitted_lines: usize,
}

impl FileContent {
    pub fn is_truncated(&self) -> bool {
        self.omitted_lines > 0
    }

    /// Text as shown to the model
    pub fn render(&self) -> String {
        if self.omitted_lines > 0 {
            format!(
                "{}\n... ({} more lines truncated)",
                self.text, self.omitted_lines
            )
        } else {
            self.text.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirEntryKind {
    Directory,
    File { size: u64 },
    Symlink,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: DirEntryKind,
}

/// Result of [`BoundedReader::list_directory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub path: PathBuf,
    /// Entries sorted by name, capped at `max_dir_entries`
    pub entries: Vec<DirEntry>,
    pub total: usize,
}

impl DirListing {
    pub fn is_truncated(&self) -> bool {
        self.total > self.entries.len()
    }

    pub fn render(&self) -> String {
        if self.total == 0 {
            return format!("Directory is empty: {}", self.path.display());
        }

        let mut out = format!("Contents of {}:", self.path.display());
        for entry in &self.entries {
            out.push('\n');
            match entry.kind {
                DirEntryKind::Directory => out.push_str(&format!("📁 {}/", entry.name)),
                DirEntryKind::File { size } => {
                    out.push_str(&format!("📄 {} ({} bytes)", entry.name, size))
                }
                DirEntryKind::Symlink => out.push_str(&format!("🔗 {}@", entry.name)),
                DirEntryKind::Other => out.push_str(&format!("❔ {}", entry.name)),
            }
        }
        if self.is_truncated() {
            out.push_str(&format!(
                "\n... ({} more entries not shown)",
                self.total - self.entries.len()
            ));
        }
        out
    }
}

/// Result of [`BoundedReader::search_files`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatches {
    pub directory: PathBuf,
    pub pattern: String,
    /// Paths relative to `directory`, capped at `max_search_matches`
    pub matches: Vec<String>,
    pub total: usize,
}

impl SearchMatches {
    pub fn is_truncated(&self) -> bool {
        self.total > self.matches.len()
    }

    pub fn render(&self) -> String {
        if self.total == 0 {
            return format!(
                "No files found matching '{}' in {}",
                self.pattern,
                self.directory.display()
            );
        }

        let mut out = format!("Found {} file(s) matching '{}':", self.total, self.pattern);
        for path in &self.matches {
            out.push('\n');
            out.push_str(path);
        }
        if self.is_truncated() {
            out.push_str(&format!(
                "\n... (showing first {} of {} matches)",
                self.matches.len(),
                self.total
            ));
        }
        out
    }
}

/// Guarded, capped reader over the allowed roots
#[derive(Debug, Clone)]
pub struct BoundedReader {
    guard: Arc<PathGuard>,
    limits: Arc<ExecutionLimits>,
}

impl BoundedReader {
    pub fn new(guard: Arc<PathGuard>, limits: Arc<ExecutionLimits>) -> Self {
        Self { guard, limits }
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    pub fn limits(&self) -> &ExecutionLimits {
        &self.limits
    }

    /// Read a text file, optionally keeping only the first `max_lines` lines.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn read_file(&self, path: &str, max_lines: Option<i64>) -> Result<FileContent, ToolError> {
        let max_lines = match max_lines {
            Some(n) if n <= 0 => {
                return Err(ToolError::invalid_arguments(format!(
                    "max_lines must be positive, got {}",
                    n
                )));
            }
            Some(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
            None => None,
        };

        let resolved = self.guard.check(path)?;
        let metadata = fs::metadata(&resolved).map_err(|e| io_error(path, e))?;
        if !metadata.is_file() {
            return Err(ToolError::not_a_file(path));
        }

        let limit = self.limits.max_file_bytes;
        if metadata.len() > limit {
            return Err(ToolError::too_large(metadata.len(), limit));
        }

        // The size can change between stat and read; never take more than the cap.
        let mut buf = Vec::with_capacity(metadata.len() as usize);
        fs::File::open(&resolved)
            .and_then(|file| file.take(limit.saturating_add(1)).read_to_end(&mut buf))
            .map_err(|e| io_error(path, e))?;
        if buf.len() as u64 > limit {
            return Err(ToolError::too_large(buf.len() as u64, limit));
        }

        let text = String::from_utf8_lossy(&buf).into_owned();
        let (text, omitted_lines) = match max_lines {
            Some(max) => {
                let total = text.lines().count();
                if total > max {
                    let kept: Vec<&str> = text.lines().take(max).collect();
                    (kept.join("\n"), total - max)
                } else {
                    (text, 0)
                }
            }
            None => (text, 0),
        };

        debug!(path = %resolved.display(), bytes = buf.len(), omitted_lines, "File read");

        Ok(FileContent {
            path: resolved,
            text,
            bytes: buf.len() as u64,
            omitted_lines,
        })
    }

    /// List a directory's immediate entries, sorted by name.
    ///
    /// Symlinks are reported as links and never followed.
    pub fn list_directory(&self, path: &str) -> Result<DirListing, ToolError> {
        let resolved = self.guard.check(path)?;
        let metadata = fs::metadata(&resolved).map_err(|e| io_error(path, e))?;
        if !metadata.is_dir() {
            return Err(ToolError::invalid_arguments(format!(
                "Not a directory: {}",
                path
            )));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&resolved).map_err(|e| io_error(path, e))? {
            let entry = entry.map_err(|e| io_error(path, e))?;
            let kind = match entry.file_type() {
                Ok(t) if t.is_symlink() => DirEntryKind::Symlink,
                Ok(t) if t.is_dir() => DirEntryKind::Directory,
                Ok(t) if t.is_file() => DirEntryKind::File {
                    size: entry.metadata().map(|m| m.len()).unwrap_or(0),
                },
                _ => DirEntryKind::Other,
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        let total = entries.len();
        entries.truncate(self.limits.max_dir_entries);

        debug!(path = %resolved.display(), total, "Directory listed");

        Ok(DirListing {
            path: resolved,
            entries,
            total,
        })
    }

    /// Recursive glob under `directory`.
    ///
    /// A pattern without `**` is matched at any depth. Symlinks are only
    /// followed when their target lies inside the roots, a link back onto
    /// an ancestor directory is not descended into, and each file is
    /// counted once however many links reach it.
    pub fn search_files(&self, directory: &str, pattern: &str) -> Result<SearchMatches, ToolError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(ToolError::invalid_arguments("Search pattern must not be empty"));
        }
        if Path::new(pattern).is_absolute()
            || Path::new(pattern)
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(ToolError::invalid_arguments(format!(
                "Search pattern must be relative and must not contain '..': {}",
                pattern
            )));
        }

        let resolved = self.guard.check(directory)?;
        let metadata = fs::metadata(&resolved).map_err(|e| io_error(directory, e))?;
        if !metadata.is_dir() {
            return Err(ToolError::invalid_arguments(format!(
                "Not a directory: {}",
                directory
            )));
        }

        let full = if pattern.contains("**") {
            pattern.to_string()
        } else {
            format!("**/{}", pattern)
        };
        let matcher = glob::Pattern::new(&full).map_err(|e| {
            ToolError::invalid_arguments(format!("Invalid glob pattern '{}': {}", pattern, e))
        })?;
        let options = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let guard = &self.guard;
        let walker = WalkDir::new(&resolved)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !entry.path_is_symlink() || guard.is_allowed(entry.path()));

        let cap = self.limits.max_search_matches;
        let mut seen = HashSet::new();
        let mut matches = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable search entry");
                    continue;
                }
            };
            let Ok(relative) = entry.path().strip_prefix(&resolved) else {
                continue;
            };
            if !matcher.matches_path_with(relative, options) {
                continue;
            }
            let Some(canonical) = guard.resolve(entry.path()) else {
                continue;
            };
            if !seen.insert(canonical) {
                continue;
            }
            if matches.len() < cap {
                matches.push(relative.to_string_lossy().into_owned());
            }
        }
        let total = seen.len();

        debug!(directory = %resolved.display(), pattern, total, "Search finished");

        Ok(SearchMatches {
            directory: resolved,
            pattern: pattern.to_string(),
            matches,
            total,
        })
    }
}

fn io_error(path: &str, e: io::Error) -> ToolError {
    match e.kind() {
        io::ErrorKind::NotFound => ToolError::not_found(path),
        io::ErrorKind::PermissionDenied => ToolError::access_denied(path),
        _ => ToolError::execution_failed(format!("Failed to access '{}': {}", path, e)),
    }
}
