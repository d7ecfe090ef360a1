//! Filesystem and execution sandbox.
//!
//! - [`PathGuard`] decides which paths the tools may touch
//! - [`BoundedReader`] reads files, lists directories and globs under the guard
//! - [`SnippetRunner`] runs code in an isolated, time-boxed child process
//! - [`SnippetScreen`] rejects obviously dangerous code before it runs

mod process;

pub mod path_guard;
pub mod reader;
pub mod runner;
pub mod screening;

pub use path_guard::PathGuard;
pub use reader::{BoundedReader, DirEntryKind, DirListing, FileContent, SearchMatches};
pub use runner::{SnippetOutput, SnippetRunner, locate_interpreter};
pub use screening::{DEFAULT_DENYLIST, SnippetScreen};

use std::path::PathBuf;
use thiserror::Error;
use toolgate_domain::DomainError;

/// Errors raised while assembling the sandbox at startup
#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Interpreter '{name}' not found: {source}")]
    InterpreterNotFound {
        name: String,
        #[source]
        source: which::Error,
    },

    #[error("Scratch directory {} lies inside allowed root {}", path.display(), root.display())]
    ScratchInsideRoot { path: PathBuf, root: PathBuf },

    #[error("Scratch directory {} is unusable: {source}", path.display())]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid denylist entry '{entry}': {source}")]
    Denylist {
        entry: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Limits(#[from] DomainError),
}
