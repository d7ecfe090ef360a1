//! Infrastructure layer for toolgate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the sandboxed tools and their registry,
//! the Ollama model backend, and configuration file loading.

pub mod config;
pub mod ollama;
pub mod sandbox;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLimitsConfig, FileLoggingConfig,
    FileModelConfig, FileSandboxConfig,
};
pub use ollama::OllamaGateway;
pub use sandbox::{
    BoundedReader, PathGuard, SandboxError, SnippetRunner, SnippetScreen, locate_interpreter,
};
pub use tools::{
    JsonSchemaToolConverter, ToolHandler, ToolOutput, ToolRegistry, ToolRegistryBuilder,
    default_registry,
};
