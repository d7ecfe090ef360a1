//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid execution limits: {0}")]
    InvalidLimits(String),

    #[error("Tool registered twice: {0}")]
    DuplicateTool(String),
}
