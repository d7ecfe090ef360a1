//! Sandbox policy values
//!
//! The policy side of the sandbox lives here as plain data. Enforcement
//! (path resolution, process spawning) is an infrastructure concern.

pub mod limits;

pub use limits::ExecutionLimits;
