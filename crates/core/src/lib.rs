//! Core plumbing for the gtm editor bridge
//!
//! This crate provides:
//! - Process invocation with combined stdout/stderr capture
//! - Version parsing and precedence comparison
//! - The external tool contract (`-v` probe, `record --status` call)

pub mod invoke;
pub mod tool;
pub mod version;

// Re-exports
pub use invoke::{invoke, InvocationError, InvocationResult, SENTINEL_CODE};
pub use tool::{ProbeError, Tool, DEFAULT_MINIMUM_VERSION, DEFAULT_PROGRAM};
pub use version::{Version, VersionError};
