//! Workflow integration tests
//!
//! Tests for complete workflows that exercise the binary end to end
//! against a fake gtm.

pub mod probe;
pub mod record;
