//! gtm-bridge: editor activity to gtm
//!
//! The binary sits between an editor extension and the gtm CLI. The
//! extension streams activity events as JSON lines on stdin; the bridge
//! throttles them, calls `gtm record --status`, and streams the results
//! back as JSON notices on stdout.

pub mod cmd;
pub mod host;
pub mod logging;
pub mod system_config;
