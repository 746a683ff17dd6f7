//! Editor activity handling for the gtm bridge
//!
//! This crate provides:
//! - Activity events from the three editor sources (save, selection, focus)
//! - The per-file throttle that decides when gtm gets called
//! - A tracker session that runs the calls and emits user-facing notices

pub mod debounce;
pub mod tracker;

pub use debounce::{Decision, ThrottlePolicy, ThrottleState, MIN_INTERVAL};
pub use tracker::{Tracker, TrackerConfig};

use serde::{Deserialize, Serialize};

/// Editor signal that produced an activity event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    /// A document was saved
    Save,
    /// The text selection (or cursor) moved
    Selection,
    /// Focus switched to another editor
    ActiveEditor,
}

impl ActivitySource {
    /// All sources, in registration order
    pub const ALL: [ActivitySource; 3] = [Self::Save, Self::Selection, Self::ActiveEditor];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Selection => "selection",
            Self::ActiveEditor => "active_editor",
        }
    }
}

/// The user interacted with a file
///
/// Only `file` takes part in throttling; `source` is kept for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub source: ActivitySource,
    pub file: String,
}

impl ActivityEvent {
    pub fn new(source: ActivitySource, file: impl Into<String>) -> Self {
        Self {
            source,
            file: file.into(),
        }
    }
}

/// How a notice should be presented by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Transient status-bar text
    Status,
    /// Warning notification
    Warning,
    /// Error notification
    Error,
}

/// Message for the user, displayed by the editor host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn status(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Status, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, text: text.into() }
    }
}
