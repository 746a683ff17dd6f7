//! Line-delimited JSON protocol spoken with the editor extension
//!
//! stdin carries one activity event per line:
//! `{"source": "save", "file": "/path/to/file"}`
//!
//! stdout carries one notice per line:
//! `{"kind": "status", "text": "..."}`

use activity::{ActivityEvent, Notice};
use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Problem with a line received from the editor
#[derive(Debug, Error)]
pub enum HostError {
    #[error("malformed event line {line:?}: {source}")]
    Malformed {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("event line is not valid UTF-8: {0}")]
    NotUtf8(#[from] FromUtf8Error),
}

/// Decode one raw stdin line
pub fn decode_line(bytes: Vec<u8>) -> Result<String, HostError> {
    Ok(String::from_utf8(bytes)?)
}

/// Parse one stdin line; blank lines carry no event
pub fn parse_event(line: &str) -> Result<Option<ActivityEvent>, HostError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(line)
        .map(Some)
        .map_err(|source| HostError::Malformed {
            line: line.to_string(),
            source,
        })
}

/// Writes notices as JSON lines, flushing after each one
pub struct NoticeWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> NoticeWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub async fn write(&mut self, notice: &Notice) -> io::Result<()> {
        let mut line = serde_json::to_vec(notice)?;
        line.push(b'\n');
        self.inner.write_all(&line).await?;
        self.inner.flush().await
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
