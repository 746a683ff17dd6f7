//! External process invocation
//!
//! Runs a program with verbatim arguments and captures stdout and stderr
//! into a single buffer, in the order chunks arrive. A non-zero exit is a
//! normal result here; only a process that cannot be started (or whose
//! pipes break) is an error.

use std::ffi::OsStr;
use std::io;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

/// Exit code used when the process produced no real exit status
pub const SENTINEL_CODE: i32 = -1;

const CHUNK_SIZE: usize = 8 * 1024;

/// Outcome of a process that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// Exit code (`SENTINEL_CODE` if terminated by a signal)
    pub exit_code: i32,
    /// Interleaved stdout + stderr text
    pub output: String,
}

impl InvocationResult {
    /// Check if the process exited with status zero
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Failure to run a process at all
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("lost track of `{program}` while it was running: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
        partial_output: String,
    },
}

impl InvocationError {
    /// Output captured before the failure (empty if nothing ran)
    pub fn partial_output(&self) -> &str {
        match self {
            Self::Spawn { .. } => "",
            Self::Wait { partial_output, .. } => partial_output,
        }
    }

    /// Sentinel exit code carried by every failure
    pub fn code(&self) -> i32 {
        SENTINEL_CODE
    }

    /// True when the program could not be found on the search path
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Run `program` with `args` and wait for it to terminate
///
/// `program` is resolved through `PATH`. Arguments are passed straight to
/// the OS spawn primitive; no shell is involved. No timeout is applied.
pub async fn invoke<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
) -> Result<InvocationResult, InvocationError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| InvocationError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();
    let mut output = Vec::new();
    let mut out_buf = vec![0u8; CHUNK_SIZE];
    let mut err_buf = vec![0u8; CHUNK_SIZE];

    while stdout.is_some() || stderr.is_some() {
        let (read, from_stdout) = tokio::select! {
            read = read_chunk(&mut stdout, &mut out_buf) => (read, true),
            read = read_chunk(&mut stderr, &mut err_buf) => (read, false),
        };

        match read {
            Ok(0) if from_stdout => stdout = None,
            Ok(0) => stderr = None,
            Ok(n) if from_stdout => output.extend_from_slice(&out_buf[..n]),
            Ok(n) => output.extend_from_slice(&err_buf[..n]),
            Err(source) => {
                return Err(InvocationError::Wait {
                    program: program.to_string(),
                    source,
                    partial_output: String::from_utf8_lossy(&output).into_owned(),
                });
            }
        }
    }

    let status = child.wait().await.map_err(|source| InvocationError::Wait {
        program: program.to_string(),
        source,
        partial_output: String::from_utf8_lossy(&output).into_owned(),
    })?;

    let exit_code = status.code().unwrap_or(SENTINEL_CODE);
    debug!("`{}` exited with {} ({} bytes of output)", program, exit_code, output.len());

    Ok(InvocationResult {
        exit_code,
        output: String::from_utf8_lossy(&output).into_owned(),
    })
}

/// Read the next chunk from a pipe, or never resolve once the pipe is gone
async fn read_chunk<R>(pipe: &mut Option<R>, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match pipe {
        Some(reader) => reader.read(buf).await,
        None => std::future::pending().await,
    }
}
