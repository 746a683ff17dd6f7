//! The external gtm command-line contract
//!
//! Only two calls are made: `gtm -v` once per session to check the
//! installed version, and `gtm record --status <file>` on every accepted
//! activity event. Output of both is treated as opaque text.

use crate::invoke::{invoke, InvocationError, InvocationResult};
use crate::version::{Version, VersionError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Tool resolved on `PATH` when nothing else is configured
pub const DEFAULT_PROGRAM: &str = "gtm";

/// Oldest gtm release that understands `record --status`
pub const DEFAULT_MINIMUM_VERSION: &str = "v1.0-beta.8";

/// Reasons the startup version probe did not confirm a usable tool
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{program} is not available on your $PATH. please install it first")]
    Unavailable {
        program: String,
        #[source]
        source: InvocationError,
    },

    #[error(
        "Installed {program} version is below {minimum}. \
         Please update your {program} installation."
    )]
    Outdated {
        program: String,
        found: Version,
        minimum: Version,
    },

    #[error("Could not check the installed {program} version: {source}")]
    Failed {
        program: String,
        #[source]
        source: InvocationError,
    },

    #[error("`{program} -v` printed no recognizable version: {output:?}")]
    Unrecognized {
        program: String,
        minimum: Version,
        output: String,
    },
}

impl ProbeError {
    /// Text to show the user
    ///
    /// An unrecognized version is reported the same way as an outdated one,
    /// since support for `record --status` cannot be confirmed.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unrecognized { program, minimum, .. } => Self::Outdated {
                program: program.clone(),
                found: minimum.clone(),
                minimum: minimum.clone(),
            }
            .to_string(),
            other => other.to_string(),
        }
    }

    /// True when the tool could not be run at all
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Classify a failed `-v` call
    ///
    /// Only a failed spawn means the tool is missing. A tool that started
    /// and then lost its pipes is installed.
    fn from_invocation(program: &str, source: InvocationError) -> Self {
        match source {
            InvocationError::Spawn { .. } => Self::Unavailable {
                program: program.to_string(),
                source,
            },
            InvocationError::Wait { .. } => {
                warn!("Version check of {} failed while running: {}", program, source);
                Self::Failed {
                    program: program.to_string(),
                    source,
                }
            }
        }
    }
}

/// Handle to the external time-tracking tool
#[derive(Debug, Clone)]
pub struct Tool {
    program: String,
    minimum_version: Version,
}

impl Tool {
    /// Create a handle for `program`, requiring at least `minimum_version`
    pub fn new(program: impl Into<String>, minimum_version: &str) -> Result<Self, VersionError> {
        Ok(Self {
            program: program.into(),
            minimum_version: minimum_version.parse()?,
        })
    }

    /// Program name or path
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Minimum supported version
    pub fn minimum_version(&self) -> &Version {
        &self.minimum_version
    }

    /// Arguments for a record call
    ///
    /// With no previous file (first event of a session) the path is left
    /// off rather than passing a placeholder.
    pub fn record_args(previous: Option<&str>) -> Vec<&str> {
        let mut args = vec!["record", "--status"];
        if let Some(path) = previous {
            args.push(path);
        }
        args
    }

    /// Report time spent on `previous`
    pub async fn record(
        &self,
        previous: Option<&str>,
    ) -> Result<InvocationResult, InvocationError> {
        debug!("Recording activity for {:?}", previous);
        invoke(&self.program, &Self::record_args(previous)).await
    }

    /// Run `-v` and check the reported version against the minimum
    ///
    /// A non-zero exit is not a failure; the output is inspected either way.
    pub async fn probe(&self) -> Result<Version, ProbeError> {
        let result = invoke(&self.program, &["-v"])
            .await
            .map_err(|source| ProbeError::from_invocation(&self.program, source))?;

        let Some(found) = Version::find_in(&result.output) else {
            return Err(ProbeError::Unrecognized {
                program: self.program.clone(),
                minimum: self.minimum_version.clone(),
                output: result.output,
            });
        };

        if found < self.minimum_version {
            return Err(ProbeError::Outdated {
                program: self.program.clone(),
                found,
                minimum: self.minimum_version.clone(),
            });
        }

        info!("Found {} {} (minimum {})", self.program, found, self.minimum_version);
        Ok(found)
    }
}
