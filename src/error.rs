//! Error types for configuration and host access.
//!
//! Detection itself never fails. The only hard error is an unusable banner
//! pattern, surfaced when a [`Detector`](crate::Detector) is built. Host
//! collaborators report [`HostError`], which the detector logs and treats as
//! "no additional information".

use thiserror::Error;

/// Errors raised while validating [`DetectOptions`](crate::DetectOptions).
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::{ConfigError, DescriptorParser};
///
/// let err = DescriptorParser::new(r"^(?<name>\D*)").unwrap_err();
/// assert!(matches!(err, ConfigError::MissingCaptureGroup("version")));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The banner pattern is not a valid regular expression.
    #[error("Invalid banner pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The banner pattern lacks a required named capture group.
    #[error("Banner pattern is missing the `{0}` capture group")]
    MissingCaptureGroup(&'static str),
}

/// Errors reported by host collaborators.
///
/// This enum is marked `#[non_exhaustive]` so host implementations can grow
/// new failure modes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HostError {
    /// A required host tool could not be located.
    #[error("Host tool not found: {0}")]
    ToolNotFound(String),

    /// Spawning a tool or reading a host file failed.
    #[error("I/O error reading host information: {0}")]
    Io(#[from] std::io::Error),

    /// A host tool ran but exited unsuccessfully.
    #[error("`{program}` exited with {status}")]
    CommandFailed {
        /// Program that was run.
        program: String,
        /// Exit status description.
        status: String,
    },

    /// A host tool produced output that could not be interpreted.
    #[error("Unexpected output: {0}")]
    InvalidOutput(String),
}
