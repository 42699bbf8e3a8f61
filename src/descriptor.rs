//! Runtime descriptor produced by detection.

use crate::RuntimeFamily;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the runtime a process is hosted on.
///
/// A descriptor is a plain value. Detection creates it, at most one refiner
/// transforms it, and the caller owns the result.
///
/// `version` keeps three states apart:
/// - `None`: no version information at all
/// - `Some("")`: a banner or counter matched but yielded no usable numeral
/// - `Some("4.8")`: a concrete value
///
/// `raw` holds the original banner, or a synthesized diagnostic string when
/// no banner was available. There is no way to replace it once set.
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::{RuntimeDescriptor, RuntimeFamily};
///
/// let descriptor = RuntimeDescriptor::new(
///     Some(".NET Framework".to_string()),
///     Some("4.0.30319.42000".to_string()),
///     Some(".NET Framework 4.0.30319.42000".to_string()),
/// );
/// assert_eq!(descriptor.family(), RuntimeFamily::Framework);
///
/// let refined = descriptor.with_release(528040).with_version("4.8");
/// assert_eq!(refined.version(), Some("4.8"));
/// assert_eq!(refined.raw(), Some(".NET Framework 4.0.30319.42000"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    release: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
}

impl RuntimeDescriptor {
    /// Create a descriptor from its parsed parts.
    pub fn new(name: Option<String>, version: Option<String>, raw: Option<String>) -> Self {
        Self {
            name,
            version,
            release: None,
            raw,
        }
    }

    /// Create a descriptor carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Runtime name, e.g. `.NET Framework` or `Mono`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Loosely formatted version text.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Installation release identifier, only ever set for the classic family.
    pub fn release(&self) -> Option<u32> {
        self.release
    }

    /// The unparsed banner or diagnostic string.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Family derived from the name.
    pub fn family(&self) -> RuntimeFamily {
        RuntimeFamily::classify(self.name())
    }

    /// Return a copy with `version` replaced.
    pub fn with_version(self, version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..self
        }
    }

    /// Return a copy with `release` replaced.
    pub fn with_release(self, release: u32) -> Self {
        Self {
            release: Some(release),
            ..self
        }
    }
}

impl fmt::Display for RuntimeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.version()) {
            (Some(name), Some(version)) if !version.is_empty() => write!(f, "{name} {version}"),
            (Some(name), _) => f.write_str(name),
            (None, _) => f.write_str(self.raw().unwrap_or("unknown runtime")),
        }
    }
}
