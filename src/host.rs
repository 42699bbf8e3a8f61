//! Host collaborator interfaces.
//!
//! Detection never talks to the operating system or the managed runtime
//! directly. Every piece of host information arrives through one of the
//! traits below, so strategies and refiners can be exercised with fakes.
//!
//! [`HostSnapshot`] implements all of them from values captured by a managed
//! host, which is the usual way a native agent receives them.

use crate::error::HostError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Registry key holding the installed .NET Framework 4.x release.
pub const NDP_V4_FULL_KEY: &str = r"SOFTWARE\Microsoft\NET Framework Setup\NDP\v4\Full";

/// Value name under [`NDP_V4_FULL_KEY`] holding the release identifier.
pub const RELEASE_VALUE: &str = "Release";

/// The runtime's own description facility (`RuntimeInformation.FrameworkDescription`).
pub trait NativeDescriptorSource: Send + Sync {
    /// Whether the facility exists on this build target.
    fn is_available(&self) -> bool {
        true
    }

    /// Free-text runtime banner, e.g. `.NET Core 3.1.5`.
    fn framework_description(&self) -> Option<String>;
}

/// Capability probe for the Mono runtime.
pub trait AlternateRuntimeProbe: Send + Sync {
    /// Whether the probe can run on this build target.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether the process is hosted on Mono.
    fn is_present(&self) -> bool;

    /// Mono's display name banner, e.g. `5.10.1.47 (tarball Tue Apr 17 09:23:16 UTC 2018)`.
    fn display_name(&self) -> Option<String>;
}

/// Read-only installation registry.
pub trait InstallationRegistry: Send + Sync {
    /// Read `value` under `key`. `Ok(None)` means the value does not exist.
    fn read_value(&self, key: &str, value: &str) -> Result<Option<String>, HostError>;
}

/// On-disk location of a well-known framework component.
pub trait DeploymentPathSource: Send + Sync {
    /// Full path of the component, e.g. the core library assembly.
    fn component_location(&self) -> Option<String>;
}

/// The hosting runtime's version counters (`Environment.Version`).
pub trait VersionCounters: Send + Sync {
    /// Whether the counters can be read on this build target.
    fn is_available(&self) -> bool {
        true
    }

    /// Current counter values.
    fn host_version(&self) -> HostVersion;
}

/// Four-part numeric runtime version.
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::HostVersion;
///
/// let version = HostVersion::new(4, 0, 30319, 42000);
/// assert_eq!(version.to_string(), "4.0.30319.42000");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostVersion {
    /// Major version counter.
    pub major: u32,
    /// Minor version counter.
    pub minor: u32,
    /// Build counter.
    pub build: u32,
    /// Revision counter.
    pub revision: u32,
}

impl HostVersion {
    /// Create a version from its four counters.
    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Host information captured by a managed host.
///
/// Each field doubles as a capability flag: `None` means the facility does
/// not exist on the host that produced the snapshot.
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::HostSnapshot;
///
/// let snapshot: HostSnapshot = serde_json::from_str(r#"{
///     "framework_description": ".NET Core 3.1.5",
///     "core_library_location": "/usr/share/dotnet/shared/Microsoft.NETCore.App/3.1.5/System.Private.CoreLib.dll"
/// }"#).unwrap();
/// assert!(snapshot.mono_display_name.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSnapshot {
    /// `RuntimeInformation.FrameworkDescription`, when the API exists.
    pub framework_description: Option<String>,

    /// Mono's display name, when hosted on Mono.
    pub mono_display_name: Option<String>,

    /// `Environment.Version`, when captured.
    pub environment_version: Option<HostVersion>,

    /// Raw `NDP\v4\Full\Release` registry value.
    pub framework_release: Option<String>,

    /// Location of the core library assembly.
    pub core_library_location: Option<String>,
}

impl NativeDescriptorSource for HostSnapshot {
    fn is_available(&self) -> bool {
        self.framework_description.is_some()
    }

    fn framework_description(&self) -> Option<String> {
        self.framework_description.clone()
    }
}

impl AlternateRuntimeProbe for HostSnapshot {
    fn is_present(&self) -> bool {
        self.mono_display_name.is_some()
    }

    fn display_name(&self) -> Option<String> {
        self.mono_display_name.clone()
    }
}

impl InstallationRegistry for HostSnapshot {
    fn read_value(&self, key: &str, value: &str) -> Result<Option<String>, HostError> {
        if key.eq_ignore_ascii_case(NDP_V4_FULL_KEY) && value.eq_ignore_ascii_case(RELEASE_VALUE)
        {
            Ok(self.framework_release.clone())
        } else {
            Ok(None)
        }
    }
}

impl DeploymentPathSource for HostSnapshot {
    fn component_location(&self) -> Option<String> {
        self.core_library_location.clone()
    }
}

impl VersionCounters for HostSnapshot {
    fn is_available(&self) -> bool {
        self.environment_version.is_some()
    }

    fn host_version(&self) -> HostVersion {
        self.environment_version.unwrap_or_default()
    }
}

impl<T: NativeDescriptorSource + ?Sized> NativeDescriptorSource for Arc<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn framework_description(&self) -> Option<String> {
        (**self).framework_description()
    }
}

impl<T: AlternateRuntimeProbe + ?Sized> AlternateRuntimeProbe for Arc<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn is_present(&self) -> bool {
        (**self).is_present()
    }

    fn display_name(&self) -> Option<String> {
        (**self).display_name()
    }
}

impl<T: InstallationRegistry + ?Sized> InstallationRegistry for Arc<T> {
    fn read_value(&self, key: &str, value: &str) -> Result<Option<String>, HostError> {
        (**self).read_value(key, value)
    }
}

impl<T: DeploymentPathSource + ?Sized> DeploymentPathSource for Arc<T> {
    fn component_location(&self) -> Option<String> {
        (**self).component_location()
    }
}

impl<T: VersionCounters + ?Sized> VersionCounters for Arc<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn host_version(&self) -> HostVersion {
        (**self).host_version()
    }
}
