//! Family-specific version refinement.
//!
//! Refinement is best-effort. A refiner whose family does not match, or
//! whose secondary source has nothing to offer, returns the descriptor
//! unchanged.

use crate::host::{DeploymentPathSource, InstallationRegistry, NDP_V4_FULL_KEY, RELEASE_VALUE};
use crate::{ReleaseTable, RuntimeDescriptor, RuntimeFamily};
use std::path::is_separator;
use tracing::{debug, trace};

/// Path segment delimiting shared framework packages in a .NET deployment.
pub const SHARED_FRAMEWORK_MARKER: &str = "Microsoft.NETCore.App";

/// Sharpens the version of one runtime family.
pub trait Refiner: Send + Sync {
    /// The family this refiner applies to.
    fn family(&self) -> RuntimeFamily;

    /// Return `descriptor`, possibly with a more precise version.
    fn refine(&self, descriptor: RuntimeDescriptor) -> RuntimeDescriptor;
}

/// Refines .NET Framework descriptors from the installation registry.
///
/// Reads the `Release` value under the NDP v4 key, records it as the
/// descriptor's release and, when the release table knows it, replaces the
/// version.
pub struct RegistryRefiner<R> {
    registry: R,
    releases: ReleaseTable,
}

impl<R: InstallationRegistry> RegistryRefiner<R> {
    /// Create a refiner reading `registry` and mapping through `releases`.
    pub fn new(registry: R, releases: ReleaseTable) -> Self {
        Self { registry, releases }
    }

    fn read_release(&self) -> Option<u32> {
        let value = match self.registry.read_value(NDP_V4_FULL_KEY, RELEASE_VALUE) {
            Ok(Some(value)) => value,
            Ok(None) => {
                trace!(key = NDP_V4_FULL_KEY, "No framework release value");
                return None;
            }
            Err(err) => {
                debug!(key = NDP_V4_FULL_KEY, error = %err, "Failed to read framework release");
                return None;
            }
        };

        match value.trim().parse() {
            Ok(release) => Some(release),
            Err(_) => {
                debug!(value = %value, "Framework release is not a number");
                None
            }
        }
    }
}

impl<R: InstallationRegistry> Refiner for RegistryRefiner<R> {
    fn family(&self) -> RuntimeFamily {
        RuntimeFamily::Framework
    }

    fn refine(&self, descriptor: RuntimeDescriptor) -> RuntimeDescriptor {
        if descriptor.family() != self.family() {
            return descriptor;
        }

        let Some(release) = self.read_release() else {
            return descriptor;
        };

        let descriptor = descriptor.with_release(release);
        match self.releases.lookup(release) {
            Some(version) => {
                debug!(release, version, "Refined framework version from release");
                descriptor.with_version(version)
            }
            None => {
                debug!(release, "Framework release not in table");
                descriptor
            }
        }
    }
}

/// Refines .NET Core descriptors from the core library's deployment path.
pub struct DeploymentPathRefiner<S> {
    source: S,
}

impl<S: DeploymentPathSource> DeploymentPathRefiner<S> {
    /// Create a refiner reading the component location from `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: DeploymentPathSource> Refiner for DeploymentPathRefiner<S> {
    fn family(&self) -> RuntimeFamily {
        RuntimeFamily::Core
    }

    fn refine(&self, descriptor: RuntimeDescriptor) -> RuntimeDescriptor {
        if descriptor.family() != self.family() {
            return descriptor;
        }

        let Some(location) = self.source.component_location() else {
            trace!("No core library location");
            return descriptor;
        };

        match version_from_deployment_path(&location, SHARED_FRAMEWORK_MARKER) {
            Some(version) => {
                debug!(version, location = %location, "Refined core version from deployment path");
                descriptor.with_version(version)
            }
            None => {
                trace!(location = %location, "No shared framework folder in path");
                descriptor
            }
        }
    }
}

/// Extract the segment following `marker` in `path`.
///
/// Empty segments from doubled, leading or trailing separators are ignored.
/// The marker must be followed by at least two more segments (the version
/// folder and the component itself). A self-contained deployment has no
/// marker and yields `None`.
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::version_from_deployment_path;
///
/// let path = "/usr/share/dotnet/shared/Microsoft.NETCore.App/3.1.5/System.Private.CoreLib.dll";
/// assert_eq!(version_from_deployment_path(path, "Microsoft.NETCore.App"), Some("3.1.5"));
/// assert_eq!(version_from_deployment_path("/app/System.Private.CoreLib.dll", "Microsoft.NETCore.App"), None);
/// ```
pub fn version_from_deployment_path<'a>(path: &'a str, marker: &str) -> Option<&'a str> {
    let segments: Vec<&str> = path
        .split(is_separator)
        .filter(|segment| !segment.is_empty())
        .collect();
    let index = segments.iter().position(|segment| *segment == marker)?;

    if index + 2 < segments.len() {
        Some(segments[index + 1])
    } else {
        None
    }
}
