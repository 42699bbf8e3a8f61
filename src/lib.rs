//! # clr-runtime-discovery
//!
//! Runtime discovery for .NET hosts (.NET Framework, .NET Core, Mono).
//!
//! This crate works out which runtime implementation and version a process
//! is hosted on, so diagnostics and telemetry can be tagged without the
//! caller supplying that information. It is meant for native agents and SDK
//! cores that receive host facts from the managed side, or read them from
//! the machine.
//!
//! ## Features
//!
//! - `Detector` chaining three detection strategies in priority order
//! - `DescriptorParser` turning free-text runtime banners into name and version
//! - Registry refinement of .NET Framework versions via release identifiers
//! - Deployment path refinement of .NET Core versions
//! - `HostSnapshot` for host facts captured by a managed host
//!
//! ## Example
//!
//! ```rust
//! use clr_runtime_discovery::{detect, HostSnapshot};
//!
//! let snapshot = HostSnapshot {
//!     framework_description: Some(".NET Core 4.6.28801.04".to_string()),
//!     core_library_location: Some(
//!         "/usr/share/dotnet/shared/Microsoft.NETCore.App/2.2.5/System.Private.CoreLib.dll"
//!             .to_string(),
//!     ),
//!     ..Default::default()
//! };
//!
//! let runtime = detect(snapshot).unwrap();
//! assert_eq!(runtime.name(), Some(".NET Core"));
//! assert_eq!(runtime.version(), Some("2.2.5"));
//! ```

mod descriptor;
mod detect;
mod detection;
mod error;
mod host;
mod options;
mod runtime_family;

pub use descriptor::RuntimeDescriptor;
pub use detect::{detect, Detector};
pub use detection::{
    version_from_deployment_path, DeploymentPathRefiner, DescriptorParser, DetectionStrategy,
    EnvironmentCountersStrategy, LoadedModulePath, MonoProbeStrategy, NativeDescriptorStrategy,
    RegQueryRegistry, Refiner, RegistryRefiner, StrategyKind, SHARED_FRAMEWORK_MARKER,
};
pub use error::{ConfigError, HostError};
pub use host::{
    AlternateRuntimeProbe, DeploymentPathSource, HostSnapshot, HostVersion, InstallationRegistry,
    NativeDescriptorSource, VersionCounters, NDP_V4_FULL_KEY, RELEASE_VALUE,
};
pub use options::{DetectOptions, ReleaseTable, DEFAULT_BANNER_PATTERN};
pub use runtime_family::RuntimeFamily;
