//! Runtime detection chain.

use crate::detection::{
    DeploymentPathRefiner, DescriptorParser, DetectionStrategy, EnvironmentCountersStrategy,
    LoadedModulePath, MonoProbeStrategy, NativeDescriptorStrategy, RegQueryRegistry, Refiner,
    RegistryRefiner, StrategyKind,
};
use crate::host::{DeploymentPathSource, HostSnapshot, InstallationRegistry};
use crate::{ConfigError, DetectOptions, ReleaseTable, RuntimeDescriptor};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Detect the runtime described by a host snapshot using default options.
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::{detect, HostSnapshot};
///
/// let snapshot = HostSnapshot {
///     framework_description: Some(".NET Framework 4.8.4250.0".to_string()),
///     framework_release: Some("528040".to_string()),
///     ..Default::default()
/// };
///
/// let runtime = detect(snapshot).unwrap();
/// assert_eq!(runtime.name(), Some(".NET Framework"));
/// assert_eq!(runtime.version(), Some("4.8"));
/// assert_eq!(runtime.release(), Some(528040));
/// ```
pub fn detect(snapshot: HostSnapshot) -> Option<RuntimeDescriptor> {
    Detector::default().with_snapshot(snapshot).detect()
}

/// Chains detection strategies and version refiners.
///
/// # Detection Process
///
/// 1. Ask the native description facility for a banner and parse it
/// 2. Otherwise probe for Mono and parse its display name
/// 3. Otherwise, only when no native facility exists at all, synthesize a
///    coarse descriptor from the version counters
/// 4. Apply the refiner registered for the descriptor's family, if any
///
/// The first strategy yielding a descriptor wins. Strategies of the same
/// kind are tried in registration order.
///
/// A detector holds no mutable state. It can be shared across threads and
/// called repeatedly; callers that want a single answer per process should
/// cache the result themselves.
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::{DetectOptions, Detector, HostSnapshot, HostVersion};
///
/// let detector = Detector::new(DetectOptions::default())
///     .unwrap()
///     .with_snapshot(HostSnapshot {
///         environment_version: Some(HostVersion::new(4, 0, 30319, 42000)),
///         ..Default::default()
///     });
///
/// let runtime = detector.detect().unwrap();
/// assert_eq!(runtime.version(), Some("4.0.30319.42000"));
/// ```
pub struct Detector {
    parser: DescriptorParser,
    releases: ReleaseTable,
    strategies: Vec<Box<dyn DetectionStrategy>>,
    refiners: Vec<Box<dyn Refiner>>,
}

impl Detector {
    /// Build a detector with no strategies or refiners.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the banner pattern is invalid or lacks
    /// the `name` or `version` capture group.
    pub fn new(options: DetectOptions) -> Result<Self, ConfigError> {
        let parser = DescriptorParser::new(&options.banner_pattern)?;
        Ok(Self::with_parser(parser, options.release_table))
    }

    fn with_parser(parser: DescriptorParser, releases: ReleaseTable) -> Self {
        Self {
            parser,
            releases,
            strategies: Vec::new(),
            refiners: Vec::new(),
        }
    }

    /// Add a detection strategy.
    ///
    /// Strategies are kept in [`StrategyKind`] priority order regardless of
    /// the order they are added in.
    pub fn with_strategy(mut self, strategy: impl DetectionStrategy + 'static) -> Self {
        let kind = strategy.kind();
        let index = self.strategies.partition_point(|s| s.kind() <= kind);
        self.strategies.insert(index, Box::new(strategy));
        self
    }

    /// Add a refiner, replacing any refiner for the same family.
    pub fn with_refiner(mut self, refiner: impl Refiner + 'static) -> Self {
        let family = refiner.family();
        self.refiners.retain(|r| r.family() != family);
        self.refiners.push(Box::new(refiner));
        self
    }

    /// Refine .NET Framework descriptors from `registry` and the configured
    /// release table.
    pub fn with_registry(self, registry: impl InstallationRegistry + 'static) -> Self {
        let refiner = RegistryRefiner::new(registry, self.releases.clone());
        self.with_refiner(refiner)
    }

    /// Refine .NET Core descriptors from the core library location.
    pub fn with_deployment_path(self, source: impl DeploymentPathSource + 'static) -> Self {
        self.with_refiner(DeploymentPathRefiner::new(source))
    }

    /// Wire every strategy and refiner to a captured host snapshot.
    pub fn with_snapshot(self, snapshot: HostSnapshot) -> Self {
        let host = Arc::new(snapshot);
        self.with_strategy(NativeDescriptorStrategy::new(Arc::clone(&host)))
            .with_strategy(MonoProbeStrategy::new(Arc::clone(&host)))
            .with_strategy(EnvironmentCountersStrategy::new(Arc::clone(&host)))
            .with_registry(Arc::clone(&host))
            .with_deployment_path(host)
    }

    /// Refine from this machine: `reg query` for the registry and the
    /// process memory map for the core library location.
    pub fn with_system_sources(self) -> Self {
        self.with_registry(RegQueryRegistry::new())
            .with_deployment_path(LoadedModulePath::new())
    }

    /// Run the detection chain.
    ///
    /// Returns `None` only when no strategy is available on this host, or
    /// when every available strategy came up empty.
    pub fn detect(&self) -> Option<RuntimeDescriptor> {
        let available: Vec<&dyn DetectionStrategy> = self
            .strategies
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| s.is_available())
            .collect();

        if available.is_empty() {
            warn!("No runtime detection strategy is available on this host");
            return None;
        }

        // Counters are a last resort for hosts without any native banner
        let has_native = available
            .iter()
            .any(|s| s.kind() == StrategyKind::NativeDescriptor);

        let descriptor = available
            .into_iter()
            .filter(|s| !(has_native && s.kind() == StrategyKind::EnvironmentCounters))
            .find_map(|s| {
                let found = s.try_detect(&self.parser);
                trace!(kind = ?s.kind(), found = found.is_some(), "Tried detection strategy");
                found
            });

        let Some(descriptor) = descriptor else {
            debug!("No detection strategy produced a runtime descriptor");
            return None;
        };

        let family = descriptor.family();
        let descriptor = match self.refiners.iter().find(|r| r.family() == family) {
            Some(refiner) => refiner.refine(descriptor),
            None => descriptor,
        };

        debug!(runtime = %descriptor, ?family, "Detected runtime");
        Some(descriptor)
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::with_parser(DescriptorParser::default(), ReleaseTable::default())
    }
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("parser", &self.parser)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            )
            .field(
                "refiners",
                &self.refiners.iter().map(|r| r.family()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
