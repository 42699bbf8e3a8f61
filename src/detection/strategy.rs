//! Detection strategies.
//!
//! Each strategy tries, independently, to produce a descriptor from one host
//! facility. The detector consults them in [`StrategyKind`] order.

use super::DescriptorParser;
use crate::host::{AlternateRuntimeProbe, NativeDescriptorSource, VersionCounters};
use crate::{RuntimeDescriptor, RuntimeFamily};

/// The kind of a detection strategy, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrategyKind {
    /// The runtime's own description banner.
    NativeDescriptor,
    /// The Mono capability probe.
    AlternateRuntimeProbe,
    /// Numeric version counters, used only without a native banner facility.
    EnvironmentCounters,
}

/// A single way of obtaining a runtime descriptor.
pub trait DetectionStrategy: Send + Sync {
    /// Which kind of strategy this is. Determines priority.
    fn kind(&self) -> StrategyKind;

    /// Whether the underlying facility exists on this host.
    fn is_available(&self) -> bool;

    /// Attempt detection. `None` means this strategy learned nothing.
    fn try_detect(&self, parser: &DescriptorParser) -> Option<RuntimeDescriptor>;
}

/// Parses the banner from a [`NativeDescriptorSource`].
#[derive(Debug, Clone)]
pub struct NativeDescriptorStrategy<S> {
    source: S,
}

impl<S: NativeDescriptorSource> NativeDescriptorStrategy<S> {
    /// Wrap a native description source.
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: NativeDescriptorSource> DetectionStrategy for NativeDescriptorStrategy<S> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NativeDescriptor
    }

    fn is_available(&self) -> bool {
        self.source.is_available()
    }

    fn try_detect(&self, parser: &DescriptorParser) -> Option<RuntimeDescriptor> {
        let banner = self.source.framework_description();
        parser.parse(banner.as_deref(), None)
    }
}

/// Probes for Mono and parses its display name.
#[derive(Debug, Clone)]
pub struct MonoProbeStrategy<P> {
    probe: P,
}

impl<P: AlternateRuntimeProbe> MonoProbeStrategy<P> {
    /// Wrap an alternate runtime source.
    pub fn new(probe: P) -> Self {
        Self { probe }
    }
}

impl<P: AlternateRuntimeProbe> DetectionStrategy for MonoProbeStrategy<P> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AlternateRuntimeProbe
    }

    fn is_available(&self) -> bool {
        self.probe.is_available()
    }

    fn try_detect(&self, parser: &DescriptorParser) -> Option<RuntimeDescriptor> {
        if !self.probe.is_present() {
            return None;
        }

        // Mono is present even when its display name is not; keep the name
        let banner = self.probe.display_name();
        parser.parse(banner.as_deref(), Some(RuntimeFamily::Mono.display_name()))
    }
}

/// Synthesizes a coarse .NET Framework descriptor from version counters.
#[derive(Debug, Clone)]
pub struct EnvironmentCountersStrategy<C> {
    counters: C,
}

impl<C: VersionCounters> EnvironmentCountersStrategy<C> {
    /// Wrap a version counter source.
    pub fn new(counters: C) -> Self {
        Self { counters }
    }
}

impl<C: VersionCounters> DetectionStrategy for EnvironmentCountersStrategy<C> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::EnvironmentCounters
    }

    fn is_available(&self) -> bool {
        self.counters.is_available()
    }

    fn try_detect(&self, _parser: &DescriptorParser) -> Option<RuntimeDescriptor> {
        let version = self.counters.host_version();

        // 1.0 and 1.1 both report major 1 and cannot be told apart
        let text = if version.major == 1 {
            String::new()
        } else {
            version.to_string()
        };

        Some(RuntimeDescriptor::new(
            Some(RuntimeFamily::Framework.display_name().to_string()),
            Some(text),
            Some(format!("Environment.Version={version}")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostVersion;

    struct FixedBanner(Option<&'static str>);

    impl NativeDescriptorSource for FixedBanner {
        fn framework_description(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    struct FakeMono {
        present: bool,
        banner: Option<&'static str>,
    }

    impl AlternateRuntimeProbe for FakeMono {
        fn is_present(&self) -> bool {
            self.present
        }

        fn display_name(&self) -> Option<String> {
            self.banner.map(str::to_string)
        }
    }

    struct FixedCounters(HostVersion);

    impl VersionCounters for FixedCounters {
        fn host_version(&self) -> HostVersion {
            self.0
        }
    }

    #[test]
    fn test_kind_priority_order() {
        assert!(StrategyKind::NativeDescriptor < StrategyKind::AlternateRuntimeProbe);
        assert!(StrategyKind::AlternateRuntimeProbe < StrategyKind::EnvironmentCounters);
    }

    #[test]
    fn test_native_strategy_parses_banner() {
        let strategy = NativeDescriptorStrategy::new(FixedBanner(Some(".NET Core 3.1.5")));
        let descriptor = strategy.try_detect(&DescriptorParser::default()).unwrap();

        assert_eq!(strategy.kind(), StrategyKind::NativeDescriptor);
        assert_eq!(descriptor.name(), Some(".NET Core"));
        assert_eq!(descriptor.version(), Some("3.1.5"));
    }

    #[test]
    fn test_native_strategy_without_banner() {
        let strategy = NativeDescriptorStrategy::new(FixedBanner(None));
        assert!(strategy.try_detect(&DescriptorParser::default()).is_none());
    }

    #[test]
    fn test_mono_strategy_absent() {
        let strategy = MonoProbeStrategy::new(FakeMono {
            present: false,
            banner: Some("6.12.0.182"),
        });
        assert!(strategy.try_detect(&DescriptorParser::default()).is_none());
    }

    #[test]
    fn test_mono_strategy_present() {
        let raw = "6.12.0.182 (tarball Mon Jun  8 23:56:15 UTC 2020)";
        let strategy = MonoProbeStrategy::new(FakeMono {
            present: true,
            banner: Some(raw),
        });
        let descriptor = strategy.try_detect(&DescriptorParser::default()).unwrap();

        assert_eq!(descriptor.name(), Some("Mono"));
        assert_eq!(descriptor.version(), Some("6.12.0.182"));
        assert_eq!(descriptor.raw(), Some(raw));
    }

    #[test]
    fn test_mono_strategy_present_without_banner() {
        let strategy = MonoProbeStrategy::new(FakeMono {
            present: true,
            banner: None,
        });
        let descriptor = strategy.try_detect(&DescriptorParser::default()).unwrap();

        assert_eq!(descriptor, RuntimeDescriptor::named("Mono"));
    }

    #[test]
    fn test_counters_major_one_is_empty_version() {
        let strategy =
            EnvironmentCountersStrategy::new(FixedCounters(HostVersion::new(1, 1, 4322, 2032)));
        let descriptor = strategy.try_detect(&DescriptorParser::default()).unwrap();

        assert_eq!(descriptor.name(), Some(".NET Framework"));
        assert_eq!(descriptor.version(), Some(""));
        assert_eq!(descriptor.raw(), Some("Environment.Version=1.1.4322.2032"));
    }

    #[test]
    fn test_counters_full_version() {
        let strategy =
            EnvironmentCountersStrategy::new(FixedCounters(HostVersion::new(4, 0, 30319, 42000)));
        let descriptor = strategy.try_detect(&DescriptorParser::default()).unwrap();

        assert_eq!(descriptor.version(), Some("4.0.30319.42000"));
        assert_eq!(descriptor.raw(), Some("Environment.Version=4.0.30319.42000"));
        assert_eq!(descriptor.family(), RuntimeFamily::Framework);
    }
}
