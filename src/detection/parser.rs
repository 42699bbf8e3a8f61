//! Runtime banner parsing with regex extraction.

use crate::{ConfigError, RuntimeDescriptor};
use regex::Regex;

/// Splits runtime banners into name and version.
///
/// The parser is stateless once built and can be shared freely between
/// threads.
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::DescriptorParser;
///
/// let parser = DescriptorParser::default();
/// let descriptor = parser.parse(Some(".NET Framework 4.8.4250.0"), None).unwrap();
/// assert_eq!(descriptor.name(), Some(".NET Framework"));
/// assert_eq!(descriptor.version(), Some("4.8.4250.0"));
/// ```
#[derive(Debug, Clone)]
pub struct DescriptorParser {
    pattern: Regex,
}

impl DescriptorParser {
    /// Compile a banner pattern.
    ///
    /// The pattern must define the named capture groups `name` and
    /// `version`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidPattern`] if the pattern does not compile
    /// - [`ConfigError::MissingCaptureGroup`] if a required group is absent
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern)?;

        for group in ["name", "version"] {
            if !pattern.capture_names().flatten().any(|name| name == group) {
                return Err(ConfigError::MissingCaptureGroup(group));
            }
        }

        Ok(Self { pattern })
    }

    /// Parse a banner into a descriptor.
    ///
    /// - No banner and no override yields `None`.
    /// - No banner with an override yields a name-only descriptor.
    /// - A matching banner yields the override (or the trimmed captured
    ///   name) and the captured version, which is `Some("")` when the group
    ///   matched nothing and `None` when it did not participate.
    /// - A non-matching banner yields the override and no version.
    ///
    /// `raw` always holds `banner` unmodified.
    pub fn parse(
        &self,
        banner: Option<&str>,
        name_override: Option<&str>,
    ) -> Option<RuntimeDescriptor> {
        let Some(banner) = banner else {
            return name_override.map(RuntimeDescriptor::named);
        };

        let name_override = name_override.map(str::to_string);
        let raw = Some(banner.to_string());

        let Some(caps) = self.pattern.captures(banner) else {
            return Some(RuntimeDescriptor::new(name_override, None, raw));
        };

        let name =
            name_override.or_else(|| caps.name("name").map(|m| m.as_str().trim().to_string()));
        let version = caps.name("version").map(|m| m.as_str().to_string());

        Some(RuntimeDescriptor::new(name, version, raw))
    }
}

impl Default for DescriptorParser {
    fn default() -> Self {
        Self {
            pattern: Regex::new(crate::options::DEFAULT_BANNER_PATTERN)
                .expect("Default banner pattern is valid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absent_without_override() {
        assert_eq!(DescriptorParser::default().parse(None, None), None);
    }

    #[test]
    fn test_parse_absent_with_override() {
        let descriptor = DescriptorParser::default().parse(None, Some("X")).unwrap();
        assert_eq!(descriptor, RuntimeDescriptor::named("X"));
        assert_eq!(descriptor.version(), None);
        assert_eq!(descriptor.raw(), None);
    }

    #[test]
    fn test_parse_mono_banner_with_override() {
        let raw = "Mono 5.10.1.47 (tarball Tue Apr 17 09:23:16 UTC 2018)";
        let descriptor = DescriptorParser::default().parse(Some(raw), Some("Mono")).unwrap();

        assert_eq!(descriptor.name(), Some("Mono"));
        assert_eq!(descriptor.version(), Some("5.10.1.47"));
        assert_eq!(descriptor.raw(), Some(raw));
    }

    #[test]
    fn test_parse_unrecognized_banner() {
        let descriptor = DescriptorParser::default()
            .parse(Some("unrecognized-banner-text"), Some("X"))
            .unwrap();

        assert_eq!(descriptor.name(), Some("X"));
        assert_eq!(descriptor.version(), None);
        assert_eq!(descriptor.raw(), Some("unrecognized-banner-text"));
    }

    #[test]
    fn test_parse_unrecognized_banner_without_override() {
        let descriptor = DescriptorParser::default()
            .parse(Some("no digits here"), None)
            .unwrap();

        assert_eq!(descriptor.name(), None);
        assert_eq!(descriptor.raw(), Some("no digits here"));
    }

    #[test]
    fn test_parse_framework_banner() {
        let descriptor = DescriptorParser::default()
            .parse(Some(".NET Framework 4.7.3062.0"), None)
            .unwrap();

        assert_eq!(descriptor.name(), Some(".NET Framework"));
        assert_eq!(descriptor.version(), Some("4.7.3062.0"));
    }

    #[test]
    fn test_parse_core_banners() {
        let parser = DescriptorParser::default();

        let core = parser.parse(Some(".NET Core 3.1.5"), None).unwrap();
        assert_eq!(core.name(), Some(".NET Core"));
        assert_eq!(core.version(), Some("3.1.5"));

        let net = parser.parse(Some(".NET 6.0.0-rc.1.21451.13"), None).unwrap();
        assert_eq!(net.name(), Some(".NET"));
        assert_eq!(net.version(), Some("6.0.0-rc.1.21451.13"));

        let native = parser.parse(Some(".NET Native 2.2.0.0"), None).unwrap();
        assert_eq!(native.name(), Some(".NET Native"));
    }

    #[test]
    fn test_parse_leading_whitespace() {
        let parser = DescriptorParser::default();

        let core = parser.parse(Some(" .NET Core 3.1.5"), None).unwrap();
        assert_eq!(core.name(), Some(".NET Core"));
        assert_eq!(core.version(), Some("3.1.5"));
        assert_eq!(core.raw(), Some(" .NET Core 3.1.5"));

        let bare = parser.parse(Some("  5.10.1.47 (tarball)"), Some("Mono")).unwrap();
        assert_eq!(bare.version(), Some("5.10.1.47"));
    }

    #[test]
    fn test_parse_preserves_raw_exactly() {
        let parser = DescriptorParser::default();
        for raw in ["  .NET Core 3.1.5  ", "", "Mono\n6.12", "ünïcode 1.0"] {
            let descriptor = parser.parse(Some(raw), Some("X")).unwrap();
            assert_eq!(descriptor.raw(), Some(raw));
        }
    }

    #[test]
    fn test_parse_empty_version_is_not_unset() {
        let parser = DescriptorParser::new(r"^(?<name>[^\d]*)(?<version>\d*)").unwrap();
        let descriptor = parser.parse(Some("Custom Runtime"), None).unwrap();

        assert_eq!(descriptor.name(), Some("Custom Runtime"));
        assert_eq!(descriptor.version(), Some(""));
    }

    #[test]
    fn test_parse_non_participating_version_is_unset() {
        let parser = DescriptorParser::new(r"^(?<name>[^\d]*)(?<version>\d+)?").unwrap();
        let descriptor = parser.parse(Some("Custom Runtime"), None).unwrap();

        assert_eq!(descriptor.version(), None);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = DescriptorParser::default();
        let first = parser.parse(Some(".NET Core 3.1.5"), None);
        let second = parser.parse(Some(".NET Core 3.1.5"), None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_new_rejects_invalid_pattern() {
        let result = DescriptorParser::new("(?<name>");
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn test_new_rejects_missing_groups() {
        let result = DescriptorParser::new(r"(?<version>\d+)");
        assert!(matches!(result, Err(ConfigError::MissingCaptureGroup("name"))));

        let result = DescriptorParser::new(r"(?<name>\D+)");
        assert!(matches!(result, Err(ConfigError::MissingCaptureGroup("version"))));
    }
}
