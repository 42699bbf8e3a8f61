//! Runtime family enum classifying resolved descriptors.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// The family a runtime descriptor belongs to.
///
/// Each family determines which version refiner, if any, may sharpen a
/// descriptor after detection. Classification is purely name-based.
///
/// # Extensibility
///
/// This enum is marked `#[non_exhaustive]`. When matching on
/// `RuntimeFamily`, always include a wildcard pattern:
///
/// ```rust
/// use clr_runtime_discovery::RuntimeFamily;
///
/// fn describe(family: RuntimeFamily) -> &'static str {
///     match family {
///         RuntimeFamily::Framework => "registry refinement",
///         RuntimeFamily::Core => "deployment path refinement",
///         _ => "no refinement",
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
#[non_exhaustive]
pub enum RuntimeFamily {
    /// The classic, Windows-only .NET Framework.
    Framework,
    /// The cross-platform runtime (.NET Core, .NET 5 and later).
    Core,
    /// The independent Mono implementation.
    Mono,
    /// Anything that could not be classified.
    Other,
}

impl RuntimeFamily {
    /// Classify a descriptor name into a family.
    ///
    /// Matching is an ASCII case-insensitive prefix test. A name starting
    /// with `.NET` that is not `.NET Framework` is treated as the modern
    /// family, which covers both `.NET Core 3.1` and `.NET 8.0` banners.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clr_runtime_discovery::RuntimeFamily;
    ///
    /// assert_eq!(RuntimeFamily::classify(Some(".NET Framework")), RuntimeFamily::Framework);
    /// assert_eq!(RuntimeFamily::classify(Some(".NET")), RuntimeFamily::Core);
    /// assert_eq!(RuntimeFamily::classify(None), RuntimeFamily::Other);
    /// ```
    pub fn classify(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return Self::Other;
        };

        if starts_with_ignore_case(name, ".NET Framework") {
            Self::Framework
        } else if starts_with_ignore_case(name, ".NET") {
            Self::Core
        } else if starts_with_ignore_case(name, "Mono") {
            Self::Mono
        } else {
            Self::Other
        }
    }

    /// Canonical name literal for the family.
    ///
    /// This is the name the coarse counter strategy assigns and the name
    /// override the Mono probe passes to the parser.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Framework => ".NET Framework",
            Self::Core => ".NET Core",
            Self::Mono => "Mono",
            Self::Other => "Unknown",
        }
    }

    /// Iterator over all families.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
