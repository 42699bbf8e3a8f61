//! Detection options configuration.
//!
//! This module provides the [`DetectOptions`] struct for configuring runtime
//! detection: the pattern used to parse runtime banners and the table that
//! maps .NET Framework release identifiers to product versions.

use serde::{Deserialize, Serialize};

/// Default banner pattern.
///
/// Skips leading whitespace, then captures a leading run of words
/// (`.NET Framework`, `Mono`, `.NET Core`) as `name` and the first token
/// starting with a digit as `version`.
pub const DEFAULT_BANNER_PATTERN: &str =
    r"^\s*(?<name>(?:[A-Za-z.]\S*\s?)*)(?:\s|^|$)(?<version>\d\S*)";

/// Known `NDP\v4\Full\Release` values, oldest first.
const DEFAULT_RELEASES: &[(u32, &str)] = &[
    (378389, "4.5"),
    (378675, "4.5.1"),
    (378758, "4.5.1"),
    (379893, "4.5.2"),
    (393295, "4.6"),
    (393297, "4.6"),
    (394254, "4.6.1"),
    (394271, "4.6.1"),
    (394802, "4.6.2"),
    (394806, "4.6.2"),
    (460798, "4.7"),
    (460805, "4.7"),
    (461308, "4.7.1"),
    (461310, "4.7.1"),
    (461808, "4.7.2"),
    (461814, "4.7.2"),
    (528040, "4.8"),
    (528049, "4.8"),
    (528372, "4.8"),
    (528449, "4.8"),
    (533320, "4.8.1"),
    (533325, "4.8.1"),
];

/// Ordered mapping from installation release identifier to version text.
///
/// Lookup is by exact release id. Entries are kept in insertion order, and
/// the first entry for a given id wins.
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::ReleaseTable;
///
/// let table: ReleaseTable = [(528040, "4.8")].into_iter().collect();
/// assert_eq!(table.lookup(528040), Some("4.8"));
/// assert_eq!(table.lookup(1), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseTable(Vec<(u32, String)>);

impl ReleaseTable {
    /// Version text mapped to `release`, if any.
    pub fn lookup(&self, release: u32) -> Option<&str> {
        self.0
            .iter()
            .find(|(id, _)| *id == release)
            .map(|(_, version)| version.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ReleaseTable {
    fn default() -> Self {
        DEFAULT_RELEASES.iter().copied().collect()
    }
}

impl<V: Into<String>> FromIterator<(u32, V)> for ReleaseTable {
    fn from_iter<I: IntoIterator<Item = (u32, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, version)| (id, version.into()))
                .collect(),
        )
    }
}

/// Configuration options for runtime detection.
///
/// The banner pattern must contain the named capture groups `name` and
/// `version`; it is validated when a [`Detector`](crate::Detector) is built.
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::{DetectOptions, ReleaseTable};
///
/// // Default pattern and release table
/// let opts = DetectOptions::default();
///
/// // Custom table, default pattern
/// let opts = DetectOptions {
///     release_table: [(528040, "4.8"), (533320, "4.8.1")].into_iter().collect(),
///     ..Default::default()
/// };
/// assert_eq!(opts.release_table.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectOptions {
    /// Regular expression used to split a banner into name and version.
    ///
    /// Default: [`DEFAULT_BANNER_PATTERN`]
    pub banner_pattern: String,

    /// Release identifier to version mapping used by registry refinement.
    ///
    /// More entries yield more precision. Default: every .NET Framework
    /// 4.5 through 4.8.1 release id.
    pub release_table: ReleaseTable,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            banner_pattern: DEFAULT_BANNER_PATTERN.to_string(),
            release_table: ReleaseTable::default(),
        }
    }
}
