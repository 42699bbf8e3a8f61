//! Core library location lookup via the process memory map.

use crate::host::DeploymentPathSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Memory map of the current process on Linux.
const SELF_MAPS: &str = "/proc/self/maps";

/// File name of the .NET core library assembly.
const CORE_LIBRARY: &str = "System.Private.CoreLib.dll";

/// Finds a mapped module by file name in a `/proc/<pid>/maps` listing.
///
/// A native agent loaded into a .NET process sees the core library mapped
/// from its deployment folder, which is all the deployment path refiner
/// needs. Hosts without a maps file simply yield no location.
///
/// # Example
///
/// ```rust
/// use clr_runtime_discovery::{DeploymentPathSource, LoadedModulePath};
///
/// let source = LoadedModulePath::new().with_maps_file("/nonexistent/maps");
/// assert!(source.component_location().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LoadedModulePath {
    maps_file: PathBuf,
    module: String,
}

impl LoadedModulePath {
    /// Look up the core library in the current process.
    pub fn new() -> Self {
        Self {
            maps_file: PathBuf::from(SELF_MAPS),
            module: CORE_LIBRARY.to_string(),
        }
    }

    /// Read a different maps listing, e.g. `/proc/<pid>/maps`.
    pub fn with_maps_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.maps_file = path.into();
        self
    }

    /// Look for a different module file name.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }
}

impl Default for LoadedModulePath {
    fn default() -> Self {
        Self::new()
    }
}

impl DeploymentPathSource for LoadedModulePath {
    fn component_location(&self) -> Option<String> {
        let maps = match fs::read_to_string(&self.maps_file) {
            Ok(maps) => maps,
            Err(err) => {
                debug!(path = %self.maps_file.display(), error = %err, "Cannot read memory map");
                return None;
            }
        };

        find_mapped_module(&maps, &self.module)
    }
}

/// Return the first mapped path whose file name is `module`.
fn find_mapped_module(maps: &str, module: &str) -> Option<String> {
    maps.lines()
        .filter_map(|line| {
            // address perms offset dev inode pathname
            let path = line.split_whitespace().skip(5).collect::<Vec<_>>().join(" ");
            (!path.is_empty()).then_some(path)
        })
        .find(|path| {
            Path::new(path)
                .file_name()
                .is_some_and(|name| name == module)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MAPS: &str = "\
55d1c0a00000-55d1c0a02000 r--p 00000000 08:01 1048600                    /usr/share/dotnet/dotnet
7f3a10000000-7f3a10021000 rw-p 00000000 00:00 0
7f3a2c000000-7f3a2c9a0000 r--s 00000000 08:01 1311021                    /usr/share/dotnet/shared/Microsoft.NETCore.App/6.0.25/System.Private.CoreLib.dll
7f3a2d000000-7f3a2d400000 r-xp 00000000 08:01 1311030                    /usr/share/dotnet/shared/Microsoft.NETCore.App/6.0.25/libcoreclr.so
7ffd4e1f0000-7ffd4e211000 rw-p 00000000 00:00 0                          [stack]
";

    #[test]
    fn test_find_core_library() {
        assert_eq!(
            find_mapped_module(MAPS, CORE_LIBRARY),
            Some(
                "/usr/share/dotnet/shared/Microsoft.NETCore.App/6.0.25/System.Private.CoreLib.dll"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_find_other_module() {
        let path = find_mapped_module(MAPS, "libcoreclr.so").unwrap();
        assert!(path.ends_with("/6.0.25/libcoreclr.so"));
    }

    #[test]
    fn test_find_missing_module() {
        assert_eq!(find_mapped_module(MAPS, "libmonosgen-2.0.so"), None);
        assert_eq!(find_mapped_module("", CORE_LIBRARY), None);
    }

    #[test]
    fn test_find_path_with_spaces() {
        let maps = "7f00-7f01 r--s 00000000 08:01 1 /opt/my apps/System.Private.CoreLib.dll\n";
        assert_eq!(
            find_mapped_module(maps, CORE_LIBRARY),
            Some("/opt/my apps/System.Private.CoreLib.dll".to_string())
        );
    }

    #[test]
    fn test_component_location_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MAPS.as_bytes()).unwrap();

        let source = LoadedModulePath::new().with_maps_file(file.path());
        let location = source.component_location().unwrap();
        assert!(location.contains("Microsoft.NETCore.App/6.0.25"));
    }

    #[test]
    fn test_component_location_missing_file() {
        let source = LoadedModulePath::new().with_maps_file("/nonexistent/maps");
        assert!(source.component_location().is_none());
    }
}
