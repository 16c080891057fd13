//! Test utilities and mocks for Manifold unit tests.
//!
//! This module provides a scripted [`HostTools`] implementation so the
//! resolver can be exercised without the host lookup programs installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use manifold::test_support::{MockHostTools, modern_context};
//!
//! #[test]
//! fn test_example() {
//!     let tools = MockHostTools::new().with_host_package("boost_system", "libboost-system-dev");
//!     let calls = tools.calls();
//!     let mut ctx = modern_context(tools);
//!
//!     // Use the context in tests, then inspect `calls`...
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::sources::external::Discovery;
use crate::sources::tools::{HostTools, LinkFlags};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Shared record of every lookup a [`MockHostTools`] answered.
///
/// Cloned out of the mock before it is boxed, so tests can still inspect
/// calls after handing the tools to a resolver.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl CallLog {
    fn record(&self, method: &str, arg: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((method.to_string(), arg.to_string()));
        }
    }

    /// Number of calls to `method` with `arg`.
    pub fn count(&self, method: &str, arg: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| {
                calls
                    .iter()
                    .filter(|(m, a)| m == method && a == arg)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Total number of calls to `method`.
    pub fn total(&self, method: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.iter().filter(|(m, _)| m == method).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().map(|c| c.is_empty()).unwrap_or(true)
    }
}

/// A unit the mock locator knows.
#[derive(Debug, Clone, Default)]
struct MockUnit {
    path: PathBuf,
    include_dirs: Vec<String>,
    libs: LinkFlags,
}

/// Scripted host lookup tools.
///
/// Anything not scripted answers `None`, like a missing program would.
#[derive(Debug, Clone, Default)]
pub struct MockHostTools {
    units: HashMap<String, MockUnit>,
    pkg_configs: HashMap<String, Discovery>,
    host_packages: HashMap<String, String>,
    owners: HashMap<PathBuf, String>,
    calls: CallLog,
}

impl MockHostTools {
    /// Create mock tools that know nothing.
    pub fn new() -> Self {
        MockHostTools::default()
    }

    /// Make `name` known to the unit locator.
    pub fn with_unit(
        mut self,
        name: &str,
        path: impl AsRef<Path>,
        include_dirs: &[&str],
        libraries: &[&str],
    ) -> Self {
        self.units.insert(
            name.to_string(),
            MockUnit {
                path: path.as_ref().to_path_buf(),
                include_dirs: strings(include_dirs),
                libs: LinkFlags {
                    libraries: strings(libraries),
                    ..Default::default()
                },
            },
        );
        self
    }

    /// Add link flags to a unit added with [`with_unit`](Self::with_unit).
    pub fn with_link_flags(mut self, name: &str, flags: &[&str]) -> Self {
        if let Some(unit) = self.units.get_mut(name) {
            unit.libs.other.extend(strings(flags));
        }
        self
    }

    /// Make `name` known to the package-config fallback only.
    pub fn with_pkg_config(mut self, name: &str, include_dirs: &[&str], libraries: &[&str]) -> Self {
        self.pkg_configs.insert(
            name.to_string(),
            Discovery {
                include_dirs: strings(include_dirs),
                libraries: strings(libraries),
                ..Default::default()
            },
        );
        self
    }

    /// Script a name-resolution answer.
    pub fn with_host_package(mut self, name: &str, package: &str) -> Self {
        self.host_packages
            .insert(name.to_string(), package.to_string());
        self
    }

    /// Script a file-ownership answer.
    pub fn with_owner(mut self, file: impl AsRef<Path>, package: &str) -> Self {
        self.owners
            .insert(file.as_ref().to_path_buf(), package.to_string());
        self
    }

    /// Handle to the call record, shared with every clone of these tools.
    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }
}

impl HostTools for MockHostTools {
    fn find(&self, name: &str) -> Option<PathBuf> {
        self.calls.record("find", name);
        self.units.get(name).map(|unit| unit.path.clone())
    }

    fn cflags(&self, name: &str) -> Option<Vec<String>> {
        self.calls.record("cflags", name);
        self.units.get(name).map(|unit| unit.include_dirs.clone())
    }

    fn libs(&self, name: &str) -> Option<LinkFlags> {
        self.calls.record("libs", name);
        self.units.get(name).map(|unit| unit.libs.clone())
    }

    fn pkg_config(&self, name: &str) -> Option<Discovery> {
        self.calls.record("pkg_config", name);
        self.pkg_configs.get(name).cloned()
    }

    fn resolve_host_package(&self, name: &str) -> Option<String> {
        self.calls.record("resolve", name);
        self.host_packages.get(name).cloned()
    }

    fn owning_host_package(&self, file: &Path) -> Option<String> {
        self.calls.record("owner", &file.to_string_lossy());
        self.owners.get(file).cloned()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscripted_lookups_fail() {
        let tools = MockHostTools::new();
        assert!(tools.find("roscpp").is_none());
        assert!(tools.resolve_host_package("roscpp").is_none());
        assert_eq!(tools.calls().total("find"), 1);
    }

    #[test]
    fn test_call_log_survives_boxing() {
        let tools = MockHostTools::new().with_pkg_config("zlib", &[], &["z"]);
        let calls = tools.calls();
        let boxed: Box<dyn HostTools> = Box::new(tools);

        assert!(boxed.pkg_config("zlib").is_some());
        assert_eq!(calls.count("pkg_config", "zlib"), 1);
        assert!(!calls.is_empty());
    }
}
