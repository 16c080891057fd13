//! Memoized resolution of dependencies the host provides.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::sources::tools::HostTools;

/// What host discovery learned about one external dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Discovery {
    pub include_dirs: Vec<String>,
    pub libraries: Vec<String>,
    pub library_dirs: Vec<String>,
    pub link_flags: Vec<String>,

    /// Install path, when the unit locator found it.
    pub path: Option<PathBuf>,
}

/// Resolves external dependency names through [`HostTools`], caching every
/// answer (including failures) so each name is looked up at most once.
pub struct ExternalResolver {
    tools: Box<dyn HostTools>,
    discoveries: HashMap<String, Option<Discovery>>,
    host_packages: HashMap<String, Option<String>>,
}

impl ExternalResolver {
    pub fn new(tools: Box<dyn HostTools>) -> Self {
        ExternalResolver {
            tools,
            discoveries: HashMap::new(),
            host_packages: HashMap::new(),
        }
    }

    /// Discover include dirs, libraries and link flags for `name`.
    ///
    /// The unit locator is asked first; its compiled-flags lookups supply
    /// the sets. Names it does not know fall back to package-config.
    pub fn discover(&mut self, name: &str) -> Option<Discovery> {
        if let Some(cached) = self.discoveries.get(name) {
            tracing::trace!("discovery cache hit for `{}`", name);
            return cached.clone();
        }

        let result = self.discover_uncached(name);
        match result {
            Some(ref found) => tracing::debug!(
                "discovered `{}`: {} include dirs, {} libraries",
                name,
                found.include_dirs.len(),
                found.libraries.len()
            ),
            None => tracing::debug!("`{}` not found on the host", name),
        }

        self.discoveries.insert(name.to_string(), result.clone());
        result
    }

    fn discover_uncached(&self, name: &str) -> Option<Discovery> {
        if let Some(path) = self.tools.find(name) {
            let include_dirs = self.tools.cflags(name).unwrap_or_default();
            let libs = self.tools.libs(name).unwrap_or_default();
            return Some(Discovery {
                include_dirs,
                libraries: libs.libraries,
                library_dirs: libs.library_dirs,
                link_flags: libs.other,
                path: Some(path),
            });
        }

        self.tools.pkg_config(name)
    }

    /// Host package identifier for `name`.
    ///
    /// Tries name resolution first. On failure, looks for the host package
    /// owning `<install path>/<manifest_file>`.
    pub fn resolve_host_package(&mut self, name: &str, manifest_file: &str) -> Option<String> {
        if let Some(cached) = self.host_packages.get(name) {
            tracing::trace!("host package cache hit for `{}`", name);
            return cached.clone();
        }

        let result = self
            .tools
            .resolve_host_package(name)
            .or_else(|| self.owner_of_manifest(name, manifest_file));

        match result {
            Some(ref package) => tracing::debug!("`{}` is provided by `{}`", name, package),
            None => tracing::debug!("no host package provides `{}`", name),
        }

        self.host_packages.insert(name.to_string(), result.clone());
        result
    }

    fn owner_of_manifest(&self, name: &str, manifest_file: &str) -> Option<String> {
        let path = self
            .discoveries
            .get(name)
            .and_then(|found| found.as_ref())
            .and_then(|found| found.path.clone())
            .or_else(|| self.tools.find(name))?;

        let manifest = path.join(manifest_file);
        tracing::debug!("searching host packages for {}", manifest.display());
        self.tools.owning_host_package(&manifest)
    }

    /// Cached discovery result, without performing a lookup.
    pub fn cached(&self, name: &str) -> Option<&Option<Discovery>> {
        self.discoveries.get(name)
    }

    /// Pre-seed an answer, bypassing the tools.
    pub fn insert(&mut self, name: impl Into<String>, discovery: Option<Discovery>) {
        self.discoveries.insert(name.into(), discovery);
    }
}

impl std::fmt::Debug for ExternalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalResolver")
            .field("discoveries", &self.discoveries.len())
            .field("host_packages", &self.host_packages.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockHostTools;

    #[test]
    fn test_discover_through_locator() {
        let tools = MockHostTools::new().with_unit(
            "roscpp",
            "/opt/ros/share/roscpp",
            &["/opt/ros/include"],
            &["roscpp"],
        );
        let mut resolver = ExternalResolver::new(Box::new(tools));

        let found = resolver.discover("roscpp").unwrap();
        assert_eq!(found.include_dirs, vec!["/opt/ros/include"]);
        assert_eq!(found.libraries, vec!["roscpp"]);
        assert_eq!(found.path, Some(PathBuf::from("/opt/ros/share/roscpp")));
    }

    #[test]
    fn test_discover_keeps_extra_link_flags() {
        let tools = MockHostTools::new()
            .with_unit("tf", "/opt/ros/share/tf", &[], &["tf"])
            .with_link_flags("tf", &["-pthread"]);
        let mut resolver = ExternalResolver::new(Box::new(tools));

        let found = resolver.discover("tf").unwrap();
        assert_eq!(found.link_flags, vec!["-pthread"]);
    }

    #[test]
    fn test_discover_falls_back_to_pkg_config() {
        let tools = MockHostTools::new().with_pkg_config("zlib", &["/usr/include"], &["z"]);
        let mut resolver = ExternalResolver::new(Box::new(tools));

        let found = resolver.discover("zlib").unwrap();
        assert_eq!(found.libraries, vec!["z"]);
        assert_eq!(found.path, None);
        assert!(resolver.discover("nothing").is_none());
    }

    #[test]
    fn test_discover_is_memoized() {
        let tools = MockHostTools::new().with_pkg_config("zlib", &[], &["z"]);
        let calls = tools.calls();
        let mut resolver = ExternalResolver::new(Box::new(tools));

        resolver.discover("zlib");
        resolver.discover("zlib");
        resolver.discover("missing");
        resolver.discover("missing");

        assert_eq!(calls.count("find", "zlib"), 1);
        assert_eq!(calls.count("pkg_config", "zlib"), 1);
        assert_eq!(calls.count("find", "missing"), 1);
    }

    #[test]
    fn test_resolve_host_package_primary() {
        let tools = MockHostTools::new().with_host_package("boost_system", "libboost-system-dev");
        let calls = tools.calls();
        let mut resolver = ExternalResolver::new(Box::new(tools));

        assert_eq!(
            resolver.resolve_host_package("boost_system", "package.xml").as_deref(),
            Some("libboost-system-dev")
        );
        assert_eq!(
            resolver.resolve_host_package("boost_system", "package.xml").as_deref(),
            Some("libboost-system-dev")
        );
        assert_eq!(calls.count("resolve", "boost_system"), 1);
    }

    #[test]
    fn test_resolve_host_package_owner_fallback() {
        let tools = MockHostTools::new()
            .with_unit("tf", "/opt/ros/fuerte/stacks/geometry/tf", &[], &[])
            .with_owner(
                "/opt/ros/fuerte/stacks/geometry/tf/manifest.xml",
                "ros-fuerte-geometry",
            );
        let mut resolver = ExternalResolver::new(Box::new(tools));

        assert_eq!(
            resolver.resolve_host_package("tf", "manifest.xml").as_deref(),
            Some("ros-fuerte-geometry")
        );
        assert_eq!(resolver.resolve_host_package("unknown", "manifest.xml"), None);
    }
}
