//! Host lookup tools.
//!
//! The resolver never inspects the host directly. Everything it learns
//! about dependencies outside the distribution comes through [`HostTools`]:
//! where a unit is installed, its compiled flags, the host package that
//! provides it, and which host package owns a given file.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::sources::external::Discovery;
use crate::util::config::ToolsConfig;
use crate::util::process::ProcessBuilder;

/// `dpkg -S` output: `name[:arch]: /path`
static OWNER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9+.\-]*)(?::[A-Za-z0-9\-]+)?(?:, [^:]+)*: /")
        .expect("valid owner regex")
});

/// Link-time flags reported for a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFlags {
    pub libraries: Vec<String>,
    pub library_dirs: Vec<String>,
    pub other: Vec<String>,
}

/// External collaborator contract for host lookups.
///
/// Every method answers `None` when the lookup fails; callers decide
/// whether that is fatal.
pub trait HostTools {
    /// Install path of a unit known to the host.
    fn find(&self, name: &str) -> Option<PathBuf>;

    /// Include directories from the compiled-flags lookup.
    fn cflags(&self, name: &str) -> Option<Vec<String>>;

    /// Libraries, library dirs and other link flags.
    fn libs(&self, name: &str) -> Option<LinkFlags>;

    /// Generic system package-config lookup.
    fn pkg_config(&self, name: &str) -> Option<Discovery>;

    /// Host package identifier for a dependency key.
    fn resolve_host_package(&self, name: &str) -> Option<String>;

    /// Installed host package whose file listing contains `file`.
    fn owning_host_package(&self, file: &Path) -> Option<String>;
}

/// Split tool output into values, dropping a flag prefix such as `-I`.
pub fn parse_flags(output: &str, prefix: &str) -> Vec<String> {
    output
        .split_whitespace()
        .map(|token| token.strip_prefix(prefix).unwrap_or(token))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Host package identifiers from name-resolution output.
///
/// Lines starting with `#` name the installer and are skipped; several
/// packages are joined into one comma-separated identifier.
pub fn parse_resolution(output: &str) -> Option<String> {
    let packages: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .collect();

    if packages.is_empty() {
        None
    } else {
        Some(packages.join(", "))
    }
}

/// Owning package from a file-ownership query.
pub fn parse_owner(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| OWNER_LINE.captures(line.trim()))
        .map(|caps| caps[1].to_string())
}

/// [`HostTools`] backed by subprocess invocations of configured programs.
#[derive(Debug, Clone)]
pub struct SystemTools {
    find_tool: String,
    resolve_tool: String,
    pkg_config_tool: String,
    host_query_tool: String,
}

impl SystemTools {
    pub fn new(config: &ToolsConfig) -> Self {
        SystemTools {
            find_tool: config.find_tool().to_string(),
            resolve_tool: config.resolve_tool().to_string(),
            pkg_config_tool: config.pkg_config_tool().to_string(),
            host_query_tool: config.host_query_tool().to_string(),
        }
    }

    fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        ProcessBuilder::new(program).args(args).lookup()
    }
}

impl Default for SystemTools {
    fn default() -> Self {
        SystemTools::new(&ToolsConfig::default())
    }
}

impl HostTools for SystemTools {
    fn find(&self, name: &str) -> Option<PathBuf> {
        self.run(&self.find_tool, &["find", name])
            .filter(|out| !out.is_empty())
            .map(PathBuf::from)
    }

    fn cflags(&self, name: &str) -> Option<Vec<String>> {
        self.run(&self.find_tool, &["cflags-only-I", name])
            .map(|out| parse_flags(&out, "-I"))
    }

    fn libs(&self, name: &str) -> Option<LinkFlags> {
        let libraries = self.run(&self.find_tool, &["libs-only-l", name])?;
        let library_dirs = self.run(&self.find_tool, &["libs-only-L", name])?;
        let other = self.run(&self.find_tool, &["libs-only-other", name])?;

        Some(LinkFlags {
            libraries: parse_flags(&libraries, "-l"),
            library_dirs: parse_flags(&library_dirs, "-L"),
            other: parse_flags(&other, ""),
        })
    }

    fn pkg_config(&self, name: &str) -> Option<Discovery> {
        let include = self.run(&self.pkg_config_tool, &["--cflags-only-I", name])?;
        let libraries = self.run(&self.pkg_config_tool, &["--libs-only-l", name])?;
        let library_dirs = self.run(&self.pkg_config_tool, &["--libs-only-L", name])?;
        let other = self.run(&self.pkg_config_tool, &["--libs-only-other", name])?;

        Some(Discovery {
            include_dirs: parse_flags(&include, "-I"),
            libraries: parse_flags(&libraries, "-l"),
            library_dirs: parse_flags(&library_dirs, "-L"),
            link_flags: parse_flags(&other, ""),
            path: None,
        })
    }

    fn resolve_host_package(&self, name: &str) -> Option<String> {
        self.run(&self.resolve_tool, &["resolve", name])
            .and_then(|out| parse_resolution(&out))
    }

    fn owning_host_package(&self, file: &Path) -> Option<String> {
        let file = file.to_string_lossy();
        self.run(&self.host_query_tool, &["-S", &file])
            .and_then(|out| parse_owner(&out))
    }
}
