//! Configuration file support for Manifold.
//!
//! Manifold reads two configuration files:
//! - Global: `~/.manifold/config.toml` - User-wide defaults
//! - Project: `.manifold/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, field by field.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::generation::Generation;
use crate::core::interface::InterfaceKind;

/// Default program used to locate units and query their compiled flags.
pub const DEFAULT_FIND_TOOL: &str = "rospack";
/// Default program used to map dependency keys to host package names.
pub const DEFAULT_RESOLVE_TOOL: &str = "rosdep";
/// Default generic package-config program.
pub const DEFAULT_PKG_CONFIG: &str = "pkg-config";
/// Default host package database query program.
pub const DEFAULT_HOST_QUERY: &str = "dpkg";

/// Manifold configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Distribution selection
    pub distribution: DistributionConfig,

    /// Host lookup tools
    pub tools: ToolsConfig,

    /// Defaults for manifest header fields
    pub defaults: DefaultsConfig,

    /// Dependencies injected by code-generation helpers
    pub codegen: CodegenConfig,
}

/// `[distribution]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    /// Distribution name (e.g. "fuerte", "hydro")
    pub name: Option<String>,

    /// Force a schema generation instead of comparing the distribution name
    pub generation: Option<Generation>,
}

/// `[tools]` section: program names for the host lookup collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Unit locator and compiled-flags tool
    pub find: Option<String>,

    /// Host package name resolution tool
    pub resolve: Option<String>,

    /// Generic package-config fallback
    pub pkg_config: Option<String>,

    /// Host package database query tool (file ownership search)
    pub host_query: Option<String>,
}

impl ToolsConfig {
    pub fn find_tool(&self) -> &str {
        self.find.as_deref().unwrap_or(DEFAULT_FIND_TOOL)
    }

    pub fn resolve_tool(&self) -> &str {
        self.resolve.as_deref().unwrap_or(DEFAULT_RESOLVE_TOOL)
    }

    pub fn pkg_config_tool(&self) -> &str {
        self.pkg_config.as_deref().unwrap_or(DEFAULT_PKG_CONFIG)
    }

    pub fn host_query_tool(&self) -> &str {
        self.host_query.as_deref().unwrap_or(DEFAULT_HOST_QUERY)
    }
}

/// `[defaults]` section: header fields used when a unit does not set them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub maintainer: Option<String>,
    pub email: Option<String>,
    pub license: Option<String>,
    pub url: Option<String>,
}

/// Build and run dependencies added by one code-generation helper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenDeps {
    pub build: Vec<String>,
    pub run: Vec<String>,
}

/// `[codegen]` section. Unset entries use the active generation's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    pub message: Option<CodegenDeps>,
    pub service: Option<CodegenDeps>,
    pub config: Option<CodegenDeps>,
}

impl CodegenConfig {
    /// Configured override for a helper kind, if any.
    pub fn get(&self, kind: InterfaceKind) -> Option<&CodegenDeps> {
        match kind {
            InterfaceKind::Message => self.message.as_ref(),
            InterfaceKind::Service => self.service.as_ref(),
            InterfaceKind::Config => self.config.as_ref(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        merge_opt(&mut self.distribution.name, other.distribution.name);
        merge_opt(
            &mut self.distribution.generation,
            other.distribution.generation,
        );

        merge_opt(&mut self.tools.find, other.tools.find);
        merge_opt(&mut self.tools.resolve, other.tools.resolve);
        merge_opt(&mut self.tools.pkg_config, other.tools.pkg_config);
        merge_opt(&mut self.tools.host_query, other.tools.host_query);

        merge_opt(&mut self.defaults.maintainer, other.defaults.maintainer);
        merge_opt(&mut self.defaults.email, other.defaults.email);
        merge_opt(&mut self.defaults.license, other.defaults.license);
        merge_opt(&mut self.defaults.url, other.defaults.url);

        merge_opt(&mut self.codegen.message, other.codegen.message);
        merge_opt(&mut self.codegen.service, other.codegen.service);
        merge_opt(&mut self.codegen.config, other.codegen.config);
    }
}

fn merge_opt<T>(slot: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *slot = other;
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.manifold/config.toml)
/// 2. Global config (~/.manifold/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global manifold config directory (~/.manifold).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".manifold"))
}
