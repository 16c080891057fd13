//! Distribution.toml description file.
//!
//! The description lists every unit of a distribution in declaration order.
//! Units are registered first, so dependencies may name units declared
//! further down the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::plugin::PluginDecl;
use crate::core::unit::{Person, UnitDecl};
use crate::util::config::DistributionConfig;

/// Canonical description file name.
pub const DISTRIBUTION_FILE: &str = "Distribution.toml";

/// Errors reading a description file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unit #{index} in `{}` has an empty name", path.display())]
    EmptyUnitName { path: PathBuf, index: usize },

    #[error("unit `{unit}` is declared both as a stack and as a meta-package")]
    ConflictingKind { unit: String },
}

/// The parsed description file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Description {
    /// Distribution selection, same shape as the config section
    #[serde(default)]
    pub distribution: DistributionConfig,

    /// Units in declaration order
    #[serde(default, rename = "unit")]
    pub units: Vec<UnitDescription>,

    /// Directory containing the description
    #[serde(skip)]
    pub root: PathBuf,
}

/// One `[[unit]]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitDescription {
    pub name: String,

    /// Aggregates other units and builds nothing itself
    pub meta: bool,

    /// Declare through the stack entry point
    pub stack: bool,

    pub version: Option<String>,
    pub description: Option<String>,
    pub component: Option<String>,
    pub license: Option<String>,
    pub url: Option<String>,
    pub maintainer: Option<Person>,
    pub authors: Vec<String>,

    /// Include dirs the unit provides to dependents
    pub include_dirs: Vec<String>,

    /// Libraries the unit provides to dependents
    pub libraries: Vec<String>,

    pub build_depends: Vec<String>,
    pub run_depends: Vec<String>,
    pub stack_depends: Vec<String>,
    pub extra_build_depends: Vec<String>,
    pub extra_run_depends: Vec<String>,

    /// Build dependencies whose discovery may fail
    pub optional_build_depends: Vec<String>,

    pub messages: Vec<String>,
    pub services: Vec<String>,
    pub configs: Vec<String>,

    #[serde(rename = "plugin")]
    pub plugins: Vec<PluginDecl>,
}

impl UnitDescription {
    /// Declaration data for registering this unit.
    pub fn to_decl(&self) -> UnitDecl {
        UnitDecl {
            name: self.name.clone(),
            meta: self.meta,
            version: self.version.clone(),
            description: self.description.clone(),
            component: self.component.clone(),
            license: self.license.clone(),
            url: self.url.clone(),
            maintainer: self.maintainer.clone(),
            authors: self.authors.clone(),
        }
    }
}

impl Description {
    /// Load a description from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path)
    }

    /// Parse description content. `path` is used for error messages and
    /// to derive the root directory.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut description: Description =
            toml::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        for (index, unit) in description.units.iter().enumerate() {
            if unit.name.trim().is_empty() {
                return Err(ConfigError::EmptyUnitName {
                    path: path.to_path_buf(),
                    index,
                });
            }
            if unit.stack && unit.meta {
                return Err(ConfigError::ConflictingKind {
                    unit: unit.name.clone(),
                });
            }
        }

        description.root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        Ok(description)
    }

    pub fn unit(&self, name: &str) -> Option<&UnitDescription> {
        self.units.iter().find(|u| u.name == name)
    }
}
