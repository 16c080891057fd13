//! Global context for Manifold operations.
//!
//! Provides centralized access to paths and output settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::core::distribution::DISTRIBUTION_FILE;
use crate::util::config::{self, Config};
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Description file lookup failure.
#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("could not find `{}` in `{}` or any parent directory", DISTRIBUTION_FILE, dir.display())]
    NotFound { dir: PathBuf },
}

impl DescriptionError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string()).with_suggestion(suggestions::NO_DISTRIBUTION)
    }
}

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Manifold data (~/.manifold/)
    home: PathBuf,


}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = config::global_config_dir().unwrap_or_else(|| PathBuf::from(".manifold"));

        Ok(GlobalContext {
            cwd,
            home,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the Manifold home directory (~/.manifold/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project-local Manifold directory under `root`.
    pub fn project_dir(root: &Path) -> PathBuf {
        root.join(".manifold")
    }

    /// Get the project configuration file path under `root`.
    pub fn project_config_path(root: &Path) -> PathBuf {
        Self::project_dir(root).join("config.toml")
    }

    /// Directory generated manifests are written to.
    pub fn output_dir(root: &Path) -> PathBuf {
        Self::project_dir(root).join("manifests")
    }

    /// Global config merged with the project config under `root`.
    pub fn load_config(&self, root: &Path) -> Config {
        config::load_config(&self.config_path(), &Self::project_config_path(root))
    }

    /// Find the description file starting from cwd and searching upward.
    pub fn find_description(&self) -> Result<PathBuf, DescriptionError> {
        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(DISTRIBUTION_FILE);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(DescriptionError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }
}
