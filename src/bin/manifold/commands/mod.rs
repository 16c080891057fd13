//! Command implementations

pub mod completions;
pub mod configure;
pub mod deps;
pub mod doctor;
pub mod graph;
pub mod manifest;
pub mod package;

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use manifold::core::Description;
use manifold::ops::{self, ConfigureOptions};
use manifold::sources::SystemTools;
use manifold::util::{Config, GlobalContext};
use manifold::ResolveContext;

/// Everything a command needs before resolution starts.
pub struct Workspace {
    pub description: Description,
    pub config: Config,
}

impl Workspace {
    /// Locate and load Distribution.toml plus the layered config.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let gctx = GlobalContext::new()?;
        let path = match &global.manifest_path {
            Some(path) => path.clone(),
            None => gctx.find_description()?,
        };

        let description = Description::load(&path)
            .with_context(|| format!("could not load description {}", path.display()))?;
        let config = gctx.load_config(&description.root);

        Ok(Workspace {
            description,
            config,
        })
    }

    /// Run the configuration pass with the system host tools.
    pub fn configure(&self, global: &GlobalArgs) -> Result<ResolveContext> {
        let options = ConfigureOptions {
            distro: global.distro.clone(),
            fallback_distro: global.fallback_distro.clone(),
        };
        let tools = SystemTools::new(&self.config.tools);
        ops::configure(&self.description, &self.config, Box::new(tools), &options)
    }
}
