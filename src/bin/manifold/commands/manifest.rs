//! `manifold manifest` command

use anyhow::{bail, Result};

use super::Workspace;
use crate::cli::{GlobalArgs, ManifestArgs};

pub fn execute(args: ManifestArgs, global: &GlobalArgs) -> Result<()> {
    let ws = Workspace::load(global)?;
    let ctx = ws.configure(global)?;

    match args.plugin {
        None => print!("{}", ctx.manifest(&args.unit)?),
        Some(file) => {
            ctx.unit(&args.unit)?;
            let Some(manifest) = ctx
                .plugin_manifests()
                .iter()
                .find(|m| m.unit == args.unit && m.file == file)
            else {
                bail!("unit `{}` declares no plugin manifest `{}`", args.unit, file);
            };
            print!("{}", ctx.plugin_manifest(manifest));
        }
    }

    Ok(())
}
