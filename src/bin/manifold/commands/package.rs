//! `manifold package` command

use anyhow::Result;

use super::Workspace;
use crate::cli::{GlobalArgs, PackageArgs};
use manifold::ops::{format_listing, package_dependencies};

pub fn execute(args: PackageArgs, global: &GlobalArgs) -> Result<()> {
    let ws = Workspace::load(global)?;
    let mut ctx = ws.configure(global)?;
    let listing = package_dependencies(&mut ctx)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print!("{}", format_listing(&listing));
    }

    Ok(())
}
