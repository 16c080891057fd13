//! `manifold graph` command

use anyhow::Result;

use super::Workspace;
use crate::cli::{GlobalArgs, GraphArgs};
use manifold::ops::{build_graph, format_graph};

pub fn execute(args: GraphArgs, global: &GlobalArgs) -> Result<()> {
    let ws = Workspace::load(global)?;
    let ctx = ws.configure(global)?;
    let graph = build_graph(&ctx)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
    } else {
        print!("{}", format_graph(&graph));
    }

    Ok(())
}
