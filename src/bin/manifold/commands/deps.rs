//! `manifold deps` command

use anyhow::Result;

use super::Workspace;
use crate::cli::{DepsArgs, GlobalArgs};
use manifold::util::OrderedSet;

pub fn execute(args: DepsArgs, global: &GlobalArgs) -> Result<()> {
    let ws = Workspace::load(global)?;
    let ctx = ws.configure(global)?;
    let unit = ctx.unit(&args.unit)?;

    let sections: [(&str, &OrderedSet); 9] = [
        ("internal_build_deps", unit.internal_build_deps()),
        ("external_build_deps", unit.external_build_deps()),
        ("internal_run_deps", unit.internal_run_deps()),
        ("external_run_deps", unit.external_run_deps()),
        ("extra_build_deps", unit.extra_build_deps()),
        ("extra_run_deps", unit.extra_run_deps()),
        ("include_dirs", unit.include_dirs()),
        ("link_libraries", unit.link_libraries()),
        ("link_flags", unit.link_flags()),
    ];

    if args.json {
        let mut object = serde_json::Map::new();
        object.insert("unit".to_string(), unit.name().into());
        object.insert("kind".to_string(), unit.kind().to_string().into());
        object.insert("meta".to_string(), unit.is_meta().into());
        for (key, set) in sections {
            object.insert(key.to_string(), serde_json::to_value(set)?);
        }
        println!("{}", serde_json::to_string_pretty(&object)?);
        return Ok(());
    }

    println!(
        "{} ({}{})",
        unit.name(),
        unit.kind(),
        if unit.is_meta() { ", meta" } else { "" }
    );
    for (key, set) in sections {
        if !set.is_empty() {
            println!("  {}: {}", key, set.to_vec().join(" "));
        }
    }

    Ok(())
}
