//! `manifold configure` command

use std::sync::Arc;

use anyhow::Result;

use super::Workspace;
use crate::cli::{ConfigureArgs, GlobalArgs};
use manifold::ops::emit_manifests;
use manifold::util::shell::{Shell, Status};
use manifold::util::GlobalContext;

pub fn execute(args: ConfigureArgs, global: &GlobalArgs, shell: &Arc<Shell>) -> Result<()> {
    let ws = Workspace::load(global)?;
    let span = shell.span(
        Status::Configuring,
        format!("{} units", ws.description.units.len()),
    );

    let mut ctx = ws.configure(global)?;
    let generation = ctx.generation()?;
    shell.status(
        Status::Resolving,
        format!("{} units ({} schema)", ctx.registry().len(), generation),
    );

    if args.dry_run {
        span.finish_with_message("dry run, no files written");
        return Ok(());
    }

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| GlobalContext::output_dir(&ws.description.root));
    let emitted = emit_manifests(&ctx, &out_dir)?;

    let mut written = 0;
    for file in &emitted {
        if file.written {
            written += 1;
            shell.status(Status::Writing, file.path.display());
        } else {
            shell.status(Status::Fresh, file.path.display());
        }
        shell.json_event(&serde_json::json!({
            "reason": "manifest",
            "unit": file.unit,
            "path": file.path,
            "written": file.written,
        }));
    }

    span.finish_with_message(format!(
        "{} of {} manifests written to {}",
        written,
        emitted.len(),
        out_dir.display()
    ));
    Ok(())
}
