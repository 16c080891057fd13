//! Writing generated manifests to disk.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::ops::graph::{build_graph, TargetKind};
use crate::resolver::ResolveContext;
use crate::util::fs::{write_if_changed, WriteOutcome};

/// One file considered by [`emit_manifests`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedFile {
    pub unit: String,
    pub path: PathBuf,
    pub written: bool,
}

/// Write every unit manifest and plugin manifest under `out_dir`, in build
/// graph order. Files whose content is unchanged are left alone.
pub fn emit_manifests(ctx: &ResolveContext, out_dir: &Path) -> Result<Vec<EmittedFile>> {
    let graph = build_graph(ctx)?;
    let mut emitted = Vec::with_capacity(graph.len());

    for target in &graph.targets {
        let contents = match target.kind {
            TargetKind::Manifest => ctx.manifest(&target.unit)?,
            TargetKind::PluginManifest => {
                let Some(manifest) = ctx.plugin_manifests().iter().find(|m| {
                    m.unit == target.unit && Path::new(&m.unit).join(&m.file) == target.output
                }) else {
                    continue;
                };
                ctx.plugin_manifest(manifest)
            }
        };

        let path = out_dir.join(&target.output);
        let outcome = write_if_changed(&path, &contents)?;
        tracing::debug!("{}: {:?}", path.display(), outcome);

        emitted.push(EmittedFile {
            unit: target.unit.clone(),
            path,
            written: outcome == WriteOutcome::Written,
        });
    }

    Ok(emitted)
}
