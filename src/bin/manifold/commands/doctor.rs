//! `manifold doctor` command

use anyhow::Result;

use crate::cli::{DoctorArgs, GlobalArgs};
use manifold::ops::{doctor, format_report, DoctorOptions};
use manifold::util::GlobalContext;

pub fn execute(_args: DoctorArgs, global: &GlobalArgs) -> Result<()> {
    let gctx = GlobalContext::new()?;
    let root = gctx
        .find_description()
        .ok()
        .and_then(|path| path.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| gctx.cwd().to_path_buf());
    let config = gctx.load_config(&root);

    let options = DoctorOptions {
        distro: global.distro.clone().or_else(|| global.fallback_distro.clone()),
    };
    let report = doctor(&config, &options);

    print!("{}", format_report(&report, global.verbose));

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
