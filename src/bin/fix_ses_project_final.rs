//! Third fix pass: strip the remaining Nordic SDK folders, drivers included.

use std::process;

use anyhow::Context;
use sesfix::{PatchPass, ProjectDescriptor, SdkStripPass, DEFAULT_PROJECT_FILE};

fn run() -> anyhow::Result<()> {
    let pass = SdkStripPass;
    log::info!("final SES project fix: {}", DEFAULT_PROJECT_FILE);

    let mut descriptor = ProjectDescriptor::load(DEFAULT_PROJECT_FILE)
        .with_context(|| format!("cannot load {}", DEFAULT_PROJECT_FILE))?;

    let report = pass.apply(&mut descriptor)?;
    log::info!(
        "pass {} done: {} folder(s), {} file reference(s) removed, {} include dir(s) dropped, {} element(s) inserted",
        pass.name(),
        report.folders_removed,
        report.file_refs_removed,
        report.include_dirs_dropped,
        report.elements_inserted,
    );

    Ok(())
}

fn main() {
    sesfix::logger::init();

    if let Err(e) = run() {
        log::error!("{:#}", e);
        process::exit(1);
    }
}
