//! First fix pass: strip the nRF_Log dependencies out of the SES project.

use std::process;

use anyhow::Context;
use sesfix::{LogStripPass, PatchPass, ProjectDescriptor, DEFAULT_PROJECT_FILE};

fn run() -> anyhow::Result<()> {
    let pass = LogStripPass;
    log::info!("fixing SES project: {}", DEFAULT_PROJECT_FILE);

    let mut descriptor = ProjectDescriptor::load(DEFAULT_PROJECT_FILE)
        .with_context(|| format!("cannot load {}", DEFAULT_PROJECT_FILE))?;

    let report = pass.apply(&mut descriptor)?;
    log::info!(
        "pass {} done: {} folder(s), {} file reference(s) removed, {} element(s) inserted",
        pass.name(),
        report.folders_removed,
        report.file_refs_removed,
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
