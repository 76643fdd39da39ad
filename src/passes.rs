//! The three de-Nordic patch passes.
//!
//! Each pass is a standalone rewrite of the same descriptor, an
//! increasingly aggressive evolution of the previous one rather than a
//! refinement of it. The passes assume the original, unpatched descriptor
//! structure; chaining them against one file is not a supported mode and
//! can produce a corrupted result.

use crate::descriptor::ProjectDescriptor;
use crate::error::PatchResult;
use crate::ops;

/// Default descriptor path targeted by all three fix binaries.
pub const DEFAULT_PROJECT_FILE: &str =
    "Seeed-Tracker-T1000-E-for-LoRaWAN-dev-board/pca10056/s140/11_ses_lorawan_tracker/t1000_e_dev_kit_pca10056.emProject";

/// Counts of what a pass touched, for the end-of-run log line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub folders_removed: usize,
    pub file_refs_removed: usize,
    pub include_dirs_dropped: usize,
    pub elements_inserted: usize,
}

/// A self-contained rewrite pass over the project descriptor.
pub trait PatchPass {
    fn name(&self) -> &'static str;

    /// Suffix of the backup file this pass writes next to the target.
    fn backup_suffix(&self) -> &'static str;

    /// Apply the pass: mutate the descriptor in memory, persist the backup
    /// and write the result back to disk.
    fn apply(&self, descriptor: &mut ProjectDescriptor) -> PatchResult<PassReport>;
}

/// First pass: strip the `nRF_Log` folder and a short list of Nordic
/// sources known to be absent from the tree, then put `simple_log.c` at the
/// top of the `Application` folder as their replacement.
pub struct LogStripPass;

const LOG_PROBLEM_FILES: &[&str] = &[
    "nrf_log_frontend.c",
    "nrf_log_str_formatter.c",
    "app_error_handler_gcc.c",
    "app_util_platform.c",
];

const SIMPLE_LOG_ELEMENT: &str = "<file file_name=\"../simple_log.c\" />";

impl PatchPass for LogStripPass {
    fn name(&self) -> &'static str {
        "log-strip"
    }

    fn backup_suffix(&self) -> &'static str {
        ".backup"
    }

    fn apply(&self, descriptor: &mut ProjectDescriptor) -> PatchResult<PassReport> {
        let mut report = PassReport::default();

        let (text, removed) = ops::remove_folder(descriptor.text(), "nRF_Log")?;
        report.folders_removed += removed;
        descriptor.set_text(text);

        for fragment in LOG_PROBLEM_FILES {
            let (text, removed) = ops::remove_file_refs(descriptor.text(), fragment)?;
            report.file_refs_removed += removed;
            descriptor.set_text(text);
        }

        let (text, inserted) =
            ops::insert_after_open_tag(descriptor.text(), "Application", &[SIMPLE_LOG_ELEMENT])?;
        report.elements_inserted += inserted;
        descriptor.set_text(text);

        // Quirk kept from day one: this pass snapshots the already patched
        // text, so `.backup` never holds the pristine descriptor.
        descriptor.backup(self.backup_suffix())?;
        descriptor.save()?;

        Ok(report)
    }
}

/// Second pass: drop the whole `nRF_Libraries` folder and every
/// `components/libraries` file reference, prune the include path list, and
/// append the minimal replacements plus the BLE beacon pair at the end of
/// the `Application` folder.
pub struct LibraryStripPass;

const LIBRARY_EXCLUDED_INCLUDE_DIRS: &[&str] = &["components/libraries", "components/ble"];

const LIBRARY_REPLACEMENT_ELEMENTS: &[&str] = &[
    "<file file_name=\"../minimal_nordic.c\" />",
    "<file file_name=\"../../../t1000_e/tracker/inc/app_ble_beacon.h\" />",
    "<file file_name=\"../../../t1000_e/tracker/src/app_ble_beacon.c\" />",
];

impl PatchPass for LibraryStripPass {
    fn name(&self) -> &'static str {
        "library-strip"
    }

    fn backup_suffix(&self) -> &'static str {
        ".original"
    }

    fn apply(&self, descriptor: &mut ProjectDescriptor) -> PatchResult<PassReport> {
        let mut report = PassReport::default();

        descriptor.backup(self.backup_suffix())?;

        let (text, removed) = ops::remove_folder(descriptor.text(), "nRF_Libraries")?;
        report.folders_removed += removed;
        descriptor.set_text(text);

        let (text, removed) = ops::remove_file_refs(descriptor.text(), "components/libraries")?;
        report.file_refs_removed += removed;
        descriptor.set_text(text);

        let (text, dropped) =
            ops::filter_include_dirs(descriptor.text(), LIBRARY_EXCLUDED_INCLUDE_DIRS, &[])?;
        report.include_dirs_dropped += dropped;
        descriptor.set_text(text);

        let (text, inserted) = ops::insert_before_close_tag(
            descriptor.text(),
            "Application",
            LIBRARY_REPLACEMENT_ELEMENTS,
        )?;
        report.elements_inserted += inserted;
        descriptor.set_text(text);

        descriptor.save()?;

        Ok(report)
    }
}

/// Third pass: remove every remaining Nordic SDK folder (drivers, BLE,
/// SoftDevice and the stray `None` folder), scrub the nrfx and softdevice
/// file references, prune the include paths down to the essentials, and
/// splice an `Essential_Startup` folder right after the Segger startup
/// files.
pub struct SdkStripPass;

const SDK_FOLDERS: &[&str] = &["nRF_Drivers", "nRF_BLE", "nRF_SoftDevice", "None"];

const SDK_FILE_FRAGMENTS: &[&str] = &[
    "integration/nrfx",
    "modules/nrfx",
    "components/ble",
    "components/softdevice",
];

const SDK_EXCLUDED_INCLUDE_DIRS: &[&str] =
    &["components/", "integration/", "modules/", "external/"];

const SDK_ALLOWED_INCLUDE_DIRS: &[&str] = &["external/utf_converter"];

const ESSENTIAL_STARTUP_BLOCK: &str = concat!(
    "\n    <folder Name=\"Essential_Startup\">",
    "\n      <file file_name=\"../startup_stubs.c\" />",
    "\n    </folder>",
);

impl PatchPass for SdkStripPass {
    fn name(&self) -> &'static str {
        "sdk-strip"
    }

    fn backup_suffix(&self) -> &'static str {
        ".final_backup"
    }

    fn apply(&self, descriptor: &mut ProjectDescriptor) -> PatchResult<PassReport> {
        let mut report = PassReport::default();

        descriptor.backup(self.backup_suffix())?;

        for folder in SDK_FOLDERS {
            let (text, removed) = ops::remove_folder(descriptor.text(), folder)?;
            report.folders_removed += removed;
            descriptor.set_text(text);
        }

        for fragment in SDK_FILE_FRAGMENTS {
            let (text, removed) = ops::remove_file_refs(descriptor.text(), fragment)?;
            report.file_refs_removed += removed;
            descriptor.set_text(text);
        }

        let (text, dropped) = ops::filter_include_dirs(
            descriptor.text(),
            SDK_EXCLUDED_INCLUDE_DIRS,
            SDK_ALLOWED_INCLUDE_DIRS,
        )?;
        report.include_dirs_dropped += dropped;
        descriptor.set_text(text);

        let (text, inserted) = ops::insert_after_folder(
            descriptor.text(),
            "Segger Startup Files",
            ESSENTIAL_STARTUP_BLOCK,
        )?;
        report.elements_inserted += inserted;
        descriptor.set_text(text);

        descriptor.save()?;

        Ok(report)
    }
}
