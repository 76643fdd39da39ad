//! sesfix: maintenance tooling for the T1000-E tracker SES project.
//!
//! Two unrelated jobs live here:
//! - Three patch passes that strip Nordic SDK dependencies out of the
//!   `.emProject` descriptor, each shipped as its own binary
//!   (`fix-ses-project`, `fix-ses-project-complete`, `fix-ses-project-final`).
//! - A post-build hook (`post-build`) converting the compiled hex image to
//!   a UF2 image via the external `uf2conv.py` utility.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **logger**: Stderr sink behind the `log` macros
//! - **markup**: Structural span location over the descriptor markup
//! - **descriptor**: Load, backup and write-back of the target file
//! - **ops**: The individual rewrite operations
//! - **passes**: The three named passes driving the ops
//! - **uf2**: The post-build conversion hook

// Core foundational modules
pub mod error;
pub mod logger;

// Descriptor patching
pub mod descriptor;
pub mod markup;
pub mod ops;
pub mod passes;

// Post-build conversion
pub mod uf2;

// Re-export the log crate for macro usage
pub use log;

// Re-export error types for easy access
pub use error::{ConvertError, ConvertResult, PatchError, PatchResult};

// Re-export the patching surface
pub use descriptor::ProjectDescriptor;
pub use passes::{
    LibraryStripPass, LogStripPass, PassReport, PatchPass, SdkStripPass, DEFAULT_PROJECT_FILE,
};

// Re-export the conversion hook
pub use uf2::{Uf2Converter, NRF52840_FAMILY_ID};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
