//! Post-build HEX-to-UF2 conversion hook.
//!
//! Invoked once after the build pipeline produces `firmware.hex`. Runs the
//! external `uf2conv.py` utility synchronously and reports pass or fail
//! from its exit status alone; the UF2 artifact itself is never inspected.
//! No retry, and a failure does not abort anything beyond this hook.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ConvertError, ConvertResult};

/// UF2 family identifier for the nRF52840.
pub const NRF52840_FAMILY_ID: u32 = 0xADA5_2840;

/// Location of the conversion utility below the project root.
const CONVERTER_RELATIVE_PATH: &[&str] = &[
    "Seeed-Tracker-T1000-E-for-LoRaWAN-dev-board",
    "firmware",
    "uf2conv.py",
];

fn require_env(name: &'static str) -> ConvertResult<String> {
    std::env::var(name).map_err(|_| ConvertError::MissingEnv(name))
}

/// One-shot converter from the build's hex image to a UF2 image.
#[derive(Debug, Clone)]
pub struct Uf2Converter {
    interpreter: String,
    converter: PathBuf,
    hex_path: PathBuf,
    uf2_path: PathBuf,
}

impl Uf2Converter {
    /// Build the converter from the paths the build environment provides:
    /// `PROJECT_DIR`, `BUILD_DIR` and the `PIOENV` profile name.
    pub fn from_env() -> ConvertResult<Self> {
        let project_dir = require_env("PROJECT_DIR")?;
        let build_dir = require_env("BUILD_DIR")?;
        let pioenv = require_env("PIOENV")?;
        Ok(Self::new(project_dir, build_dir, pioenv))
    }

    pub fn new(
        project_dir: impl AsRef<Path>,
        build_dir: impl AsRef<Path>,
        pioenv: impl AsRef<str>,
    ) -> Self {
        let mut converter = project_dir.as_ref().to_path_buf();
        for segment in CONVERTER_RELATIVE_PATH {
            converter.push(segment);
        }

        let out_dir = build_dir.as_ref().join(pioenv.as_ref());

        Uf2Converter {
            interpreter: "python".to_string(),
            converter,
            hex_path: out_dir.join("firmware.hex"),
            uf2_path: out_dir.join("firmware.uf2"),
        }
    }

    /// Override the interpreter launching the converter script.
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn hex_path(&self) -> &Path {
        &self.hex_path
    }

    pub fn uf2_path(&self) -> &Path {
        &self.uf2_path
    }

    fn family_arg() -> String {
        format!("{:#010X}", NRF52840_FAMILY_ID)
    }

    /// Rendered command line, for logging only; execution passes an
    /// argument vector and never goes through a shell.
    pub fn command_display(&self) -> String {
        format!(
            "{} \"{}\" \"{}\" -c -f {} -o \"{}\"",
            self.interpreter,
            self.converter.display(),
            self.hex_path.display(),
            Self::family_arg(),
            self.uf2_path.display(),
        )
    }

    /// Run the conversion synchronously.
    ///
    /// Exit status 0 logs success naming the output path; any other status
    /// logs failure and is returned as `ConversionFailed` so the caller can
    /// propagate the code without panicking.
    pub fn convert(&self) -> ConvertResult<()> {
        if !self.converter.exists() {
            return Err(ConvertError::ConverterNotFound(
                self.converter.display().to_string(),
            ));
        }

        if !self.hex_path.exists() {
            log::warn!("hex image not found at {}", self.hex_path.display());
        }

        log::info!("converting HEX to UF2: {}", self.command_display());

        let status = Command::new(&self.interpreter)
            .arg(&self.converter)
            .arg(&self.hex_path)
            .args(["-c", "-f"])
            .arg(Self::family_arg())
            .arg("-o")
            .arg(&self.uf2_path)
            .status()?;

        match status.code() {
            Some(0) => {
                log::info!("UF2 image generated: {}", self.uf2_path.display());
                Ok(())
            }
            Some(code) => {
                log::error!("UF2 conversion failed with exit status {}", code);
                Err(ConvertError::ConversionFailed { status: code })
            }
            None => {
                log::error!("UF2 conversion terminated by signal");
                Err(ConvertError::ConversionFailed { status: 1 })
            }
        }
    }
}
