//! Post-build hook: convert the compiled firmware.hex to firmware.uf2.
//!
//! Exits with the external converter's status so the surrounding build
//! pipeline sees the conversion result directly.

use std::process;

use sesfix::{ConvertError, Uf2Converter};

fn main() {
    sesfix::logger::init();

    let converter = match Uf2Converter::from_env() {
        Ok(converter) => converter,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    match converter.convert() {
        Ok(()) => {}
        Err(ConvertError::ConversionFailed { status }) => process::exit(status),
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}
