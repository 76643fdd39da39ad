//! Stderr logger backing the `log` crate macros.
//!
//! Every binary wires this in first thing in `main()` via [`init`], so all
//! `log::info!()`, `log::warn!()`, `log::error!()` calls from the library are
//! routed to stderr with a level and target prefix.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] [{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Register the stderr logger at the default Info level.
pub fn init() {
    init_with_level(LevelFilter::Info);
}

/// Register the stderr logger with an explicit max level.
///
/// A second call is a no-op; the logger can only be installed once per
/// process (tests touch this path when multiple cases call `init`).
pub fn init_with_level(level: LevelFilter) {
    if log::set_boxed_logger(Box::new(StderrLogger))
        .map(|()| log::set_max_level(level))
        .is_err()
    {
        log::set_max_level(level);
    }
}
