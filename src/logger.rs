//! Logging setup for the binary and the demos
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// Resolve the log level: explicit argument, then `RUST_LOG`, then info.
pub fn log_level(level: Option<&str>) -> LevelFilter {
    level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|v| v.parse::<LevelFilter>().ok())
        })
        .unwrap_or(LevelFilter::Info)
}

/// Initialize logging to stdout
///
/// A second call leaves the first logger in place.
///
/// # Example
/// ```
/// use rustcfd::logger::init_logging;
/// init_logging(Some("debug"));
/// ```
pub fn init_logging(level: Option<&str>) {
    let level = log_level(level);
    let result = Builder::new()
        .filter_level(level)
        .target(Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
    match result {
        Ok(()) => log::debug!("Logging initialized (level: {})", level),
        Err(_) => log::debug!("Logger already initialized"),
    }
}
