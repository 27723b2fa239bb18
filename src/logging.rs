use log::{debug, error, info, log_enabled, warn, Level, LevelFilter};

/// Initializes the logger with the `env_logger` crate.
///
/// Honours `RUST_LOG`. Calling it more than once is harmless.
pub fn init_logger() {
    let _ = env_logger::try_init();
}

/// Initializes the logger with a default level, still overridable by `RUST_LOG`.
///
/// Used by the command-line driver, which logs to stderr so stdout carries
/// only filtered output.
pub fn init_logger_with_level(level: LevelFilter) {
    let result = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .try_init();
    if result.is_err() {
        debug!("Logger already initialized, keeping existing configuration");
    }
}

/// Maps the number of `-v` flags to a level filter.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logs an error message.
pub fn log_error(message: &str) {
    if log_enabled!(Level::Error) {
        error!("{message}");
    }
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}
