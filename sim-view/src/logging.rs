//! Logging initialization.

/// Initialize the logging system.
///
/// Uses env_logger with a default filter of `info`; override with
/// `RUST_LOG`, e.g. `RUST_LOG=sim_core=debug` to see growth events.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
