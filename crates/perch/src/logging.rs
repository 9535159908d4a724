//! Logger setup.
//!
//! Everything in the crate logs through the `log` facade. Binaries call
//! [`init_logger`] once at startup to print those records to stderr,
//! filtered by `RUST_LOG`:
//!
//! ```text
//! RUST_LOG=perch=debug          configuration changes, despawns, reaping
//! RUST_LOG=perch::physics=trace per-tick StepStats
//! ```

use log::LevelFilter;

/// Install an env_logger configured from `RUST_LOG`, defaulting to `info`.
///
/// Returns `false` if some logger was already installed; the existing one
/// stays in place.
pub fn init_logger() -> bool {
    init_logger_with(LevelFilter::Info)
}

/// Like [`init_logger`], with `default` used when `RUST_LOG` is unset.
pub fn init_logger_with(default: LevelFilter) -> bool {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default).parse_default_env();
    let logger = builder.build();
    let max_level = logger.filter();

    if log::set_boxed_logger(Box::new(logger)).is_err() {
        eprintln!("[perch] Warning: a logger is already set, keeping it.");
        return false;
    }
    log::set_max_level(max_level);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_refused() {
        init_logger_with(LevelFilter::Debug);
        assert!(!init_logger());
        log::debug!("logger still works");
    }
}
