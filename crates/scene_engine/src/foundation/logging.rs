//! Logging setup
//!
//! The library only talks to the `log` facade. Binaries pick the backend by
//! calling one of the initialisers here once at startup.

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a default filter (e.g. `"scene_engine=debug"`)
///
/// `RUST_LOG` still wins when it is set. Calling this twice is harmless; the
/// second logger is rejected and the error is ignored.
pub fn init_with_filter(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
