//! Logger setup.
//!
//! Library code only talks to the `log` facade; the binary and the
//! integration tests call [`init`] once to route records to `env_logger`.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Level used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger.
///
/// `RUST_LOG` overrides the verbosity flag. Returns `false` when a logger was
/// already installed, which makes repeated calls harmless.
pub fn init(verbose: bool) -> bool {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}
