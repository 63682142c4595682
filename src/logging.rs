//! Diagnostic logging setup.
//!
//! User-facing progress goes through [`crate::output`] on stdout; this is
//! the `tracing` side channel on stderr. `RUST_LOG` wins when set,
//! otherwise `-v` selects `debug` and the default is `warn`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
