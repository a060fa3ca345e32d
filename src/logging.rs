//! Logging setup
//!
//! Log lines go to stderr so they never interleave with prompts on stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Setup logging with the specified level, unless `RUST_LOG` is set
pub fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()
        .ok();
}
