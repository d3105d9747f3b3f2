//! Tracing setup for the CLI.
//!
//! Log lines go to stderr so stdout only carries dry-run commands and
//! summaries. `PKG_CLEANER_LOG` takes precedence over `--verbose`.

use std::env;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "PKG_CLEANER_LOG";

/// Map the `-v` count to a default filter directive.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init_logger(verbosity: u8) {
    let filter = env::var(LOG_ENV).unwrap_or_else(|_| default_directive(verbosity).to_string());
    let filter_layer = EnvFilter::new(filter);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(7), "debug");
    }
}
