//! Logging initialization for the CLI.
//!
//! Library crates only emit `tracing` events; the subscriber lives here.
//! Everything goes to stderr so stdout stays reserved for command output.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
///
/// * `verbosity` - 0 = WARN, 1 = DEBUG, 2+ = TRACE for the `modpath` target
/// * `json` - emit one JSON object per event
///
/// `RUST_LOG` is honored; the verbosity flag is added on top of it.
pub fn init(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Ok(directive) = format!("modpath={level}").parse() {
        filter = filter.add_directive(directive);
    }
    if let Ok(directive) = format!("modpath_core={level}").parse() {
        filter = filter.add_directive(directive);
    }

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
