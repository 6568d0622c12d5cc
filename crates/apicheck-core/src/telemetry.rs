//! Diagnostics subscriber for the apicheck binary.
//!
//! Result lines own stdout, so every diagnostic goes to stderr.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn filter_for(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber: JSON lines when `json` is set, plain text
/// otherwise. `RUST_LOG` wins over `level`. Returns `false` if a subscriber
/// was already installed.
pub fn init_tracing(json: bool, level: Level) -> bool {
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .is_ok()
}
