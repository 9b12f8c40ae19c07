//! Tracing setup for binaries and tests that embed the segmenter
//!
//! The library itself only emits events. `RUST_LOG` overrides the default
//! filter, e.g. `RUST_LOG=mp3seg=trace` to follow scanner windows. Output
//! goes to stderr so it never mixes with a program's stdout.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Install a fmt subscriber at `info` unless `RUST_LOG` says otherwise
///
/// Returns `false` when a global subscriber was already installed.
pub fn init() -> bool {
    init_with_filter("info")
}

/// Install a fmt subscriber with `default_filter` as the fallback directive
pub fn init_with_filter(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    subscriber(filter, std::io::stderr).try_init().is_ok()
}

fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
}
