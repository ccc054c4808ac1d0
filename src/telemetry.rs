//! Tracing setup for processes embedding the reader

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "bookstore_reader=info";

/// Install a global fmt subscriber filtered by `RUST_LOG`
///
/// Falls back to `default_filter` (or [`DEFAULT_FILTER`]). Returns `false`
/// when a global subscriber was already installed.
pub fn init_tracing(default_filter: Option<&str>) -> bool {
    let fallback = default_filter.unwrap_or(DEFAULT_FILTER).to_string();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
