//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `level` is used as the filter directive when `RUST_LOG` is unset.
/// Fails if a global subscriber is already installed.
pub fn init(level: &str, json: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("minimotd={level}"))
        .unwrap_or_else(|_| EnvFilter::new("minimotd=info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_falls_back_on_garbage() {
        assert_eq!(default_filter("debug").to_string(), "minimotd=debug");
        assert_eq!(default_filter("not a level!!").to_string(), "minimotd=info");
    }
}
