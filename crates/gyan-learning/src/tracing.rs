//! Log output for the adaptive pipeline.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Install the global subscriber.
///
/// Development prints pretty logs with per-submission debug events from the
/// gyan crates; production emits flattened JSON at `info`, so student ids,
/// topics and difficulty moves land as top-level fields. `RUST_LOG`
/// overrides either default.
pub fn init_tracing(env: &Environment) {
    if env.is_development() {
        init_development_tracing();
    } else {
        init_production_tracing();
    }
}

/// Pretty, multi-line events with file and line
fn init_development_tracing() {
    let filter = env_filter(DEVELOPMENT_FILTER);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .pretty()
                .with_filter(filter),
        )
        .init();

    tracing::info!(env = "development", "Logging initialized");
}

/// One JSON object per event
fn init_production_tracing() {
    let filter = env_filter(PRODUCTION_FILTER);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .flatten_event(true)
                .with_target(true)
                .with_filter(filter),
        )
        .init();

    tracing::info!(env = "production", "Logging initialized");
}

/// `RUST_LOG` when set and valid, otherwise `default`
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

const DEVELOPMENT_FILTER: &str = "info,gyan_learning=debug,gyan_db=debug,gyan_migrate=debug,sqlx=warn";
const PRODUCTION_FILTER: &str = "info,sqlx=warn";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_filter_targets_gyan_crates() {
        for target in ["gyan_learning=debug", "gyan_db=debug", "gyan_migrate=debug"] {
            assert!(DEVELOPMENT_FILTER.contains(target));
        }
        assert!(!PRODUCTION_FILTER.contains("debug"));
    }

    #[test]
    fn test_default_filters_parse() {
        assert!(EnvFilter::try_new(DEVELOPMENT_FILTER).is_ok());
        assert!(EnvFilter::try_new(PRODUCTION_FILTER).is_ok());
    }
}
