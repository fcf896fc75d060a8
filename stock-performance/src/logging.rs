use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable selecting JSON log output when set to `json`.
pub const LOG_FORMAT_ENV: &str = "STOCK_PERFORMANCE_LOG_FORMAT";

/// Initialise default non-JSON logging, filtered by `RUST_LOG` (default INFO).
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(cfg!(debug_assertions)))
        .init()
}

/// Initialise default JSON logging, filtered by `RUST_LOG` (default INFO).
pub fn init_json_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .init()
}

/// Initialise JSON or non-JSON logging depending on [`LOG_FORMAT_ENV`].
pub fn init_logging_from_env() {
    match std::env::var(LOG_FORMAT_ENV) {
        Ok(format) if format.eq_ignore_ascii_case("json") => init_json_logging(),
        _ => init_logging(),
    }
}
