//! Tracing Setup
//!
//! Installs a `tracing-subscriber` formatter for the binary.
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides the configured level when set
//! - `observability.logging.format`: `pretty`, `compact` or `json`
//!
//! # Usage
//!
//! ```rust,ignore
//! use lineup_engine::telemetry::init_tracing;
//!
//! let config = load_config(None)?;
//! init_tracing(&config.observability.logging);
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        _ => builder.compact().try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {e}");
        return;
    }

    tracing::debug!(
        level = %config.level,
        format = %config.format,
        "Tracing initialized"
    );
}
