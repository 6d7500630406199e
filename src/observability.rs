//! Tracing subscriber setup for hosts that have none of their own.
//!
//! The library itself only emits `tracing` events: a `debug` span per
//! dispatch, `debug` events for mode changes, `trace` for ignored stimuli and
//! missing actions, and `warn` for failing actions. Hosts that already
//! install a subscriber should not call [`init_tracing`].

use crate::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a formatting subscriber on stderr.
///
/// The filter is read from `RUST_LOG` when set, then from
/// `config.trace_level`, and falls back to `"info"`.
///
/// Idempotent: only the first call in a process takes effect.
///
/// # Example
///
/// ```rust
/// use modeset::config::Config;
/// use modeset::observability::init_tracing;
///
/// let config = Config {
///     trace_level: Some("modeset=debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or("info"))
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let _ = subscriber.try_init();
}
