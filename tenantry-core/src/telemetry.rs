//! Tracing subscriber bootstrap.
//!
//! Library code only emits `tracing` events; binaries and test harnesses call
//! [`init_tracing`] once to see them.

use crate::{ConfigError, TenantryResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "tenantry_core=debug,tenantry_task=debug,tenantry_cache=debug,info";

/// Output format for the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install a global subscriber with an `EnvFilter` and a fmt layer.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> TenantryResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_layer = (format == LogFormat::Json).then(|| tracing_subscriber::fmt::layer().json());
    let pretty_layer = (format == LogFormat::Pretty).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| ConfigError::TelemetryInit {
            reason: e.to_string(),
        })?;

    tracing::info!(?format, "Tracing initialized");
    Ok(())
}
