//! Logging and tracing bootstrap.

use bookstore_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter. Calling this twice is harmless:
/// the second call leaves the first subscriber in place.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match settings.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .is_ok(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::info!(
            target: "bookstore-telemetry",
            log_format = ?settings.log_format,
            "logging initialized"
        );
    }

    Ok(())
}
