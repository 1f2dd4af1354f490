//! Bookstore application library
//!
//! Wires the search gateway and the activity log into HTTP modules and runs
//! the server.

pub mod backends;
pub mod error;
pub mod modules;

use anyhow::Context;
use bookstore_kernel::{settings::Settings, InitCtx};

/// Load settings, connect backends, and serve until shutdown
pub async fn run() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)
        .with_context(|| "failed to initialize telemetry")?;

    tracing::info!(
        env = ?settings.environment,
        search = %settings.search.url,
        kv = %settings.kv.url,
        "bookstore bootstrap starting"
    );

    let gateway = backends::connect_gateway(&settings.search)?;
    let activity_log = backends::connect_activity_log(&settings.kv).await?;

    let registry = modules::register_all(&settings, gateway, activity_log);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookstore_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    served
}
