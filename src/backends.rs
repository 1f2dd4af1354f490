//! Construction of the shared backend clients from settings.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bookstore_db::{ActivityLog, InMemoryActivityLog, RedisActivityLog};
use bookstore_kernel::settings::{KvBackend, KvSettings, SearchBackend, SearchSettings};
use bookstore_search::{BookGateway, InMemoryGateway, OpenSearchGateway};

pub fn connect_gateway(settings: &SearchSettings) -> anyhow::Result<Arc<dyn BookGateway>> {
    match settings.backend {
        SearchBackend::OpenSearch => {
            tracing::info!(url = %settings.url, index = %settings.index, "using OpenSearch gateway");
            let gateway = OpenSearchGateway::connect(
                &settings.url,
                settings.index.clone(),
                Duration::from_millis(settings.timeout_ms),
            )
            .context("failed to configure search backend client")?;
            Ok(Arc::new(gateway))
        }
        SearchBackend::Memory => {
            tracing::warn!("using in-memory search gateway; books are lost on restart");
            Ok(Arc::new(InMemoryGateway::new()))
        }
    }
}

pub async fn connect_activity_log(settings: &KvSettings) -> anyhow::Result<Arc<dyn ActivityLog>> {
    match settings.backend {
        KvBackend::Redis => {
            tracing::info!(url = %settings.url, "using Redis activity log");
            let log = RedisActivityLog::connect(
                &settings.url,
                settings.key_prefix.clone(),
                Duration::from_millis(settings.timeout_ms),
            )
                .await
                .with_context(|| format!("failed to connect to key-value store at {}", settings.url))?;
            Ok(Arc::new(log))
        }
        KvBackend::Memory => {
            tracing::warn!("using in-memory activity log");
            Ok(Arc::new(InMemoryActivityLog::new()))
        }
    }
}
