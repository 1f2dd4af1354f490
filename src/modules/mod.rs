pub mod activity;
pub mod books;

use std::sync::Arc;
use std::time::Duration;

use bookstore_db::ActivityLog;
use bookstore_kernel::{settings::Settings, ModuleRegistry};
use bookstore_search::BookGateway;

/// Build the registry holding every application module
pub fn register_all(
    settings: &Settings,
    gateway: Arc<dyn BookGateway>,
    activity_log: Arc<dyn ActivityLog>,
) -> ModuleRegistry {
    let activity_deadline = Duration::from_millis(settings.kv.timeout_ms);

    let mut registry = ModuleRegistry::new();
    registry.register(books::create_module(gateway));
    registry.register(activity::create_module(activity_log, activity_deadline));
    registry
}
