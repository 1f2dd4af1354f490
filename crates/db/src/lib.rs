//! Key-value store access for the bounded per-user activity log.
//!
//! Each user owns a list holding the most recent requests, newest first.
//! Writes prepend and truncate; reads take the head of the list.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

pub mod activity;
pub mod error;
pub mod memory;
pub mod redis_store;

pub use activity::{UserActivity, RECENT_ACTIVITY_LIMIT};
pub use error::ActivityError;
pub use memory::InMemoryActivityLog;
pub use redis_store::RedisActivityLog;
pub use redis::RedisError;

#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Prepend `activity` to the user's list and drop everything past the
    /// retention limit.
    async fn record(&self, user: &str, activity: &UserActivity) -> Result<(), ActivityError>;

    /// Up to [`RECENT_ACTIVITY_LIMIT`] entries, newest first.
    async fn recent(&self, user: &str) -> Result<Vec<UserActivity>, ActivityError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), ActivityError> {
        Ok(())
    }
}

/// Run a store call under `deadline`; a call still pending when it passes
/// is dropped and reported as [`ActivityError::Timeout`].
pub async fn within<T, F>(deadline: Duration, call: F) -> Result<T, ActivityError>
where
    F: Future<Output = Result<T, ActivityError>>,
{
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| ActivityError::Timeout(deadline))?
}
