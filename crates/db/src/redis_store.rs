use async_trait::async_trait;
use std::time::Duration;

use redis::aio::ConnectionManager;

use crate::activity::{UserActivity, RECENT_ACTIVITY_LIMIT};
use crate::error::ActivityError;
use crate::{within, ActivityLog};

/// Open a Redis client and its multiplexed, auto-reconnecting connection.
/// An unreachable server fails once `deadline` has passed.
pub async fn connect(url: &str, deadline: Duration) -> Result<ConnectionManager, ActivityError> {
    let client = redis::Client::open(url)?;
    within(deadline, async { Ok(client.get_connection_manager().await?) }).await
}

/// Activity log stored as one Redis list per user.
pub struct RedisActivityLog {
    manager: ConnectionManager,
    key_prefix: String,
}

impl RedisActivityLog {
    pub fn new(manager: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            manager,
            key_prefix: key_prefix.into(),
        }
    }

    pub async fn connect(
        url: &str,
        key_prefix: impl Into<String>,
        deadline: Duration,
    ) -> Result<Self, ActivityError> {
        Ok(Self::new(connect(url, deadline).await?, key_prefix))
    }

    fn key(&self, user: &str) -> String {
        format!("{}{}", self.key_prefix, user)
    }
}

/// Index of the last retained element, for LTRIM/LRANGE.
const LAST_INDEX: isize = RECENT_ACTIVITY_LIMIT as isize - 1;

/// Prepend and truncate in one MULTI/EXEC block.
fn record_pipeline(key: &str, encoded: String) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .lpush(key, encoded)
        .ignore()
        .ltrim(key, 0, LAST_INDEX)
        .ignore();
    pipe
}

fn recent_command(key: &str) -> redis::Cmd {
    let mut cmd = redis::cmd("LRANGE");
    cmd.arg(key).arg(0).arg(LAST_INDEX);
    cmd
}

#[async_trait]
impl ActivityLog for RedisActivityLog {
    async fn record(&self, user: &str, activity: &UserActivity) -> Result<(), ActivityError> {
        let key = self.key(user);
        let encoded = activity.encode()?;
        let mut conn = self.manager.clone();

        let _: () = record_pipeline(&key, encoded)
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn recent(&self, user: &str) -> Result<Vec<UserActivity>, ActivityError> {
        let mut conn = self.manager.clone();
        let raw: Vec<String> = recent_command(&self.key(user))
            .query_async(&mut conn)
            .await?;

        Ok(raw
            .iter()
            .map(|entry| UserActivity::decode_lossy(entry))
            .collect())
    }

    async fn ping(&self) -> Result<(), ActivityError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
