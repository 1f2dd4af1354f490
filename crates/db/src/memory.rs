use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::activity::{UserActivity, RECENT_ACTIVITY_LIMIT};
use crate::error::ActivityError;
use crate::ActivityLog;

/// In-process activity log. Entries are kept encoded, as in the real store,
/// so reads go through the same decoding path.
#[derive(Default)]
pub struct InMemoryActivityLog {
    lists: Mutex<HashMap<String, VecDeque<String>>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a raw entry, bypassing encoding.
    pub async fn push_raw(&self, user: &str, raw: impl Into<String>) {
        let mut lists = self.lists.lock().await;
        let list = lists.entry(user.to_string()).or_default();
        list.push_front(raw.into());
        list.truncate(RECENT_ACTIVITY_LIMIT);
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn record(&self, user: &str, activity: &UserActivity) -> Result<(), ActivityError> {
        let encoded = activity.encode()?;
        self.push_raw(user, encoded).await;
        Ok(())
    }

    async fn recent(&self, user: &str) -> Result<Vec<UserActivity>, ActivityError> {
        let lists = self.lists.lock().await;
        Ok(lists
            .get(user)
            .map(|list| {
                list.iter()
                    .take(RECENT_ACTIVITY_LIMIT)
                    .map(|raw| UserActivity::decode_lossy(raw))
                    .collect()
            })
            .unwrap_or_default())
    }
}
