use std::sync::Arc;
use std::time::Duration;

use bookstore_db::{within, ActivityError, ActivityLog, UserActivity};

/// Activity log shared by the recorder and the read endpoint. Every call
/// gives up after `deadline` so a stalled store cannot hold requests.
#[derive(Clone)]
pub struct ActivityStore {
    log: Arc<dyn ActivityLog>,
    deadline: Duration,
}

impl ActivityStore {
    pub fn new(log: Arc<dyn ActivityLog>, deadline: Duration) -> Self {
        Self { log, deadline }
    }

    pub async fn record(&self, user: &str, activity: &UserActivity) -> Result<(), ActivityError> {
        within(self.deadline, self.log.record(user, activity)).await
    }

    pub async fn recent(&self, user: &str) -> Result<Vec<UserActivity>, ActivityError> {
        within(self.deadline, self.log.recent(user)).await
    }

    pub async fn ping(&self) -> Result<(), ActivityError> {
        within(self.deadline, self.log.ping()).await
    }
}
