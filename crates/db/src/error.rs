use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActivityError {
    #[error("key-value store error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("failed to encode activity record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("key-value store did not answer within {0:?}")]
    Timeout(Duration),
}
