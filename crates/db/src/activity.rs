use serde::{Deserialize, Serialize};

/// Number of entries retained per user.
pub const RECENT_ACTIVITY_LIMIT: usize = 3;

/// One logged request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivity {
    pub method: String,
    pub request_uri: String,
}

impl UserActivity {
    pub fn new(method: impl Into<String>, request_uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            request_uri: request_uri.into(),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a stored entry. Entries that do not parse are zero-filled so
    /// the remaining slots keep their positions.
    pub fn decode_lossy(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "undecodable activity entry, substituting empty record");
            Self::default()
        })
    }
}
