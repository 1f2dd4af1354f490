use thiserror::Error;

/// Failures surfaced by a [`BookGateway`](crate::BookGateway).
///
/// The kinds stay distinct even though the HTTP layer only separates
/// not-found from everything else.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("malformed search backend response: {0}")]
    MalformedResponse(String),

    #[error("search backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("search backend unreachable: {0}")]
    Transport(#[from] opensearch::Error),

    #[error("invalid search backend configuration: {0}")]
    InvalidConfig(String),
}

impl GatewayError {
    pub fn book_not_found(id: &str) -> Self {
        Self::NotFound {
            resource: format!("book '{id}'"),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
