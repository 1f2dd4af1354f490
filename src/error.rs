//! Mapping of gateway and activity-log failures onto HTTP errors.

use bookstore_db::ActivityError;
use bookstore_http::error::AppError;
use bookstore_search::GatewayError;

/// Not-found becomes 404; every other kind (malformed response, backend
/// status, transport) becomes 500 while keeping its cause for the logs.
pub fn from_gateway(err: GatewayError) -> AppError {
    if err.is_not_found() {
        AppError::not_found(err.to_string())
    } else {
        AppError::Internal(anyhow::Error::new(err).context("search backend request failed"))
    }
}

pub fn from_activity(err: ActivityError) -> AppError {
    AppError::Internal(anyhow::Error::new(err).context("activity log request failed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn not_found_maps_to_404() {
        let err = from_gateway(GatewayError::book_not_found("abc"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("book 'abc'"));
    }

    #[test]
    fn other_gateway_errors_map_to_500() {
        let malformed = from_gateway(GatewayError::malformed("missing aggregation result"));
        assert_eq!(malformed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let backend = from_gateway(GatewayError::Backend {
            status: 503,
            body: "unavailable".to_string(),
        });
        assert_eq!(backend.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
