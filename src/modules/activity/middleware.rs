use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use bookstore_db::UserActivity;
use serde::Deserialize;

use super::store::ActivityStore;

/// Path of the activity read endpoint; requests to it are never recorded.
pub const ACTIVITY_PATH: &str = "/activity";

#[derive(Debug, Default, Deserialize)]
pub struct UserParam {
    pub user: Option<String>,
}

/// The `user` query parameter, if present and non-empty.
pub fn user_of(request: &Request) -> Option<String> {
    Query::<UserParam>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(param)| param.user)
        .filter(|user| !user.is_empty())
}

/// The user to record under and the `{method, uri}` entry, unless the
/// request is exempt.
fn activity_of(request: &Request) -> Option<(String, UserActivity)> {
    if request.uri().path() == ACTIVITY_PATH {
        return None;
    }
    let user = user_of(request)?;
    let request_uri = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    Some((user, UserActivity::new(request.method().as_str(), request_uri)))
}

/// Record the request for its user while the request itself is served.
/// Failures are logged and otherwise ignored.
pub async fn record_activity(
    State(store): State<ActivityStore>,
    request: Request,
    next: Next,
) -> Response {
    let Some((user, activity)) = activity_of(&request) else {
        return next.run(request).await;
    };

    let record = async {
        if let Err(err) = store.record(&user, &activity).await {
            tracing::warn!(error = %err, %user, "failed to record user activity");
        }
    };

    let ((), response) = tokio::join!(record, next.run(request));
    response
}
