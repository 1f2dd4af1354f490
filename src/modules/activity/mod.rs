pub mod middleware;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use bookstore_db::{ActivityLog, UserActivity};
use bookstore_http::error::AppError;
use bookstore_kernel::{InitCtx, Module};
use serde_json::json;

use crate::error::from_activity;
use self::middleware::{UserParam, ACTIVITY_PATH};
use self::store::ActivityStore;

/// Activity module: per-user log of the most recent requests
pub struct ActivityModule {
    store: ActivityStore,
}

impl ActivityModule {
    pub fn new(log: Arc<dyn ActivityLog>, deadline: Duration) -> Self {
        Self {
            store: ActivityStore::new(log, deadline),
        }
    }
}

#[async_trait]
impl Module for ActivityModule {
    fn name(&self) -> &'static str {
        "activity"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.store.ping().await?;
        tracing::info!(module = self.name(), "activity module initialized");
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(ACTIVITY_PATH, get(recent_activity))
            .with_state(self.store.clone())
    }

    fn wrap(&self, router: Router) -> Router {
        router.layer(axum::middleware::from_fn_with_state(
            self.store.clone(),
            middleware::record_activity,
        ))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/activity": {
                    "get": {
                        "summary": "Most recent requests of a user, newest first",
                        "tags": ["Activity"],
                        "parameters": [{
                            "name": "user",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Up to three activity records",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/UserActivity" }
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Malformed query string",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "500": {
                                "description": "Key-value store failure",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "UserActivity": {
                        "type": "object",
                        "properties": {
                            "method": { "type": "string" },
                            "request_uri": { "type": "string" }
                        },
                        "required": ["method", "request_uri"]
                    }
                }
            }
        }))
    }
}

/// `GET /activity?user=`
async fn recent_activity(
    State(store): State<ActivityStore>,
    params: Result<Query<UserParam>, QueryRejection>,
) -> Result<Json<Vec<UserActivity>>, AppError> {
    let Query(param) = params.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let Some(user) = param.user.filter(|user| !user.is_empty()) else {
        return Ok(Json(Vec::new()));
    };

    let recent = store.recent(&user).await.map_err(from_activity)?;
    Ok(Json(recent))
}

/// Create a new instance of the activity module
pub fn create_module(log: Arc<dyn ActivityLog>, deadline: Duration) -> Arc<dyn Module> {
    Arc::new(ActivityModule::new(log, deadline))
}
