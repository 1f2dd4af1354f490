pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{get, put},
    Router,
};
use bookstore_kernel::{InitCtx, Module};
use bookstore_search::BookGateway;
use serde_json::json;

/// Books module: CRUD, search and store statistics over the search gateway
pub struct BooksModule {
    gateway: Arc<dyn BookGateway>,
}

impl BooksModule {
    pub fn new(gateway: Arc<dyn BookGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.gateway.ensure_index().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            index = %ctx.settings.search.index,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/book", put(routes::add_book))
            .route(
                "/book/{id}",
                get(routes::get_book)
                    .post(routes::update_book_title)
                    .delete(routes::delete_book),
            )
            .route("/search", get(routes::search_books))
            .route("/store", get(routes::store_stats))
            .with_state(self.gateway.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let query_param = |name: &str, ty: &str, required: bool| {
            json!({
                "name": name,
                "in": "query",
                "required": required,
                "schema": { "type": ty }
            })
        };
        let plain_json = |description: &str, schema: serde_json::Value| {
            json!({
                "description": description,
                "content": { "application/json": { "schema": schema } }
            })
        };

        Some(json!({
            "paths": {
                "/book": {
                    "put": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": plain_json("Generated book id", json!({ "type": "string" })),
                            "400": error("Invalid book payload"),
                            "500": error("Search backend failure")
                        }
                    }
                },
                "/book/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": plain_json("The book", json!({ "$ref": "#/components/schemas/Book" })),
                            "404": error("Book not found"),
                            "500": error("Search backend failure")
                        }
                    },
                    "post": {
                        "summary": "Update a book's title",
                        "tags": ["Books"],
                        "parameters": [id_param.clone(), query_param("title", "string", false)],
                        "responses": {
                            "200": plain_json("Updated", json!({ "type": "string", "enum": ["success"] })),
                            "404": error("Book not found"),
                            "500": error("Search backend failure")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": plain_json("Deleted", json!({ "type": "string", "enum": ["deleted"] })),
                            "404": error("Book not found"),
                            "500": error("Search backend failure")
                        }
                    }
                },
                "/search": {
                    "get": {
                        "summary": "Search books by title and author phrase within a price range",
                        "tags": ["Books"],
                        "parameters": [
                            query_param("title", "string", false),
                            query_param("author", "string", false),
                            query_param("min-price", "number", true),
                            query_param("max-price", "number", true)
                        ],
                        "responses": {
                            "200": plain_json(
                                "Matching books",
                                json!({ "type": "array", "items": { "$ref": "#/components/schemas/Book" } })
                            ),
                            "400": error("Invalid price bound"),
                            "500": error("Search backend failure")
                        }
                    }
                },
                "/store": {
                    "get": {
                        "summary": "Book count and distinct author count",
                        "tags": ["Store"],
                        "responses": {
                            "200": plain_json("Store statistics", json!({ "$ref": "#/components/schemas/StoreStats" })),
                            "500": error("Search backend failure")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "NewBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author_name": { "type": "string" },
                            "price": { "type": "number" },
                            "ebook_available": { "type": "boolean" },
                            "publish_date": { "type": "string" }
                        },
                        "required": ["title", "author_name", "price"]
                    },
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "string",
                                "description": "Identifier assigned by the search backend"
                            },
                            "title": { "type": "string" },
                            "author_name": { "type": "string" },
                            "price": { "type": "number" },
                            "ebook_available": { "type": "boolean" },
                            "publish_date": { "type": "string" }
                        },
                        "required": ["id", "title", "author_name", "price", "ebook_available", "publish_date"]
                    },
                    "StoreStats": {
                        "type": "object",
                        "properties": {
                            "count": { "type": "integer", "description": "Indexed books" },
                            "dcount": { "type": "integer", "description": "Approximate distinct authors" }
                        },
                        "required": ["count", "dcount"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(gateway: Arc<dyn BookGateway>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(gateway))
}
