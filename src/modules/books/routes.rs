use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use bookstore_http::error::AppError;
use bookstore_search::{Book, BookGateway, NewBook, StoreStats};

use super::models::{validate_new_book, SearchParams, UpdateTitleParams};
use crate::error::from_gateway;

pub type Gateway = Arc<dyn BookGateway>;

/// `PUT /book`: index a new book, respond with its generated id.
pub async fn add_book(
    State(gateway): State<Gateway>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<Json<String>, AppError> {
    let Json(book) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    validate_new_book(&book)?;

    let id = gateway.add_book(&book).await.map_err(from_gateway)?;
    tracing::info!(%id, title = %book.title, "book added");
    Ok(Json(id))
}

/// `GET /book/{id}`
pub async fn get_book(
    State(gateway): State<Gateway>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let book = gateway.get_book(&id).await.map_err(from_gateway)?;
    Ok(Json(book))
}

/// `POST /book/{id}?title=`: change the title only.
pub async fn update_book_title(
    State(gateway): State<Gateway>,
    Path(id): Path<String>,
    Query(params): Query<UpdateTitleParams>,
) -> Result<Json<&'static str>, AppError> {
    gateway
        .update_book_title(&id, &params.title)
        .await
        .map_err(from_gateway)?;
    Ok(Json("success"))
}

/// `DELETE /book/{id}`
pub async fn delete_book(
    State(gateway): State<Gateway>,
    Path(id): Path<String>,
) -> Result<Json<&'static str>, AppError> {
    gateway.delete_book(&id).await.map_err(from_gateway)?;
    tracing::info!(%id, "book deleted");
    Ok(Json("deleted"))
}

/// `GET /search`: price bounds are validated before the backend is called.
pub async fn search_books(
    State(gateway): State<Gateway>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let query = params.into_query()?;

    let books = gateway.search_books(&query).await.map_err(from_gateway)?;
    tracing::debug!(hits = books.len(), "search completed");
    Ok(Json(books))
}

/// `GET /store`
pub async fn store_stats(State(gateway): State<Gateway>) -> Result<Json<StoreStats>, AppError> {
    let stats = gateway.store_stats().await.map_err(from_gateway)?;
    Ok(Json(stats))
}
