//! Search gateway for the book collection.
//!
//! [`BookGateway`] is the seam between HTTP handlers and the search backend.
//! [`OpenSearchGateway`] talks to a real cluster; [`InMemoryGateway`] keeps
//! the same semantics in process.

use async_trait::async_trait;

pub mod error;
pub mod memory;
pub mod model;
pub mod opensearch_engine;
pub mod query;
pub mod response;

pub use error::GatewayError;
pub use memory::InMemoryGateway;
pub use model::{Book, BookQuery, NewBook, StoreStats};
pub use opensearch_engine::OpenSearchGateway;

#[async_trait]
pub trait BookGateway: Send + Sync {
    /// Create the book index with its mapping if it does not exist yet.
    async fn ensure_index(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    /// Index a new book and return the identifier the backend assigned.
    async fn add_book(&self, book: &NewBook) -> Result<String, GatewayError>;

    async fn get_book(&self, id: &str) -> Result<Book, GatewayError>;

    /// Partial update of the title; every other field is left untouched.
    async fn update_book_title(&self, id: &str, title: &str) -> Result<(), GatewayError>;

    async fn delete_book(&self, id: &str) -> Result<(), GatewayError>;

    async fn search_books(&self, query: &BookQuery) -> Result<Vec<Book>, GatewayError>;

    async fn store_stats(&self) -> Result<StoreStats, GatewayError>;
}
