use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::GatewayError;
use crate::model::{Book, BookQuery, NewBook, StoreStats};
use crate::query::SEARCH_PAGE_SIZE;
use crate::BookGateway;

/// In-process gateway with the same matching rules as the search backend.
///
/// Used for local development without a cluster and in tests.
#[derive(Default)]
pub struct InMemoryGateway {
    // Zero-padded sequence keys keep iteration in insertion order.
    books: RwLock<BTreeMap<String, NewBook>>,
    next_id: AtomicU64,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Lowercased alphanumeric tokens, roughly what the standard analyzer emits.
fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True when every token of `phrase` appears contiguously and in order in
/// `field`. A phrase without tokens matches nothing.
pub fn phrase_matches(field: &str, phrase: &str) -> bool {
    let needle = tokens(phrase);
    if needle.is_empty() {
        return false;
    }
    let haystack = tokens(field);
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}

fn satisfies(book: &NewBook, query: &BookQuery) -> bool {
    phrase_matches(&book.title, &query.title)
        && phrase_matches(&book.author_name, &query.author_name)
        && book.price >= query.min_price
        && book.price <= query.max_price
}

#[async_trait]
impl BookGateway for InMemoryGateway {
    async fn add_book(&self, book: &NewBook) -> Result<String, GatewayError> {
        let id = format!("{:020}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.books.write().await.insert(id.clone(), book.clone());
        Ok(id)
    }

    async fn get_book(&self, id: &str) -> Result<Book, GatewayError> {
        self.books
            .read()
            .await
            .get(id)
            .cloned()
            .map(|book| book.with_id(id))
            .ok_or_else(|| GatewayError::book_not_found(id))
    }

    async fn update_book_title(&self, id: &str, title: &str) -> Result<(), GatewayError> {
        let mut books = self.books.write().await;
        let book = books
            .get_mut(id)
            .ok_or_else(|| GatewayError::book_not_found(id))?;
        book.title = title.to_string();
        Ok(())
    }

    async fn delete_book(&self, id: &str) -> Result<(), GatewayError> {
        self.books
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::book_not_found(id))
    }

    async fn search_books(&self, criteria: &BookQuery) -> Result<Vec<Book>, GatewayError> {
        let books = self.books.read().await;
        Ok(books
            .iter()
            .filter(|(_, book)| satisfies(book, criteria))
            .take(SEARCH_PAGE_SIZE)
            .map(|(id, book)| book.clone().with_id(id.as_str()))
            .collect())
    }

    async fn store_stats(&self) -> Result<StoreStats, GatewayError> {
        let books = self.books.read().await;
        let authors: HashSet<&str> = books.values().map(|book| book.author_name.as_str()).collect();
        Ok(StoreStats {
            count: books.len() as u64,
            dcount: authors.len() as u64,
        })
    }
}
