use serde::{Deserialize, Serialize};

/// A book as submitted by a client or stored in the index.
///
/// The identifier is never part of the document; the backend assigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author_name: String,
    pub price: f64,
    #[serde(default)]
    pub ebook_available: bool,
    #[serde(default)]
    pub publish_date: String,
}

impl NewBook {
    /// Attach a backend-assigned identifier.
    pub fn with_id(self, id: impl Into<String>) -> Book {
        Book {
            id: id.into(),
            title: self.title,
            author_name: self.author_name,
            price: self.price,
            ebook_available: self.ebook_available,
            publish_date: self.publish_date,
        }
    }
}

/// A persisted book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author_name: String,
    pub price: f64,
    pub ebook_available: bool,
    pub publish_date: String,
}

/// Phrase filters on title and author combined with an inclusive price range.
#[derive(Debug, Clone, PartialEq)]
pub struct BookQuery {
    pub title: String,
    pub author_name: String,
    pub min_price: f64,
    pub max_price: f64,
}

/// Aggregate figures over the whole index, computed per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub count: u64,
    pub dcount: u64,
}
