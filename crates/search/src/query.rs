//! Request bodies sent to the search backend.
//!
//! Values are always serialized through `serde_json`, never spliced into
//! query strings.

use serde_json::{json, Value};

use crate::model::BookQuery;

/// Fixed page size for search results.
pub const SEARCH_PAGE_SIZE: usize = 120;

/// Name of the distinct-authors aggregation in stats responses.
pub const AUTHORS_DCOUNT_AGG: &str = "authors_dcount";

const AUTHORS_PRECISION_THRESHOLD: u32 = 120;

/// Index mapping for the book collection.
pub fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "title": { "type": "text" },
                "author_name": {
                    "type": "text",
                    "fields": {
                        "keyword": { "type": "keyword", "ignore_above": 256 }
                    }
                },
                "price": { "type": "float" },
                "ebook_available": { "type": "boolean" },
                "publish_date": { "type": "keyword" }
            }
        }
    })
}

/// Both phrases must match; the price range is a non-scoring filter with
/// inclusive bounds.
pub fn search_books(query: &BookQuery) -> Value {
    json!({
        "size": SEARCH_PAGE_SIZE,
        "query": {
            "bool": {
                "must": [
                    { "match_phrase": { "title": query.title } },
                    { "match_phrase": { "author_name": query.author_name } }
                ],
                "filter": [
                    {
                        "range": {
                            "price": {
                                "gte": query.min_price,
                                "lte": query.max_price
                            }
                        }
                    }
                ]
            }
        }
    })
}

/// Zero-hit query returning the total count and distinct author estimate.
pub fn store_stats() -> Value {
    json!({
        "size": 0,
        "track_total_hits": true,
        "query": { "match_all": {} },
        "aggs": {
            AUTHORS_DCOUNT_AGG: {
                "cardinality": {
                    "field": "author_name.keyword",
                    "precision_threshold": AUTHORS_PRECISION_THRESHOLD
                }
            }
        }
    })
}

/// Partial update touching only the title.
pub fn update_title(title: &str) -> Value {
    json!({ "doc": { "title": title } })
}
