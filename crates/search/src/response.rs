//! Mapping of search backend response bodies onto domain types.

use serde::Deserialize;
use serde_json::Value;

use crate::error::GatewayError;
use crate::model::{Book, NewBook, StoreStats};
use crate::query::AUTHORS_DCOUNT_AGG;

#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Option<Hits>,
    aggregations: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Hits {
    total: Option<TotalHits>,
    hits: Option<Vec<Document>>,
}

/// Older clusters report a bare number, newer ones `{value, relation}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            TotalHits::Count(value) | TotalHits::Object { value } => *value,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: Value, what: &str) -> Result<T, GatewayError> {
    serde_json::from_value(body).map_err(|err| GatewayError::malformed(format!("{what}: {err}")))
}

fn into_book(document: Document) -> Result<Book, GatewayError> {
    let source = document
        .source
        .ok_or_else(|| GatewayError::malformed(format!("document '{}' has no _source", document.id)))?;
    let book: NewBook = decode(source, "document _source")?;
    Ok(book.with_id(document.id))
}

/// Identifier assigned by an index (create) call.
pub fn created_id(body: Value) -> Result<String, GatewayError> {
    decode::<IndexResponse>(body, "index response").map(|response| response.id)
}

/// Book from a get-by-id response.
pub fn book(body: Value) -> Result<Book, GatewayError> {
    into_book(decode(body, "get response")?)
}

/// Books from a search response; a missing hit list is malformed, not empty.
pub fn search_hits(body: Value) -> Result<Vec<Book>, GatewayError> {
    let response: SearchResponse = decode(body, "search response")?;
    let hits = response
        .hits
        .and_then(|hits| hits.hits)
        .ok_or_else(|| GatewayError::malformed("search response has no hits"))?;

    hits.into_iter().map(into_book).collect()
}

/// Total count and distinct-author estimate from a stats response.
pub fn store_stats(body: Value) -> Result<StoreStats, GatewayError> {
    let response: SearchResponse = decode(body, "stats response")?;

    let count = response
        .hits
        .and_then(|hits| hits.total)
        .map(|total| total.value())
        .ok_or_else(|| GatewayError::malformed("stats response has no total hit count"))?;

    let dcount = response
        .aggregations
        .as_ref()
        .and_then(|aggs| aggs.get(AUTHORS_DCOUNT_AGG))
        .and_then(|agg| agg.get("value"))
        .and_then(Value::as_u64)
        .ok_or_else(|| GatewayError::malformed("missing aggregation result"))?;

    Ok(StoreStats { count, dcount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune_source() -> Value {
        json!({
            "title": "Dune",
            "author_name": "Frank Herbert",
            "price": 9.99,
            "ebook_available": true,
            "publish_date": "1965-08-01"
        })
    }

    #[test]
    fn get_response_attaches_id() {
        let book = book(json!({
            "_index": "books",
            "_id": "abc",
            "found": true,
            "_source": dune_source()
        }))
        .unwrap();

        assert_eq!(book.id, "abc");
        assert_eq!(book.title, "Dune");
        assert!(book.ebook_available);
    }

    #[test]
    fn get_response_without_source_is_malformed() {
        let err = book(json!({ "_id": "abc", "found": true })).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }

    #[test]
    fn index_response_yields_id() {
        let id = created_id(json!({ "_id": "xyz", "result": "created" })).unwrap();
        assert_eq!(id, "xyz");
    }

    #[test]
    fn search_hits_map_to_books() {
        let books = search_hits(json!({
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [{ "_id": "1", "_score": 2.3, "_source": dune_source() }]
            }
        }))
        .unwrap();

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, "1");
        assert_eq!(books[0].author_name, "Frank Herbert");
    }

    #[test]
    fn empty_hit_list_is_empty_result() {
        let books = search_hits(json!({ "hits": { "total": 0, "hits": [] } })).unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn absent_hit_list_is_malformed() {
        let err = search_hits(json!({ "took": 3 })).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));

        let err = search_hits(json!({ "hits": { "total": 0 } })).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }

    #[test]
    fn stats_accept_both_total_shapes() {
        let legacy = store_stats(json!({
            "hits": { "total": 7, "hits": [] },
            "aggregations": { "authors_dcount": { "value": 3 } }
        }))
        .unwrap();
        assert_eq!(legacy, StoreStats { count: 7, dcount: 3 });

        let current = store_stats(json!({
            "hits": { "total": { "value": 12, "relation": "eq" }, "hits": [] },
            "aggregations": { "authors_dcount": { "value": 5 } }
        }))
        .unwrap();
        assert_eq!(current, StoreStats { count: 12, dcount: 5 });
    }

    #[test]
    fn stats_without_aggregation_is_malformed() {
        let err = store_stats(json!({
            "hits": { "total": 7, "hits": [] }
        }))
        .unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }
}
