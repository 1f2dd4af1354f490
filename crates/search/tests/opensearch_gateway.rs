//! OpenSearch gateway against a mock cluster.

use std::time::Duration;

use bookstore_search::{BookGateway, BookQuery, GatewayError, NewBook, OpenSearchGateway};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> OpenSearchGateway {
    OpenSearchGateway::connect(&server.uri(), "books", Duration::from_secs(5)).unwrap()
}

fn index_not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "error": { "type": "index_not_found_exception", "reason": "no such index [books]" },
        "status": 404
    }))
}

fn dune() -> NewBook {
    NewBook {
        title: "Dune".to_string(),
        author_name: "Frank Herbert".to_string(),
        price: 9.99,
        ebook_available: true,
        publish_date: "1965-08-01".to_string(),
    }
}

fn dune_criteria() -> BookQuery {
    BookQuery {
        title: "Dune".to_string(),
        author_name: "Frank Herbert".to_string(),
        min_price: 0.0,
        max_price: 1000.0,
    }
}

#[tokio::test]
async fn test_get_book_reads_source_and_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/_doc/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "books",
            "_id": "abc",
            "found": true,
            "_source": {
                "title": "Dune",
                "author_name": "Frank Herbert",
                "price": 9.99,
                "ebook_available": true,
                "publish_date": "1965-08-01"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let book = gateway_for(&server).get_book("abc").await.unwrap();

    assert_eq!(book.id, "abc");
    assert_eq!(book.title, "Dune");
    assert_eq!(book.price, 9.99);
}

#[tokio::test]
async fn test_missing_document_is_not_found() {
    let server = MockServer::start().await;
    let missing_doc =
        ResponseTemplate::new(404).set_body_json(json!({ "_id": "gone", "found": false }));
    Mock::given(method("GET"))
        .and(path("/books/_doc/gone"))
        .respond_with(missing_doc.clone())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/books/_update/gone"))
        .respond_with(missing_doc.clone())
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/books/_doc/gone"))
        .respond_with(missing_doc)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);

    let err = gateway.get_book("gone").await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound { .. }));
    assert!(err.to_string().contains("book 'gone'"));

    let err = gateway.update_book_title("gone", "Dune").await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound { .. }));

    let err = gateway.delete_book("gone").await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound { .. }));
}

#[tokio::test]
async fn test_missing_index_on_collection_calls_is_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/books/_doc"))
        .respond_with(index_not_found())
        .mount(&server)
        .await;
    Mock::given(path("/books/_search"))
        .respond_with(index_not_found())
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);

    let err = gateway.add_book(&dune()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Backend { status: 404, .. }));
    assert!(!err.is_not_found());

    let err = gateway.search_books(&dune_criteria()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Backend { status: 404, .. }));

    let err = gateway.store_stats().await.unwrap_err();
    assert!(matches!(err, GatewayError::Backend { status: 404, .. }));
}

#[tokio::test]
async fn test_unavailable_cluster_is_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/_doc/abc"))
        .respond_with(ResponseTemplate::new(503).set_body_string("cluster unavailable"))
        .mount(&server)
        .await;

    let err = gateway_for(&server).get_book("abc").await.unwrap_err();

    match err {
        GatewayError::Backend { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "cluster unavailable");
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_success_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/_doc/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = gateway_for(&server).get_book("abc").await.unwrap_err();

    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_add_book_returns_generated_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/books/_doc"))
        .and(body_partial_json(json!({ "title": "Dune", "author_name": "Frank Herbert" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "_id": "x1", "result": "created" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let id = gateway_for(&server).add_book(&dune()).await.unwrap();

    assert_eq!(id, "x1");
}

#[tokio::test]
async fn test_store_stats_sends_zero_hit_aggregation() {
    let server = MockServer::start().await;
    Mock::given(path("/books/_search"))
        .and(body_partial_json(json!({
            "size": 0,
            "track_total_hits": true,
            "aggs": { "authors_dcount": { "cardinality": { "field": "author_name.keyword" } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": { "total": { "value": 3, "relation": "eq" }, "hits": [] },
            "aggregations": { "authors_dcount": { "value": 2 } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = gateway_for(&server).store_stats().await.unwrap();

    assert_eq!(stats.count, 3);
    assert_eq!(stats.dcount, 2);
}

#[tokio::test]
async fn test_ensure_index_tolerates_concurrent_creation() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "resource_already_exists_exception",
                "reason": "index [books] already exists"
            },
            "status": 400
        })))
        .expect(1)
        .mount(&server)
        .await;

    gateway_for(&server).ensure_index().await.unwrap();
}

#[tokio::test]
async fn test_ensure_index_skips_existing_index() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    gateway_for(&server).ensure_index().await.unwrap();
}

#[tokio::test]
async fn test_ensure_index_surfaces_other_failures() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = gateway_for(&server).ensure_index().await.unwrap_err();

    assert!(matches!(err, GatewayError::Backend { status: 403, .. }));
}
