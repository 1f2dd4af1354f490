use std::time::Duration;

use async_trait::async_trait;
use opensearch::http::response::Response;
use opensearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use opensearch::http::Url;
use opensearch::indices::{IndicesCreateParts, IndicesExistsParts};
use opensearch::{DeleteParts, GetParts, IndexParts, OpenSearch, SearchParts, UpdateParts};
use serde_json::Value;

use crate::error::GatewayError;
use crate::model::{Book, BookQuery, NewBook, StoreStats};
use crate::{query, response, BookGateway};

/// Gateway backed by an OpenSearch (or Elasticsearch-compatible) cluster.
///
/// The client pools connections and is shared by all concurrent requests.
pub struct OpenSearchGateway {
    client: OpenSearch,
    index: String,
}

impl OpenSearchGateway {
    pub fn connect(
        url: &str,
        index: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let url = Url::parse(url)
            .map_err(|err| GatewayError::InvalidConfig(format!("invalid url '{url}': {err}")))?;
        let transport = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::InvalidConfig(err.to_string()))?;

        Ok(Self {
            client: OpenSearch::new(transport),
            index: index.into(),
        })
    }

}

/// Map the status code onto the error taxonomy and decode the body.
///
/// Only calls addressing a single document pass `document`; for them a 404
/// means the book is missing. Collection-level calls report a 404 (missing
/// index) as a plain backend failure.
async fn checked(res: Response, document: Option<&str>) -> Result<Value, GatewayError> {
    let status = res.status_code();

    if let (404, Some(id)) = (status.as_u16(), document) {
        return Err(GatewayError::book_not_found(id));
    }

    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(GatewayError::Backend {
            status: status.as_u16(),
            body,
        });
    }

    res.json::<Value>()
        .await
        .map_err(|err| GatewayError::malformed(format!("undecodable body: {err}")))
}

#[async_trait]
impl BookGateway for OpenSearchGateway {
    async fn ensure_index(&self) -> Result<(), GatewayError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index.as_str()]))
            .send()
            .await?;

        if exists.status_code().is_success() {
            tracing::debug!(index = %self.index, "book index already present");
            return Ok(());
        }

        let created = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(query::index_mapping())
            .send()
            .await?;

        let status = created.status_code();
        if status.is_success() {
            tracing::info!(index = %self.index, "created book index");
            return Ok(());
        }

        let body = created.text().await.unwrap_or_default();
        // Another instance may have created it between the two calls.
        if body.contains("resource_already_exists_exception") {
            return Ok(());
        }

        Err(GatewayError::Backend {
            status: status.as_u16(),
            body,
        })
    }

    async fn add_book(&self, book: &NewBook) -> Result<String, GatewayError> {
        let res = self
            .client
            .index(IndexParts::Index(&self.index))
            .body(book)
            .send()
            .await?;

        let body = checked(res, None).await?;
        let id = response::created_id(body)?;
        tracing::debug!(%id, "indexed book");
        Ok(id)
    }

    async fn get_book(&self, id: &str) -> Result<Book, GatewayError> {
        let res = self
            .client
            .get(GetParts::IndexId(&self.index, id))
            .send()
            .await?;

        let body = checked(res, Some(id)).await?;
        response::book(body)
    }

    async fn update_book_title(&self, id: &str, title: &str) -> Result<(), GatewayError> {
        let res = self
            .client
            .update(UpdateParts::IndexId(&self.index, id))
            .body(query::update_title(title))
            .send()
            .await?;

        checked(res, Some(id)).await?;
        Ok(())
    }

    async fn delete_book(&self, id: &str) -> Result<(), GatewayError> {
        let res = self
            .client
            .delete(DeleteParts::IndexId(&self.index, id))
            .send()
            .await?;

        checked(res, Some(id)).await?;
        Ok(())
    }

    async fn search_books(&self, criteria: &BookQuery) -> Result<Vec<Book>, GatewayError> {
        let res = self
            .client
            .search(SearchParts::Index(&[self.index.as_str()]))
            .body(query::search_books(criteria))
            .send()
            .await?;

        let body = checked(res, None).await?;
        response::search_hits(body)
    }

    async fn store_stats(&self) -> Result<StoreStats, GatewayError> {
        let res = self
            .client
            .search(SearchParts::Index(&[self.index.as_str()]))
            .body(query::store_stats())
            .send()
            .await?;

        let body = checked(res, None).await?;
        response::store_stats(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_rejects_invalid_url() {
        let err = OpenSearchGateway::connect("not a url", "books", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, GatewayError::InvalidConfig(_)));
    }
}
