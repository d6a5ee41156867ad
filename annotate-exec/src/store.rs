//! SPARQL store access
//!
//! The executor talks to the store through [`SparqlStore`] so runs can be
//! tested against in-memory fakes. [`HttpStore`] is the production
//! implementation: form-encoded POSTs against a SPARQL 1.1 protocol
//! endpoint (GraphDB-style, where updates go to `.../statements` and
//! queries to the repository root).

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A store accepting graph updates and boolean queries.
#[async_trait]
pub trait SparqlStore: Send + Sync {
    /// Apply one update operation.
    async fn update(&self, sparql: &str) -> StoreResult<()>;

    /// Evaluate one `ASK` query.
    async fn ask(&self, sparql: &str) -> StoreResult<bool>;
}

/// SPARQL-over-HTTP client.
pub struct HttpStore {
    client: reqwest::Client,
    update_url: String,
    query_url: String,
}

impl HttpStore {
    /// Build a client for the given statements endpoint. The query endpoint
    /// is derived by stripping a trailing `/statements`.
    pub fn new(endpoint: &str) -> StoreResult<Self> {
        let update_url = endpoint.trim_end_matches('/').to_string();
        let query_url = update_url
            .strip_suffix("/statements")
            .unwrap_or(&update_url)
            .to_string();
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(HttpStore {
            client,
            update_url,
            query_url,
        })
    }
}

#[async_trait]
impl SparqlStore for HttpStore {
    async fn update(&self, sparql: &str) -> StoreResult<()> {
        debug!(url = self.update_url.as_str(), "posting update");
        let response = self
            .client
            .post(&self.update_url)
            .form(&[("update", sparql)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn ask(&self, sparql: &str) -> StoreResult<bool> {
        debug!(url = self.query_url.as_str(), "posting ask");
        let response = self
            .client
            .post(&self.query_url)
            .header("Accept", "application/sparql-results+json")
            .form(&[("query", sparql)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        body.get("boolean")
            .and_then(serde_json::Value::as_bool)
            .ok_or_else(|| StoreError::Malformed("missing `boolean` field".to_string()))
    }
}
