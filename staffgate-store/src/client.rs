//! HTTP entity-store client
//!
//! Speaks the REST surface served by `staffgate-stored` (and by the legacy
//! store services it replaces). Every request is bounded by the configured
//! timeout; transport failures map to `StoreError::Unreachable` so callers
//! can choose degraded behavior instead of hanging or crashing.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use staffgate_core::{
    Filter, ListQuery, QueryDocument, ResultPage, StoreError, StoreResult,
};

use crate::entity::{Entity, EntityStore};

/// Configuration for a [`RestEntityStore`].
#[derive(Debug, Clone)]
pub struct StoreClientConfig {
    /// Service root, e.g. `http://127.0.0.1:5003`.
    pub base_url: String,
    /// Upper bound on every request.
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl StoreClientConfig {
    pub fn new<S: Into<String>>(base_url: S, timeout_seconds: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds,
            user_agent: concat!("staffgate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Entity-store client for one remote collection.
pub struct RestEntityStore<E: Entity> {
    client: reqwest::Client,
    base_url: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> RestEntityStore<E> {
    pub fn new(config: &StoreClientConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| StoreError::unexpected(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            _entity: PhantomData,
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/api/{}", self.base_url, E::COLLECTION)
    }

    fn record_url(&self, id: &E::Id) -> String {
        format!("{}/api/{}/{}", self.base_url, E::COLLECTION, id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> StoreResult<reqwest::Response> {
        request
            .send()
            .await
            .map_err(|e| StoreError::unreachable(format!("{}: {e}", E::COLLECTION)))
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
        response
            .json()
            .await
            .map_err(|e| StoreError::unexpected(format!("undecodable store response: {e}")))
    }

    /// Map a non-success response onto the error taxonomy.
    async fn error_for(response: reqwest::Response, id: Option<&E::Id>) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => StoreError::not_found(
                E::COLLECTION,
                id.map(ToString::to_string).unwrap_or_default(),
            ),
            StatusCode::CONFLICT => StoreError::conflict(reason(&body, "unique constraint")),
            StatusCode::BAD_REQUEST => {
                StoreError::validation("payload", reason(&body, "rejected by store"))
            }
            _ => StoreError::unexpected(format!(
                "{} answered {}: {}",
                E::COLLECTION,
                status.as_u16(),
                reason(&body, "no body")
            )),
        }
    }

    /// A live record, or `NotFound` for the legacy empty-object encoding of
    /// an absent one.
    fn record_from_value(value: serde_json::Value, id: Option<&E::Id>) -> StoreResult<E> {
        if value.as_object().is_some_and(|o| o.is_empty()) {
            return Err(StoreError::not_found(
                E::COLLECTION,
                id.map(ToString::to_string).unwrap_or_default(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| StoreError::unexpected(format!("malformed {} record: {e}", E::COLLECTION)))
    }

    fn query_params(query: &ListQuery) -> StoreResult<Vec<(&'static str, String)>> {
        let mut params = Vec::new();
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = query.per_page {
            params.push(("results_per_page", per_page.to_string()));
        }
        if !query.filters.is_empty() {
            let document = QueryDocument {
                filters: query.filters.to_vec(),
                single: None,
            };
            params.push(("q", encode_query(&document)?));
        }
        Ok(params)
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for RestEntityStore<E> {
    async fn create(&self, new: &E::New) -> StoreResult<E> {
        let url = self.collection_url();
        debug!(collection = E::COLLECTION, %url, "creating record");

        let response = self.send(self.client.post(&url).json(new)).await?;
        if response.status() != StatusCode::CREATED {
            return Err(Self::error_for(response, None).await);
        }
        Self::record_from_value(Self::decode(response).await?, None)
    }

    async fn get(&self, id: &E::Id) -> StoreResult<E> {
        let url = self.record_url(id);
        debug!(collection = E::COLLECTION, %url, "fetching record");

        let response = self.send(self.client.get(&url)).await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, Some(id)).await);
        }
        Self::record_from_value(Self::decode(response).await?, Some(id))
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<ResultPage<E>> {
        let url = self.collection_url();
        let params = Self::query_params(query)?;
        debug!(collection = E::COLLECTION, %url, "listing records");

        let response = self.send(self.client.get(&url).query(&params)).await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, None).await);
        }
        Self::decode(response).await
    }

    async fn find_one(&self, filters: &[Filter]) -> StoreResult<Option<E>> {
        let url = self.collection_url();
        let document = QueryDocument {
            filters: filters.to_vec(),
            single: Some(true),
        };
        let params = [("q", encode_query(&document)?)];
        debug!(collection = E::COLLECTION, %url, "single-record lookup");

        let response = self.send(self.client.get(&url).query(&params)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_for(response, None).await);
        }
        match Self::record_from_value(Self::decode(response).await?, None) {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update(&self, id: &E::Id, new: &E::New) -> StoreResult<E> {
        let url = self.record_url(id);
        debug!(collection = E::COLLECTION, %url, "replacing record");

        let response = self.send(self.client.put(&url).json(new)).await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, Some(id)).await);
        }
        Self::record_from_value(Self::decode(response).await?, Some(id))
    }

    async fn patch(&self, id: &E::Id, patch: &E::Patch) -> StoreResult<E> {
        let url = self.record_url(id);
        debug!(collection = E::COLLECTION, %url, "patching record");

        let response = self.send(self.client.patch(&url).json(patch)).await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, Some(id)).await);
        }
        Self::record_from_value(Self::decode(response).await?, Some(id))
    }

    async fn delete(&self, id: &E::Id) -> StoreResult<()> {
        let url = self.record_url(id);
        debug!(collection = E::COLLECTION, %url, "deleting record");

        let response = self.send(self.client.delete(&url)).await?;
        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(Self::error_for(response, Some(id)).await),
        }
    }
}

fn encode_query(document: &QueryDocument) -> StoreResult<String> {
    serde_json::to_string(document)
        .map_err(|e| StoreError::unexpected(format!("unencodable filter document: {e}")))
}

fn reason(body: &str, fallback: &str) -> String {
    // Store errors come back as {"error": ..., "reason": "..."} when the
    // service produced them; anything else is passed through verbatim.
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("reason").and_then(|r| r.as_str()).map(String::from))
        .unwrap_or_else(|| {
            if body.is_empty() {
                fallback.to_string()
            } else {
                body.to_string()
            }
        })
}
