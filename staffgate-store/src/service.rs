//! Entity-store HTTP service
//!
//! The REST surface spoken by [`crate::RestEntityStore`], served from a
//! [`MemoryStore`]. One collection per router; `staffgate-stored` runs one
//! collection per process.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::error;

use staffgate_core::{ListQuery, QueryDocument, StoreError, StoreResult};

use crate::entity::{Entity, EntityStore};
use crate::memory::MemoryStore;

/// Build the `/api/{collection}` router for one collection.
pub fn collection_router<E: Entity>(store: MemoryStore<E>) -> Router {
    let routes = Router::new()
        .route("/", get(list_records::<E>).post(create_record::<E>))
        .route(
            "/{id}",
            get(get_record::<E>)
                .put(update_record::<E>)
                .patch(patch_record::<E>)
                .delete(delete_record::<E>),
        )
        .with_state(store);

    Router::new().nest(&format!("/api/{}", E::COLLECTION), routes)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    results_per_page: Option<u64>,
    q: Option<String>,
}

struct ServiceError(StoreError);

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Conflict { .. } => StatusCode::CONFLICT,
            StoreError::Validation { .. } => StatusCode::BAD_REQUEST,
            StoreError::Unreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::Unexpected { .. } => {
                error!(error = %self.0, "store operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({
            "error": status.as_u16(),
            "reason": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

fn parse_id<E: Entity>(raw: &str) -> StoreResult<E::Id> {
    raw.parse()
        .map_err(|_| StoreError::not_found(E::COLLECTION, raw))
}

fn parse_query(params: &ListParams) -> StoreResult<(Vec<staffgate_core::Filter>, bool)> {
    let document = match &params.q {
        Some(raw) => serde_json::from_str::<QueryDocument>(raw)
            .map_err(|e| StoreError::validation("q", format!("malformed filter document: {e}")))?,
        None => QueryDocument::default(),
    };
    let single = document.single.unwrap_or(false);
    Ok((document.filters, single))
}

async fn list_records<E: Entity>(
    State(store): State<MemoryStore<E>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ServiceError> {
    let (filters, single) = parse_query(&params)?;

    if single {
        let record = store
            .find_one(&filters)
            .await?
            .ok_or_else(|| StoreError::not_found(E::COLLECTION, "?"))?;
        return Ok(Json(record).into_response());
    }

    let page = store
        .list(&ListQuery {
            filters,
            page: params.page,
            per_page: params.results_per_page,
        })
        .await?;
    Ok(Json(page).into_response())
}

async fn get_record<E: Entity>(
    State(store): State<MemoryStore<E>>,
    Path(id): Path<String>,
) -> Result<Json<E>, ServiceError> {
    let record = store.get(&parse_id::<E>(&id)?).await?;
    Ok(Json(record))
}

async fn create_record<E: Entity>(
    State(store): State<MemoryStore<E>>,
    Json(new): Json<E::New>,
) -> Result<(StatusCode, Json<E>), ServiceError> {
    let record = store.create(&new).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_record<E: Entity>(
    State(store): State<MemoryStore<E>>,
    Path(id): Path<String>,
    Json(new): Json<E::New>,
) -> Result<Json<E>, ServiceError> {
    let record = store.update(&parse_id::<E>(&id)?, &new).await?;
    Ok(Json(record))
}

async fn patch_record<E: Entity>(
    State(store): State<MemoryStore<E>>,
    Path(id): Path<String>,
    Json(patch): Json<E::Patch>,
) -> Result<Json<E>, ServiceError> {
    let record = store.patch(&parse_id::<E>(&id)?, &patch).await?;
    Ok(Json(record))
}

async fn delete_record<E: Entity>(
    State(store): State<MemoryStore<E>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    store.delete(&parse_id::<E>(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
