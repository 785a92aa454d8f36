//! In-process record store
//!
//! Backs the `staffgate-stored` service binary and the test suites. Rows are
//! kept as JSON objects so one implementation serves all four collections:
//! id assignment, unique-field enforcement, filtering and pagination all
//! operate on fields by name, exactly like the HTTP surface does.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use staffgate_core::{
    Filter, FilterOp, ListQuery, ResultPage, StoreError, StoreResult,
};

use crate::entity::{Entity, EntityStore};

const DEFAULT_PER_PAGE: u64 = 20;

/// How ids are assigned to records created without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// Monotonically increasing integers, starting at 1.
    Sequential,
    /// 32-hex-char random tokens (sessions).
    Token,
}

#[derive(Debug, Default)]
struct Rows {
    records: Vec<Value>,
    next_id: i64,
}

/// A paginated in-memory record store for one collection.
pub struct MemoryStore<E: Entity> {
    rows: Arc<RwLock<Rows>>,
    strategy: IdStrategy,
    per_page: u64,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for MemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            strategy: self.strategy,
            per_page: self.per_page,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> MemoryStore<E> {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            rows: Arc::new(RwLock::new(Rows::default())),
            strategy,
            per_page: DEFAULT_PER_PAGE,
            _entity: PhantomData,
        }
    }

    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page;
        self
    }

    fn decode(row: &Value) -> StoreResult<E> {
        serde_json::from_value(row.clone())
            .map_err(|e| StoreError::unexpected(format!("corrupt {} row: {e}", E::COLLECTION)))
    }

    fn find_index(rows: &Rows, id: &E::Id) -> Option<usize> {
        let wanted = id.to_string();
        rows.records
            .iter()
            .position(|row| id_matches(&row["id"], &wanted))
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    async fn create(&self, new: &E::New) -> StoreResult<E> {
        let mut value = serde_json::to_value(new)
            .map_err(|e| StoreError::unexpected(format!("unencodable payload: {e}")))?;
        if !value.is_object() {
            return Err(StoreError::validation("payload", "must be an object"));
        }

        let mut rows = self.rows.write().await;

        for field in E::UNIQUE_FIELDS {
            let candidate = &value[*field];
            if !candidate.is_null() && rows.records.iter().any(|row| &row[*field] == candidate) {
                return Err(StoreError::conflict(format!(
                    "{} `{}` already exists",
                    field,
                    display_value(candidate)
                )));
            }
        }

        let explicit_id = value
            .get("id")
            .filter(|id| !id.is_null())
            .map(display_value);
        match explicit_id {
            Some(wanted) => {
                if rows.records.iter().any(|row| id_matches(&row["id"], &wanted)) {
                    return Err(StoreError::conflict(format!("id `{wanted}` already exists")));
                }
            }
            None => {
                value["id"] = match self.strategy {
                    IdStrategy::Sequential => {
                        rows.next_id += 1;
                        Value::from(rows.next_id)
                    }
                    IdStrategy::Token => Value::from(Uuid::new_v4().simple().to_string()),
                };
            }
        }

        let record = Self::decode(&value)?;
        rows.records.push(value);
        Ok(record)
    }

    async fn get(&self, id: &E::Id) -> StoreResult<E> {
        let rows = self.rows.read().await;
        let index = Self::find_index(&rows, id)
            .ok_or_else(|| StoreError::not_found(E::COLLECTION, id))?;
        Self::decode(&rows.records[index])
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<ResultPage<E>> {
        let rows = self.rows.read().await;
        let matched: Vec<&Value> = rows
            .records
            .iter()
            .filter(|row| matches_filters(row, &query.filters))
            .collect();

        let per_page = query.per_page.unwrap_or(self.per_page).max(1);
        let page = query.page.unwrap_or(1).max(1);
        let num_results = matched.len() as u64;
        let total_pages = num_results.div_ceil(per_page);

        let start = ((page - 1) * per_page) as usize;
        let objects = matched
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .map(Self::decode)
            .collect::<StoreResult<Vec<E>>>()?;

        Ok(ResultPage {
            objects,
            page,
            total_pages,
            num_results,
        })
    }

    async fn find_one(&self, filters: &[Filter]) -> StoreResult<Option<E>> {
        let rows = self.rows.read().await;
        rows.records
            .iter()
            .find(|row| matches_filters(row, filters))
            .map(Self::decode)
            .transpose()
    }

    async fn update(&self, id: &E::Id, new: &E::New) -> StoreResult<E> {
        let mut replacement = serde_json::to_value(new)
            .map_err(|e| StoreError::unexpected(format!("unencodable payload: {e}")))?;
        if !replacement.is_object() {
            return Err(StoreError::validation("payload", "must be an object"));
        }

        let mut rows = self.rows.write().await;
        let index = Self::find_index(&rows, id)
            .ok_or_else(|| StoreError::not_found(E::COLLECTION, id))?;

        replacement["id"] = rows.records[index]["id"].clone();
        let record = Self::decode(&replacement)?;
        rows.records[index] = replacement;
        Ok(record)
    }

    async fn patch(&self, id: &E::Id, patch: &E::Patch) -> StoreResult<E> {
        let value = serde_json::to_value(patch)
            .map_err(|e| StoreError::unexpected(format!("unencodable payload: {e}")))?;
        let Some(changes) = value.as_object() else {
            return Err(StoreError::validation("payload", "must be an object"));
        };

        let mut rows = self.rows.write().await;
        let index = Self::find_index(&rows, id)
            .ok_or_else(|| StoreError::not_found(E::COLLECTION, id))?;

        let mut patched = rows.records[index].clone();
        for (field, new_value) in changes {
            if field == "id" {
                continue;
            }
            patched[field.as_str()] = new_value.clone();
        }

        let record = Self::decode(&patched)?;
        rows.records[index] = patched;
        Ok(record)
    }

    async fn delete(&self, id: &E::Id) -> StoreResult<()> {
        let mut rows = self.rows.write().await;
        let index = Self::find_index(&rows, id)
            .ok_or_else(|| StoreError::not_found(E::COLLECTION, id))?;
        rows.records.remove(index);
        Ok(())
    }
}

/// A store whose every operation fails with `Unreachable`. Stands in for a
/// down service when exercising degraded mode.
pub struct OfflineStore<E: Entity> {
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> OfflineStore<E> {
    pub fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }

    fn refuse<T>() -> StoreResult<T> {
        Err(StoreError::unreachable(format!(
            "{} store is offline",
            E::COLLECTION
        )))
    }
}

impl<E: Entity> Default for OfflineStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for OfflineStore<E> {
    async fn create(&self, _new: &E::New) -> StoreResult<E> {
        Self::refuse()
    }

    async fn get(&self, _id: &E::Id) -> StoreResult<E> {
        Self::refuse()
    }

    async fn list(&self, _query: &ListQuery) -> StoreResult<ResultPage<E>> {
        Self::refuse()
    }

    async fn find_one(&self, _filters: &[Filter]) -> StoreResult<Option<E>> {
        Self::refuse()
    }

    async fn update(&self, _id: &E::Id, _new: &E::New) -> StoreResult<E> {
        Self::refuse()
    }

    async fn patch(&self, _id: &E::Id, _patch: &E::Patch) -> StoreResult<E> {
        Self::refuse()
    }

    async fn delete(&self, _id: &E::Id) -> StoreResult<()> {
        Self::refuse()
    }
}

fn matches_filters(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| {
        let field = &row[filter.name.as_str()];
        match filter.op {
            FilterOp::Eq => field == &filter.val,
            FilterOp::Ne => field != &filter.val,
        }
    })
}

fn id_matches(stored: &Value, wanted: &str) -> bool {
    display_value(stored) == wanted
}

/// Render an id-ish value the way it appears in a URL path segment.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
