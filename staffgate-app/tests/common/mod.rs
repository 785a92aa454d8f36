//! Store doubles shared by the application-layer tests.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use staffgate_core::{Filter, ListQuery, ResultPage, StoreError, StoreResult};
use staffgate_store::{Entity, EntityStore};

/// Delegates to an inner store while counting write operations, so tests can
/// assert that a code path never touched the store.
pub struct CountingStore<E: Entity> {
    inner: Arc<dyn EntityStore<E>>,
    writes: AtomicUsize,
}

impl<E: Entity> CountingStore<E> {
    pub fn new(inner: Arc<dyn EntityStore<E>>) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for CountingStore<E> {
    async fn create(&self, new: &E::New) -> StoreResult<E> {
        self.record_write();
        self.inner.create(new).await
    }

    async fn get(&self, id: &E::Id) -> StoreResult<E> {
        self.inner.get(id).await
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<ResultPage<E>> {
        self.inner.list(query).await
    }

    async fn find_one(&self, filters: &[Filter]) -> StoreResult<Option<E>> {
        self.inner.find_one(filters).await
    }

    async fn update(&self, id: &E::Id, new: &E::New) -> StoreResult<E> {
        self.record_write();
        self.inner.update(id, new).await
    }

    async fn patch(&self, id: &E::Id, patch: &E::Patch) -> StoreResult<E> {
        self.record_write();
        self.inner.patch(id, patch).await
    }

    async fn delete(&self, id: &E::Id) -> StoreResult<()> {
        self.record_write();
        self.inner.delete(id).await
    }
}

/// Answers the first N creates with a conflict, then delegates. Exercises
/// token-regeneration retry paths.
pub struct FlakyCreateStore<E: Entity> {
    inner: Arc<dyn EntityStore<E>>,
    conflicts_left: AtomicU32,
    attempts: AtomicU32,
}

impl<E: Entity> FlakyCreateStore<E> {
    pub fn new(inner: Arc<dyn EntityStore<E>>, conflicts: u32) -> Self {
        Self {
            inner,
            conflicts_left: AtomicU32::new(conflicts),
            attempts: AtomicU32::new(0),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for FlakyCreateStore<E> {
    async fn create(&self, new: &E::New) -> StoreResult<E> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self
            .conflicts_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::conflict("id already exists"));
        }
        self.inner.create(new).await
    }

    async fn get(&self, id: &E::Id) -> StoreResult<E> {
        self.inner.get(id).await
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<ResultPage<E>> {
        self.inner.list(query).await
    }

    async fn find_one(&self, filters: &[Filter]) -> StoreResult<Option<E>> {
        self.inner.find_one(filters).await
    }

    async fn update(&self, id: &E::Id, new: &E::New) -> StoreResult<E> {
        self.inner.update(id, new).await
    }

    async fn patch(&self, id: &E::Id, patch: &E::Patch) -> StoreResult<E> {
        self.inner.patch(id, patch).await
    }

    async fn delete(&self, id: &E::Id) -> StoreResult<()> {
        self.inner.delete(id).await
    }
}
