//! The entity-store contract
//!
//! [`Entity`] binds a record type to its collection, id and payload types;
//! [`EntityStore`] is the uniform operation set. All operations cross a
//! network boundary somewhere (or simulate one) and are fallible and latent;
//! callers must treat them so.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use staffgate_core::{
    Department, Employee, Filter, ListQuery, NewDepartment, NewEmployee, NewSession, NewUser,
    ResultPage, SessionPatch, SessionRecord, StoreResult, User,
};

/// A record type stored in one of the entity-store collections.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone + std::fmt::Display + std::str::FromStr + Send + Sync + 'static;
    type New: Serialize + DeserializeOwned + Send + Sync + 'static;
    type Patch: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Collection segment of the store URL, e.g. `personnel`.
    const COLLECTION: &'static str;

    /// Fields the backing store enforces unique on create.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> Self::Id;
}

impl Entity for User {
    type Id = i64;
    type New = NewUser;
    // No partial form exists; a patch carries the full payload.
    type Patch = NewUser;

    const COLLECTION: &'static str = "users";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Employee {
    type Id = i64;
    type New = NewEmployee;
    type Patch = NewEmployee;

    const COLLECTION: &'static str = "personnel";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Department {
    type Id = i64;
    type New = NewDepartment;
    type Patch = NewDepartment;

    const COLLECTION: &'static str = "departments";
    const UNIQUE_FIELDS: &'static [&'static str] = &["name", "email"];

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for SessionRecord {
    type Id = String;
    type New = NewSession;
    type Patch = SessionPatch;

    const COLLECTION: &'static str = "sessions";

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Uniform CRUD over one record collection.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Create a record. Fails with `Conflict` when a unique-constrained field
    /// (including an explicitly supplied id) collides.
    async fn create(&self, new: &E::New) -> StoreResult<E>;

    /// Fetch a record by id.
    async fn get(&self, id: &E::Id) -> StoreResult<E>;

    /// List records matching a conjunction of filters, 1-indexed pagination.
    async fn list(&self, query: &ListQuery) -> StoreResult<ResultPage<E>>;

    /// Fetch at most one record matching the filters.
    async fn find_one(&self, filters: &[Filter]) -> StoreResult<Option<E>>;

    /// Replace a record wholesale.
    async fn update(&self, id: &E::Id, new: &E::New) -> StoreResult<E>;

    /// Apply a partial update.
    async fn patch(&self, id: &E::Id, patch: &E::Patch) -> StoreResult<E>;

    /// Delete a record by id.
    async fn delete(&self, id: &E::Id) -> StoreResult<()>;
}
