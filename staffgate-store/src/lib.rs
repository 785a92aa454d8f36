//! Staffgate Store - Generic entity-store contract
//!
//! One record collection per store service, uniform paginated CRUD over HTTP.
//! This crate provides both sides of that boundary:
//!
//! - [`EntityStore`], the async contract every caller programs against
//! - [`RestEntityStore`], the HTTP client used by the gateway
//! - [`MemoryStore`], the in-process record store backing the service binary
//!   and the test suites
//! - [`service::collection_router`], the HTTP surface served by
//!   `staffgate-stored`
//! - [`OfflineStore`], a store that is always unreachable, for exercising
//!   degraded mode

pub mod client;
pub mod entity;
pub mod memory;
pub mod service;

pub use client::{RestEntityStore, StoreClientConfig};
pub use entity::{Entity, EntityStore};
pub use memory::{IdStrategy, MemoryStore, OfflineStore};
