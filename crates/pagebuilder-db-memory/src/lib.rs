//! # pagebuilder-db-memory
//!
//! In-memory catalog store backend for the Pagebuilder engine.
//!
//! [`InMemoryCatalogStore`] implements the full
//! [`CatalogStore`](pagebuilder_storage::CatalogStore) contract on top of
//! lock-free papaya maps. It is the default backend for tests and for
//! embedded use; durable deployments swap in a database-backed crate
//! implementing the same trait.

mod store;

pub use store::InMemoryCatalogStore;
