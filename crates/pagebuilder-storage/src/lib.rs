//! # pagebuilder-storage
//!
//! Catalog store abstraction layer for the Pagebuilder engine.
//!
//! This crate defines the traits and types that all catalog store backends
//! must implement. It does not contain any implementations - those are
//! provided by separate crates.
//!
//! ## Overview
//!
//! The main trait is [`CatalogStore`], which defines the contract for:
//! - find-one-trashed-by-key lookups
//! - restore of soft-deleted rows
//! - update-or-create-by-key
//! - "not in this id set" bulk soft delete
//! - the active lookups consumed by admin flows
//!
//! ## Storage Backends
//!
//! To implement a backend, implement the [`CatalogStore`] trait:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use pagebuilder_storage::{CatalogStore, StorageError};
//!
//! struct MyStore {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl CatalogStore for MyStore {
//!     async fn find_trashed_template_by_name(
//!         &self,
//!         name: &str,
//!     ) -> Result<Option<Template>, StorageError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
mod traits;
mod types;

// Re-export everything from submodules
pub use error::{ErrorCategory, StorageError};
pub use traits::CatalogStore;
pub use types::{NewPage, SectionUpsert, TemplateOption};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared catalog store trait object.
pub type DynCatalogStore = std::sync::Arc<dyn CatalogStore>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use pagebuilder_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::CatalogStore;
    pub use crate::types::{NewPage, SectionUpsert, TemplateOption};
    pub use crate::{DynCatalogStore, StorageResult};
}
