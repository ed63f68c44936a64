//! # pagebuilder-sync
//!
//! Filesystem-to-catalog reconciliation engine.
//!
//! The catalog's source of truth is a directory tree: one subdirectory per
//! template, each with an optional `config.toml` describing its sections.
//! This crate keeps a persisted [`CatalogStore`](pagebuilder_storage::CatalogStore)
//! convergent with that tree:
//!
//! - [`CatalogSync`] runs the full synchronization pass: restore or
//!   update-or-create templates and sections by key, create pages once,
//!   seed association data, and prune rows whose source disappeared.
//! - [`reconcile_page_sections`] applies one editor submission to a single
//!   page's ordered section associations.
//!
//! ## Example
//!
//! ```ignore
//! use pagebuilder_db_memory::InMemoryCatalogStore;
//! use pagebuilder_sync::{CatalogSync, SyncConfig};
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryCatalogStore::new());
//! let sync = CatalogSync::new(store, SyncConfig::new("resources/templates"));
//! let report = sync.run().await?;
//! println!("synced {} templates", report.templates_seen());
//! ```

mod catalog;
mod error;
mod page_sections;
mod parser;
mod scanner;

pub use catalog::{CatalogSync, SkippedTemplate, SyncConfig, SyncReport};
pub use error::{SyncError, SyncResult};
pub use page_sections::{SectionEntry, reconcile_page_sections};
pub use parser::{ParsedSection, parse_sections};
pub use scanner::{CONFIG_FILE_NAME, Scan, Scanner, TemplateDir};
