//! Catalog entities: templates, pages, section definitions, and the
//! page-section associations that carry operator-entered content.
//!
//! All four entities are soft-deletable: `deleted_at` is set instead of
//! removing the row, and "active" lookups exclude trashed rows while keeping
//! them restorable by key.

use crate::schema::{FieldSchema, FieldValues};
use crate::slug::human_name;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Row identifier for a template.
pub type TemplateId = i64;
/// Row identifier for a page.
pub type PageId = i64;
/// Row identifier for a section definition.
pub type SectionId = i64;
/// Row identifier for a page-section association.
pub type AssociationId = i64;

/// A named presentation layout a page can use.
///
/// Templates mirror the directories under the template root; the full
/// catalog sync creates, restores, and prunes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    /// Unique key, equal to the template's directory name.
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

impl Template {
    /// Creates an active template row.
    pub fn new(id: TemplateId, name: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id,
            name: name.into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Returns true when the row is soft-deleted.
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Soft-deletes the row.
    pub fn mark_trashed(&mut self) {
        self.deleted_at = Some(OffsetDateTime::now_utc());
    }

    /// Clears the soft-delete timestamp. Other attributes are untouched.
    pub fn restore(&mut self) {
        self.deleted_at = None;
        self.updated_at = OffsetDateTime::now_utc();
    }
}

/// A consumer-facing page bound to a template.
///
/// Pages are created once by the sync pass and never edited by it again:
/// operator changes to title and slug must survive repeated syncs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    /// The template directory this page was created from. Pages backed by a
    /// dynamic template have no fixed folder.
    pub folder_name: Option<String>,
    pub title: String,
    pub slug: String,
    pub template_id: TemplateId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

impl Page {
    /// Returns true when the row is soft-deleted.
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Soft-deletes the row.
    pub fn mark_trashed(&mut self) {
        self.deleted_at = Some(OffsetDateTime::now_utc());
    }

    /// Clears the soft-delete timestamp.
    pub fn restore(&mut self) {
        self.deleted_at = None;
        self.updated_at = OffsetDateTime::now_utc();
    }
}

/// A reusable, schema-described content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub id: SectionId,
    /// Globally unique key: `{template directory}-{section key}`.
    pub slug: String,
    /// The raw section key from the descriptor.
    pub name: String,
    pub field_schema: FieldSchema,
    /// Dynamic sections are reusable across pages; non-dynamic sections are
    /// bound to the template that declared them.
    pub is_dynamic: bool,
    /// Position within the defining configuration descriptor.
    pub order: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

impl SectionDefinition {
    /// Returns true when the row is soft-deleted.
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Soft-deletes the row.
    pub fn mark_trashed(&mut self) {
        self.deleted_at = Some(OffsetDateTime::now_utc());
    }

    /// Clears the soft-delete timestamp. Other attributes are untouched.
    pub fn restore(&mut self) {
        self.deleted_at = None;
        self.updated_at = OffsetDateTime::now_utc();
    }

    /// Human-facing name derived from the raw section key.
    pub fn human_name(&self) -> String {
        human_name(&self.name)
    }
}

/// The per-page, ordered, data-bearing link to a section definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSectionAssociation {
    pub id: AssociationId,
    /// Stable external identifier, assigned once and never reused.
    pub uuid: Uuid,
    pub page_id: PageId,
    pub section_id: SectionId,
    /// Position of the section on the page.
    pub order: i64,
    /// Operator-entered field values shaped by the section's schema.
    /// `None` until seeded by the sync pass or written by an editor.
    pub data: Option<FieldValues>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

impl PageSectionAssociation {
    /// Returns true when the row is soft-deleted.
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Soft-deletes the row. The uuid survives so external references stay
    /// resolvable until the row is hard-deleted.
    pub fn mark_trashed(&mut self) {
        self.deleted_at = Some(OffsetDateTime::now_utc());
    }
}
