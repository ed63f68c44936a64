//! Storage traits for the catalog store abstraction layer.
//!
//! This module defines the contract the reconciliation engine requires from
//! a persisted catalog. Any backend with soft delete, restore, and
//! update-or-create-by-key can satisfy it.

use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::StorageError;
use crate::types::{NewPage, SectionUpsert, TemplateOption};
use pagebuilder_core::{
    AssociationId, FieldValues, Page, PageId, PageSectionAssociation, SectionDefinition,
    SectionId, Template, TemplateId,
};

/// The persisted catalog of templates, pages, sections, and associations.
///
/// Implementations must be thread-safe (`Send + Sync`). The trait is the
/// entire surface the reconcilers need: find-one-trashed-by-key, restore,
/// update-or-create-by-key, "not in this id set" bulk soft delete, and the
/// active lookups the (external) admin flows consume.
///
/// Soft-delete semantics are uniform across entities: a trashed row is
/// excluded from all active lookups but remains restorable by key, and
/// restoring never creates a duplicate key.
///
/// # Example
///
/// ```ignore
/// use pagebuilder_storage::{CatalogStore, StorageError};
///
/// async fn template_names(store: &dyn CatalogStore) -> Result<Vec<String>, StorageError> {
///     let templates = store.list_active_templates().await?;
///     Ok(templates.into_iter().map(|t| t.name).collect())
/// }
/// ```
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // ==================== Templates ====================

    /// Finds a soft-deleted template by its unique name.
    ///
    /// Returns `None` when no trashed row carries the name; an active row
    /// with the name is not a match.
    async fn find_trashed_template_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Template>, StorageError>;

    /// Restores a soft-deleted template. Attributes other than the
    /// soft-delete timestamp are untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row has the id.
    async fn restore_template(&self, id: TemplateId) -> Result<Template, StorageError>;

    /// Update-or-create of a template keyed by its unique name.
    ///
    /// Matches active rows only. Re-running with an unchanged name leaves
    /// the row unchanged apart from timestamp touches.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the name is held by a
    /// trashed row; callers are expected to restore first.
    async fn upsert_template_by_name(&self, name: &str) -> Result<Template, StorageError>;

    /// Soft-deletes every active template whose id is not in `keep`.
    /// Returns the number of rows trashed.
    async fn soft_delete_templates_excluding(
        &self,
        keep: &HashSet<TemplateId>,
    ) -> Result<u64, StorageError>;

    /// Lists active templates.
    async fn list_active_templates(&self) -> Result<Vec<Template>, StorageError>;

    /// Active templates as (id, name) pairs for select inputs.
    async fn template_options(&self) -> Result<Vec<TemplateOption>, StorageError> {
        let templates = self.list_active_templates().await?;
        Ok(templates
            .into_iter()
            .map(|t| TemplateOption {
                id: t.id,
                name: t.name,
            })
            .collect())
    }

    // ==================== Pages ====================

    /// Returns whether any page, active or trashed, has this folder name.
    async fn page_exists_by_folder(&self, folder_name: &str) -> Result<bool, StorageError>;

    /// Creates a page. The store assigns id and timestamps.
    async fn create_page(&self, new_page: NewPage) -> Result<Page, StorageError>;

    /// Finds the active page for a template directory.
    async fn find_active_page_by_folder(
        &self,
        folder_name: &str,
    ) -> Result<Option<Page>, StorageError>;

    /// Soft-deletes a page.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row has the id.
    async fn soft_delete_page(&self, id: PageId) -> Result<Page, StorageError>;

    /// Restores a soft-deleted page.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row has the id.
    async fn restore_page(&self, id: PageId) -> Result<Page, StorageError>;

    /// Hard-deletes a page, trashed or not. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row has the id.
    async fn force_delete_page(&self, id: PageId) -> Result<(), StorageError>;

    // ==================== Section definitions ====================

    /// Finds a soft-deleted section definition by its unique slug.
    async fn find_trashed_section_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<SectionDefinition>, StorageError>;

    /// Restores a soft-deleted section definition unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row has the id.
    async fn restore_section(&self, id: SectionId) -> Result<SectionDefinition, StorageError>;

    /// Update-or-create of a section definition keyed by slug.
    ///
    /// Matches active rows only; a trashed row holding the slug is a
    /// conflict (restore first).
    async fn upsert_section_by_slug(
        &self,
        upsert: SectionUpsert,
    ) -> Result<SectionDefinition, StorageError>;

    /// Finds the active section definition for a slug.
    async fn find_active_section_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<SectionDefinition>, StorageError>;

    /// Soft-deletes a section definition. The slug stays reserved and the
    /// row stays restorable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row has the id.
    async fn soft_delete_section(&self, id: SectionId) -> Result<SectionDefinition, StorageError>;

    /// Lists active dynamic section definitions (the reusable pool offered
    /// when editing a dynamic page).
    async fn list_dynamic_sections(&self) -> Result<Vec<SectionDefinition>, StorageError>;

    // ==================== Page-section associations ====================

    /// Update-or-create of an association keyed on `(page_id, section_id)`,
    /// setting `order`. Matches active rows only. A created row starts with
    /// `data = None`; an existing row's `data` is never touched here.
    async fn upsert_association(
        &self,
        page_id: PageId,
        section_id: SectionId,
        order: i64,
    ) -> Result<PageSectionAssociation, StorageError>;

    /// Creates an association unconditionally with a fresh uuid.
    ///
    /// Editor submissions may attach the same section to a page more than
    /// once; rows are distinguished by uuid.
    async fn create_association(
        &self,
        page_id: PageId,
        section_id: SectionId,
        order: i64,
    ) -> Result<PageSectionAssociation, StorageError>;

    /// Finds an active association by its stable uuid.
    async fn find_association_by_uuid(
        &self,
        uuid: Uuid,
    ) -> Result<Option<PageSectionAssociation>, StorageError>;

    /// Replaces an association's `data` and `order`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row has the id.
    async fn update_association(
        &self,
        id: AssociationId,
        data: FieldValues,
        order: i64,
    ) -> Result<PageSectionAssociation, StorageError>;

    /// Sets an association's `data` without touching `order`. Used to seed
    /// empty field values on brand-new rows.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row has the id.
    async fn set_association_data(
        &self,
        id: AssociationId,
        data: FieldValues,
    ) -> Result<PageSectionAssociation, StorageError>;

    /// Soft-deletes every active association of `page_id` whose id is not in
    /// `keep`. Returns the number of rows trashed.
    async fn soft_delete_associations_excluding(
        &self,
        page_id: PageId,
        keep: &HashSet<AssociationId>,
    ) -> Result<u64, StorageError>;

    /// Active associations of a page ordered by `order` ascending.
    async fn list_page_associations(
        &self,
        page_id: PageId,
    ) -> Result<Vec<PageSectionAssociation>, StorageError>;

    // ==================== Metadata ====================

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
