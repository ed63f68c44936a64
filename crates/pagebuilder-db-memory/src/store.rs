use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use time::OffsetDateTime;
use uuid::Uuid;

use pagebuilder_core::{
    AssociationId, FieldValues, Page, PageId, PageSectionAssociation, SectionDefinition,
    SectionId, Template, TemplateId,
};
use pagebuilder_storage::{CatalogStore, NewPage, SectionUpsert, StorageError};

/// In-memory catalog store using papaya lock-free HashMaps.
///
/// This backend provides:
/// - Lock-free concurrent access via papaya::HashMap
/// - Soft delete and restore on all four catalog entities
/// - Update-or-create keyed on the entity's unique key
/// - Complement ("not in this id set") bulk soft delete
///
/// Row ids come from a single atomic counter, so ids are unique across
/// entity kinds, like a shared sequence.
#[derive(Debug)]
pub struct InMemoryCatalogStore {
    templates: PapayaHashMap<TemplateId, Template>,
    pages: PapayaHashMap<PageId, Page>,
    sections: PapayaHashMap<SectionId, SectionDefinition>,
    associations: PapayaHashMap<AssociationId, PageSectionAssociation>,
    /// Atomic counter for generating row ids
    id_counter: AtomicI64,
}

impl InMemoryCatalogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            templates: PapayaHashMap::new(),
            pages: PapayaHashMap::new(),
            sections: PapayaHashMap::new(),
            associations: PapayaHashMap::new(),
            id_counter: AtomicI64::new(1),
        }
    }

    /// Generates the next row id.
    fn next_id(&self) -> i64 {
        self.id_counter.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    // ==================== Templates ====================

    async fn find_trashed_template_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Template>, StorageError> {
        let guard = self.templates.pin();
        Ok(guard
            .iter()
            .find(|(_, t)| t.name == name && t.is_trashed())
            .map(|(_, t)| t.clone()))
    }

    async fn restore_template(&self, id: TemplateId) -> Result<Template, StorageError> {
        let guard = self.templates.pin();
        let mut template = guard
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("Template", id))?;
        template.restore();
        guard.insert(id, template.clone());
        Ok(template)
    }

    async fn upsert_template_by_name(&self, name: &str) -> Result<Template, StorageError> {
        let guard = self.templates.pin();

        if let Some((_, existing)) = guard.iter().find(|(_, t)| t.name == name && !t.is_trashed())
        {
            let mut updated = existing.clone();
            updated.updated_at = OffsetDateTime::now_utc();
            guard.insert(updated.id, updated.clone());
            return Ok(updated);
        }

        // The name may still be held by a trashed row; creating would
        // violate key uniqueness. Callers restore first.
        if guard.iter().any(|(_, t)| t.name == name) {
            return Err(StorageError::already_exists("Template", name));
        }

        let template = Template::new(self.next_id(), name);
        guard.insert(template.id, template.clone());
        Ok(template)
    }

    async fn soft_delete_templates_excluding(
        &self,
        keep: &HashSet<TemplateId>,
    ) -> Result<u64, StorageError> {
        let guard = self.templates.pin();
        let stale: Vec<Template> = guard
            .iter()
            .filter(|(id, t)| !t.is_trashed() && !keep.contains(*id))
            .map(|(_, t)| t.clone())
            .collect();

        let count = stale.len() as u64;
        for mut template in stale {
            template.mark_trashed();
            guard.insert(template.id, template);
        }
        Ok(count)
    }

    async fn list_active_templates(&self) -> Result<Vec<Template>, StorageError> {
        let guard = self.templates.pin();
        let mut templates: Vec<Template> = guard
            .iter()
            .filter(|(_, t)| !t.is_trashed())
            .map(|(_, t)| t.clone())
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    // ==================== Pages ====================

    async fn page_exists_by_folder(&self, folder_name: &str) -> Result<bool, StorageError> {
        let guard = self.pages.pin();
        Ok(guard
            .iter()
            .any(|(_, p)| p.folder_name.as_deref() == Some(folder_name)))
    }

    async fn create_page(&self, new_page: NewPage) -> Result<Page, StorageError> {
        let now = OffsetDateTime::now_utc();
        let page = Page {
            id: self.next_id(),
            folder_name: new_page.folder_name,
            title: new_page.title,
            slug: new_page.slug,
            template_id: new_page.template_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let guard = self.pages.pin();
        guard.insert(page.id, page.clone());
        Ok(page)
    }

    async fn find_active_page_by_folder(
        &self,
        folder_name: &str,
    ) -> Result<Option<Page>, StorageError> {
        let guard = self.pages.pin();
        Ok(guard
            .iter()
            .find(|(_, p)| p.folder_name.as_deref() == Some(folder_name) && !p.is_trashed())
            .map(|(_, p)| p.clone()))
    }

    async fn soft_delete_page(&self, id: PageId) -> Result<Page, StorageError> {
        let guard = self.pages.pin();
        let mut page = guard
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("Page", id))?;
        page.mark_trashed();
        guard.insert(id, page.clone());
        Ok(page)
    }

    async fn restore_page(&self, id: PageId) -> Result<Page, StorageError> {
        let guard = self.pages.pin();
        let mut page = guard
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("Page", id))?;
        page.restore();
        guard.insert(id, page.clone());
        Ok(page)
    }

    async fn force_delete_page(&self, id: PageId) -> Result<(), StorageError> {
        let guard = self.pages.pin();
        guard
            .remove(&id)
            .ok_or_else(|| StorageError::not_found("Page", id))?;
        Ok(())
    }

    // ==================== Section definitions ====================

    async fn find_trashed_section_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<SectionDefinition>, StorageError> {
        let guard = self.sections.pin();
        Ok(guard
            .iter()
            .find(|(_, s)| s.slug == slug && s.is_trashed())
            .map(|(_, s)| s.clone()))
    }

    async fn restore_section(&self, id: SectionId) -> Result<SectionDefinition, StorageError> {
        let guard = self.sections.pin();
        let mut section = guard
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("SectionDefinition", id))?;
        section.restore();
        guard.insert(id, section.clone());
        Ok(section)
    }

    async fn upsert_section_by_slug(
        &self,
        upsert: SectionUpsert,
    ) -> Result<SectionDefinition, StorageError> {
        let now = OffsetDateTime::now_utc();
        let guard = self.sections.pin();

        if let Some((_, existing)) = guard
            .iter()
            .find(|(_, s)| s.slug == upsert.slug && !s.is_trashed())
        {
            let mut updated = existing.clone();
            updated.name = upsert.name;
            updated.field_schema = upsert.field_schema;
            updated.is_dynamic = upsert.is_dynamic;
            updated.order = upsert.order;
            updated.updated_at = now;
            guard.insert(updated.id, updated.clone());
            return Ok(updated);
        }

        if guard.iter().any(|(_, s)| s.slug == upsert.slug) {
            return Err(StorageError::already_exists("SectionDefinition", &upsert.slug));
        }

        let section = SectionDefinition {
            id: self.next_id(),
            slug: upsert.slug,
            name: upsert.name,
            field_schema: upsert.field_schema,
            is_dynamic: upsert.is_dynamic,
            order: upsert.order,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        guard.insert(section.id, section.clone());
        Ok(section)
    }

    async fn find_active_section_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<SectionDefinition>, StorageError> {
        let guard = self.sections.pin();
        Ok(guard
            .iter()
            .find(|(_, s)| s.slug == slug && !s.is_trashed())
            .map(|(_, s)| s.clone()))
    }

    async fn soft_delete_section(&self, id: SectionId) -> Result<SectionDefinition, StorageError> {
        let guard = self.sections.pin();
        let mut section = guard
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("SectionDefinition", id))?;
        section.mark_trashed();
        guard.insert(id, section.clone());
        Ok(section)
    }

    async fn list_dynamic_sections(&self) -> Result<Vec<SectionDefinition>, StorageError> {
        let guard = self.sections.pin();
        let mut sections: Vec<SectionDefinition> = guard
            .iter()
            .filter(|(_, s)| s.is_dynamic && !s.is_trashed())
            .map(|(_, s)| s.clone())
            .collect();
        sections.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
        Ok(sections)
    }

    // ==================== Page-section associations ====================

    async fn upsert_association(
        &self,
        page_id: PageId,
        section_id: SectionId,
        order: i64,
    ) -> Result<PageSectionAssociation, StorageError> {
        let now = OffsetDateTime::now_utc();
        let guard = self.associations.pin();

        if let Some((_, existing)) = guard.iter().find(|(_, a)| {
            a.page_id == page_id && a.section_id == section_id && !a.is_trashed()
        }) {
            let mut updated = existing.clone();
            updated.order = order;
            updated.updated_at = now;
            guard.insert(updated.id, updated.clone());
            return Ok(updated);
        }

        let association = PageSectionAssociation {
            id: self.next_id(),
            uuid: Uuid::new_v4(),
            page_id,
            section_id,
            order,
            data: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        guard.insert(association.id, association.clone());
        Ok(association)
    }

    async fn create_association(
        &self,
        page_id: PageId,
        section_id: SectionId,
        order: i64,
    ) -> Result<PageSectionAssociation, StorageError> {
        let now = OffsetDateTime::now_utc();
        let association = PageSectionAssociation {
            id: self.next_id(),
            uuid: Uuid::new_v4(),
            page_id,
            section_id,
            order,
            data: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let guard = self.associations.pin();
        guard.insert(association.id, association.clone());
        Ok(association)
    }

    async fn find_association_by_uuid(
        &self,
        uuid: Uuid,
    ) -> Result<Option<PageSectionAssociation>, StorageError> {
        let guard = self.associations.pin();
        Ok(guard
            .iter()
            .find(|(_, a)| a.uuid == uuid && !a.is_trashed())
            .map(|(_, a)| a.clone()))
    }

    async fn update_association(
        &self,
        id: AssociationId,
        data: FieldValues,
        order: i64,
    ) -> Result<PageSectionAssociation, StorageError> {
        let guard = self.associations.pin();
        let mut association = guard
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("PageSectionAssociation", id))?;
        association.data = Some(data);
        association.order = order;
        association.updated_at = OffsetDateTime::now_utc();
        guard.insert(id, association.clone());
        Ok(association)
    }

    async fn set_association_data(
        &self,
        id: AssociationId,
        data: FieldValues,
    ) -> Result<PageSectionAssociation, StorageError> {
        let guard = self.associations.pin();
        let mut association = guard
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("PageSectionAssociation", id))?;
        association.data = Some(data);
        association.updated_at = OffsetDateTime::now_utc();
        guard.insert(id, association.clone());
        Ok(association)
    }

    async fn soft_delete_associations_excluding(
        &self,
        page_id: PageId,
        keep: &HashSet<AssociationId>,
    ) -> Result<u64, StorageError> {
        let guard = self.associations.pin();
        let stale: Vec<PageSectionAssociation> = guard
            .iter()
            .filter(|(id, a)| a.page_id == page_id && !a.is_trashed() && !keep.contains(*id))
            .map(|(_, a)| a.clone())
            .collect();

        let count = stale.len() as u64;
        for mut association in stale {
            association.mark_trashed();
            guard.insert(association.id, association);
        }
        Ok(count)
    }

    async fn list_page_associations(
        &self,
        page_id: PageId,
    ) -> Result<Vec<PageSectionAssociation>, StorageError> {
        let guard = self.associations.pin();
        let mut associations: Vec<PageSectionAssociation> = guard
            .iter()
            .filter(|(_, a)| a.page_id == page_id && !a.is_trashed())
            .map(|(_, a)| a.clone())
            .collect();
        associations.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
        Ok(associations)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebuilder_core::FieldSchema;

    fn section_upsert(slug: &str, name: &str, order: i64) -> SectionUpsert {
        SectionUpsert {
            slug: slug.to_string(),
            name: name.to_string(),
            field_schema: FieldSchema::new(),
            is_dynamic: false,
            order,
        }
    }

    #[tokio::test]
    async fn test_template_upsert_is_idempotent() {
        let store = InMemoryCatalogStore::new();

        let first = store.upsert_template_by_name("home").await.unwrap();
        let second = store.upsert_template_by_name("home").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.list_active_templates().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_template_restore_clears_deleted_at() {
        let store = InMemoryCatalogStore::new();

        let template = store.upsert_template_by_name("landing").await.unwrap();
        store
            .soft_delete_templates_excluding(&HashSet::new())
            .await
            .unwrap();

        let trashed = store
            .find_trashed_template_by_name("landing")
            .await
            .unwrap()
            .expect("trashed row should be findable by name");
        assert_eq!(trashed.id, template.id);

        let restored = store.restore_template(trashed.id).await.unwrap();
        assert!(!restored.is_trashed());
        assert_eq!(restored.name, "landing");
        assert!(
            store
                .find_trashed_template_by_name("landing")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_template_upsert_conflicts_with_trashed_key() {
        let store = InMemoryCatalogStore::new();

        store.upsert_template_by_name("home").await.unwrap();
        store
            .soft_delete_templates_excluding(&HashSet::new())
            .await
            .unwrap();

        let result = store.upsert_template_by_name("home").await;
        assert!(matches!(
            result.unwrap_err(),
            StorageError::AlreadyExists { .. }
        ));
    }

    #[tokio::test]
    async fn test_soft_delete_complement() {
        let store = InMemoryCatalogStore::new();

        let keep = store.upsert_template_by_name("home").await.unwrap();
        store.upsert_template_by_name("about").await.unwrap();
        store.upsert_template_by_name("contact").await.unwrap();

        let mut keep_ids = HashSet::new();
        keep_ids.insert(keep.id);

        let pruned = store
            .soft_delete_templates_excluding(&keep_ids)
            .await
            .unwrap();
        assert_eq!(pruned, 2);

        let active = store.list_active_templates().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "home");

        // Second pass prunes nothing further
        let pruned = store
            .soft_delete_templates_excluding(&keep_ids)
            .await
            .unwrap();
        assert_eq!(pruned, 0);
    }

    #[tokio::test]
    async fn test_page_exists_includes_trashed() {
        let store = InMemoryCatalogStore::new();
        let template = store.upsert_template_by_name("home").await.unwrap();

        let page = store
            .create_page(NewPage::for_folder("home", "home", "home", template.id))
            .await
            .unwrap();

        assert!(store.page_exists_by_folder("home").await.unwrap());

        // Trashing hides the page from active lookups but not existence
        let trashed = store.soft_delete_page(page.id).await.unwrap();
        assert!(trashed.is_trashed());
        assert!(store.page_exists_by_folder("home").await.unwrap());
        assert!(
            store
                .find_active_page_by_folder("home")
                .await
                .unwrap()
                .is_none()
        );

        let restored = store.restore_page(page.id).await.unwrap();
        assert!(!restored.is_trashed());
    }

    #[tokio::test]
    async fn test_force_delete_page() {
        let store = InMemoryCatalogStore::new();
        let template = store.upsert_template_by_name("home").await.unwrap();
        let page = store
            .create_page(NewPage::for_folder("home", "home", "home", template.id))
            .await
            .unwrap();

        store.force_delete_page(page.id).await.unwrap();
        assert!(!store.page_exists_by_folder("home").await.unwrap());

        let result = store.force_delete_page(page.id).await;
        assert!(matches!(result.unwrap_err(), StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_section_upsert_updates_in_place() {
        let store = InMemoryCatalogStore::new();

        let first = store
            .upsert_section_by_slug(section_upsert("home-hero", "hero", 0))
            .await
            .unwrap();
        let second = store
            .upsert_section_by_slug(section_upsert("home-hero", "hero", 3))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.order, 3);
    }

    #[tokio::test]
    async fn test_section_trash_and_restore_by_slug() {
        let store = InMemoryCatalogStore::new();

        let section = store
            .upsert_section_by_slug(section_upsert("home-hero", "hero", 0))
            .await
            .unwrap();
        assert!(
            store
                .find_active_section_by_slug("home-hero")
                .await
                .unwrap()
                .is_some()
        );

        store.soft_delete_section(section.id).await.unwrap();
        assert!(
            store
                .find_active_section_by_slug("home-hero")
                .await
                .unwrap()
                .is_none()
        );

        let trashed = store
            .find_trashed_section_by_slug("home-hero")
            .await
            .unwrap()
            .expect("trashed row should be findable by slug");
        assert_eq!(trashed.id, section.id);

        let restored = store.restore_section(trashed.id).await.unwrap();
        assert!(!restored.is_trashed());
        assert_eq!(restored.slug, "home-hero");
    }

    #[tokio::test]
    async fn test_association_upsert_keyed_on_page_and_section() {
        let store = InMemoryCatalogStore::new();

        let first = store.upsert_association(1, 10, 0).await.unwrap();
        let second = store.upsert_association(1, 10, 5).await.unwrap();
        let other_page = store.upsert_association(2, 10, 0).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.uuid, second.uuid);
        assert_eq!(second.order, 5);
        assert_ne!(first.id, other_page.id);
    }

    #[tokio::test]
    async fn test_association_data_seeding_preserved_on_upsert() {
        let store = InMemoryCatalogStore::new();

        let association = store.upsert_association(1, 10, 0).await.unwrap();
        assert!(association.data.is_none());

        let mut data = FieldValues::new();
        data.insert("title".to_string(), serde_json::json!("Welcome"));
        store
            .set_association_data(association.id, data)
            .await
            .unwrap();

        // Upsert touches order only; operator data survives
        let after = store.upsert_association(1, 10, 2).await.unwrap();
        assert_eq!(
            after.data.as_ref().unwrap()["title"],
            serde_json::json!("Welcome")
        );
    }

    #[tokio::test]
    async fn test_association_uuid_is_stable_across_updates() {
        let store = InMemoryCatalogStore::new();

        let association = store.create_association(1, 10, 0).await.unwrap();
        let updated = store
            .update_association(association.id, FieldValues::new(), 4)
            .await
            .unwrap();

        assert_eq!(association.uuid, updated.uuid);
        assert_eq!(updated.order, 4);

        let by_uuid = store
            .find_association_by_uuid(association.uuid)
            .await
            .unwrap()
            .expect("uuid lookup should resolve");
        assert_eq!(by_uuid.id, association.id);
    }

    #[tokio::test]
    async fn test_list_page_associations_ordered() {
        let store = InMemoryCatalogStore::new();

        store.create_association(1, 10, 2).await.unwrap();
        store.create_association(1, 11, 0).await.unwrap();
        store.create_association(1, 12, 1).await.unwrap();
        store.create_association(2, 13, 0).await.unwrap();

        let associations = store.list_page_associations(1).await.unwrap();
        let orders: Vec<i64> = associations.iter().map(|a| a.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert!(associations.iter().all(|a| a.page_id == 1));
    }

    #[tokio::test]
    async fn test_soft_delete_associations_scoped_to_page() {
        let store = InMemoryCatalogStore::new();

        let keep = store.create_association(1, 10, 0).await.unwrap();
        store.create_association(1, 11, 1).await.unwrap();
        let other_page = store.create_association(2, 10, 0).await.unwrap();

        let mut keep_ids = HashSet::new();
        keep_ids.insert(keep.id);

        let pruned = store
            .soft_delete_associations_excluding(1, &keep_ids)
            .await
            .unwrap();
        assert_eq!(pruned, 1);

        assert_eq!(store.list_page_associations(1).await.unwrap().len(), 1);
        assert_eq!(store.list_page_associations(2).await.unwrap().len(), 1);
        assert_eq!(
            store.list_page_associations(2).await.unwrap()[0].id,
            other_page.id
        );
    }

    #[tokio::test]
    async fn test_template_options() {
        let store = InMemoryCatalogStore::new();
        store.upsert_template_by_name("home").await.unwrap();
        store.upsert_template_by_name("about").await.unwrap();

        let options = store.template_options().await.unwrap();
        let names: Vec<&str> = options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["about", "home"]);
    }
}
