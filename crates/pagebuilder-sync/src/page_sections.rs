//! Per-request reconciliation of a page's section associations.
//!
//! An editor submission is an ordered list of entries: new attachments carry
//! a section definition id, existing ones carry the association's stable
//! uuid together with the operator-entered data. The submission is total:
//! any association of the page not present in the list is soft-deleted.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use pagebuilder_core::{AssociationId, FieldValues, PageId, PageSectionAssociation, SectionId};
use pagebuilder_storage::{CatalogStore, StorageError};

/// One entry of an editor submission.
///
/// Deserializes from the wire forms `{"uuid": ..., "data": ..., "order"?}`
/// (existing association) and `{"id": ..., "order"?}` (new attachment). When
/// `order` is omitted the entry's index in the submitted list is used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SectionEntry {
    /// Update of an existing association, addressed by uuid.
    Existing {
        uuid: Uuid,
        #[serde(default)]
        data: FieldValues,
        #[serde(default)]
        order: Option<i64>,
    },
    /// Attachment of a section definition not yet on the page.
    New {
        id: SectionId,
        #[serde(default)]
        order: Option<i64>,
    },
}

impl SectionEntry {
    /// Entry attaching a section definition to the page.
    #[must_use]
    pub fn new_section(id: SectionId) -> Self {
        Self::New { id, order: None }
    }

    /// Entry updating an existing association.
    #[must_use]
    pub fn existing(uuid: Uuid, data: FieldValues) -> Self {
        Self::Existing {
            uuid,
            data,
            order: None,
        }
    }

    /// Pins the entry to an explicit position instead of its list index.
    #[must_use]
    pub fn at_order(mut self, position: i64) -> Self {
        match &mut self {
            Self::Existing { order, .. } | Self::New { order, .. } => *order = Some(position),
        }
        self
    }
}

/// Reconciles a page's associations against one editor submission.
///
/// Entries are applied in list order; each resulting association id is kept,
/// and every other association of the page is soft-deleted afterwards.
/// Returns the page's final active associations ordered by `order`.
///
/// The operation is idempotent per submission and total: a section omitted
/// from the list is always removed from the page, never left dangling.
///
/// # Errors
///
/// Store errors propagate directly; partial application is never
/// acceptable here, so there is no catch-all. An entry whose uuid does not
/// resolve yields `StorageError::NotFound`.
#[instrument(skip(store, entries), fields(entries = entries.len()))]
pub async fn reconcile_page_sections(
    store: &dyn CatalogStore,
    page_id: PageId,
    entries: Vec<SectionEntry>,
) -> Result<Vec<PageSectionAssociation>, StorageError> {
    let mut kept: HashSet<AssociationId> = HashSet::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let association = match entry {
            SectionEntry::New { id, order } => {
                store
                    .create_association(page_id, id, order.unwrap_or(index as i64))
                    .await?
            }
            SectionEntry::Existing { uuid, data, order } => {
                let existing = store
                    .find_association_by_uuid(uuid)
                    .await?
                    .ok_or_else(|| StorageError::not_found("PageSectionAssociation", uuid))?;
                store
                    .update_association(existing.id, data, order.unwrap_or(index as i64))
                    .await?
            }
        };
        kept.insert(association.id);
    }

    store
        .soft_delete_associations_excluding(page_id, &kept)
        .await?;

    store.list_page_associations(page_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebuilder_db_memory::InMemoryCatalogStore;
    use serde_json::json;

    #[test]
    fn test_entry_deserialization() {
        let entry: SectionEntry =
            serde_json::from_value(json!({"id": 5, "order": 2})).unwrap();
        assert_eq!(entry, SectionEntry::new_section(5).at_order(2));

        let uuid = Uuid::new_v4();
        let entry: SectionEntry =
            serde_json::from_value(json!({"uuid": uuid, "data": {"title": "Hi"}})).unwrap();
        match entry {
            SectionEntry::Existing { uuid: got, data, order } => {
                assert_eq!(got, uuid);
                assert_eq!(data["title"], json!("Hi"));
                assert!(order.is_none());
            }
            other => panic!("expected existing entry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submission_is_total() {
        let store = InMemoryCatalogStore::new();

        let keep = store.create_association(1, 10, 0).await.unwrap();
        store.create_association(1, 11, 1).await.unwrap();

        let mut data = FieldValues::new();
        data.insert("title".to_string(), json!("kept"));

        let result = reconcile_page_sections(
            &store,
            1,
            vec![
                SectionEntry::existing(keep.uuid, data),
                SectionEntry::new_section(12),
            ],
        )
        .await
        .unwrap();

        // exactly the submitted entries survive; the omitted one is trashed
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].uuid, keep.uuid);
        assert_eq!(result[0].data.as_ref().unwrap()["title"], json!("kept"));
        assert_eq!(result[1].section_id, 12);
    }

    #[tokio::test]
    async fn test_order_falls_back_to_list_index() {
        let store = InMemoryCatalogStore::new();

        let result = reconcile_page_sections(
            &store,
            1,
            vec![
                SectionEntry::new_section(10),
                SectionEntry::new_section(11),
                SectionEntry::new_section(12).at_order(99),
            ],
        )
        .await
        .unwrap();

        let orders: Vec<i64> = result.iter().map(|a| a.order).collect();
        assert_eq!(orders, vec![0, 1, 99]);
    }

    #[tokio::test]
    async fn test_unknown_uuid_is_an_error() {
        let store = InMemoryCatalogStore::new();

        let result = reconcile_page_sections(
            &store,
            1,
            vec![SectionEntry::existing(Uuid::new_v4(), FieldValues::new())],
        )
        .await;

        assert!(matches!(
            result.unwrap_err(),
            StorageError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_submission_clears_the_page() {
        let store = InMemoryCatalogStore::new();
        store.create_association(1, 10, 0).await.unwrap();
        store.create_association(1, 11, 1).await.unwrap();

        let result = reconcile_page_sections(&store, 1, Vec::new()).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_section_allowed_by_editor_input() {
        let store = InMemoryCatalogStore::new();

        let result = reconcile_page_sections(
            &store,
            1,
            vec![
                SectionEntry::new_section(10),
                SectionEntry::new_section(10),
            ],
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 2);
        assert_ne!(result[0].uuid, result[1].uuid);
        assert!(result.iter().all(|a| a.section_id == 10));
    }

    #[tokio::test]
    async fn test_other_pages_untouched() {
        let store = InMemoryCatalogStore::new();
        store.create_association(2, 10, 0).await.unwrap();

        reconcile_page_sections(&store, 1, vec![SectionEntry::new_section(11)])
            .await
            .unwrap();

        assert_eq!(store.list_page_associations(2).await.unwrap().len(), 1);
    }
}
