//! Storage types for the catalog store abstraction layer.

use pagebuilder_core::{FieldSchema, TemplateId};
use serde::{Deserialize, Serialize};

/// Payload for creating a page.
///
/// The sync pass builds this once per newly discovered non-dynamic template
/// directory; the store assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPage {
    /// Directory the page was created from; `None` for dynamic-template pages.
    pub folder_name: Option<String>,
    pub title: String,
    pub slug: String,
    pub template_id: TemplateId,
}

impl NewPage {
    /// Creates a page payload bound to a template directory.
    #[must_use]
    pub fn for_folder(
        folder_name: impl Into<String>,
        title: impl Into<String>,
        slug: impl Into<String>,
        template_id: TemplateId,
    ) -> Self {
        Self {
            folder_name: Some(folder_name.into()),
            title: title.into(),
            slug: slug.into(),
            template_id,
        }
    }
}

/// Payload for update-or-create of a section definition, keyed by `slug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionUpsert {
    /// Globally unique key: `{template directory}-{section key}`.
    pub slug: String,
    /// The raw section key.
    pub name: String,
    pub field_schema: FieldSchema,
    pub is_dynamic: bool,
    /// Position within the defining configuration descriptor.
    pub order: i64,
}

/// An active template reduced to what a select input needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOption {
    pub id: TemplateId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_page_for_folder() {
        let page = NewPage::for_folder("about-us", "about-us", "about-us", 3);
        assert_eq!(page.folder_name.as_deref(), Some("about-us"));
        assert_eq!(page.template_id, 3);
    }

    #[test]
    fn test_section_upsert_serialization() {
        let upsert = SectionUpsert {
            slug: "home-hero".to_string(),
            name: "hero".to_string(),
            field_schema: FieldSchema::new(),
            is_dynamic: false,
            order: 0,
        };

        let json = serde_json::to_string(&upsert).expect("serialization failed");
        let back: SectionUpsert = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(back, upsert);
    }
}
