pub mod catalog;
pub mod error;
pub mod schema;
pub mod slug;

pub use catalog::{
    AssociationId, Page, PageId, PageSectionAssociation, SectionDefinition, SectionId, Template,
    TemplateId,
};
pub use error::{CoreError, Result, validate_section_key};
pub use schema::{FieldConfig, FieldSchema, FieldType, FieldValues};
pub use slug::{human_name, slugify};
