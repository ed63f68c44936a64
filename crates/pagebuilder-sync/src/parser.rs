//! Section definition parser.
//!
//! Turns one template's configuration descriptor into an ordered sequence of
//! section definitions. The descriptor is a TOML mapping of section key to a
//! section table; inside a section table an optional `is_dynamic` boolean
//! marks the section dynamic and is not itself a field:
//!
//! ```toml
//! [hero]
//! title = { type = "text", label = "Title" }
//! body = { type = "textarea" }
//!
//! [banner]
//! is_dynamic = true
//! image = { type = "image" }
//! ```
//!
//! Parsing is all-or-nothing per template: any malformed entry rejects the
//! whole descriptor with a configuration error naming the template.

use crate::error::SyncError;
use indexmap::IndexMap;
use pagebuilder_core::{FieldConfig, FieldSchema, validate_section_key};
use serde::Deserialize;

/// One section table as written in the descriptor. The `is_dynamic` flag is
/// lifted out here so it never reaches the persisted field schema.
#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    is_dynamic: Option<bool>,
    #[serde(flatten)]
    fields: IndexMap<String, FieldConfig>,
}

/// A section parsed from a descriptor, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSection {
    /// The raw section key.
    pub key: String,
    /// Resolved dynamic flag: forced when the owning template is dynamic,
    /// otherwise the descriptor's explicit `is_dynamic`.
    pub is_dynamic: bool,
    /// Field schema with the `is_dynamic` metadata stripped.
    pub fields: FieldSchema,
}

/// Parses a template's configuration descriptor.
///
/// An empty descriptor yields an empty sequence; that is not an error.
///
/// # Errors
///
/// Returns `SyncError::Configuration` for malformed TOML, an empty section
/// key, or an unknown field type. The error names `template` so a full sync
/// can isolate the failure to this template.
pub fn parse_sections(
    template: &str,
    source: &str,
    template_is_dynamic: bool,
) -> Result<Vec<ParsedSection>, SyncError> {
    let raw: IndexMap<String, RawSection> =
        toml::from_str(source).map_err(|e| SyncError::configuration(template, e.to_string()))?;

    let mut sections = Vec::with_capacity(raw.len());
    for (key, section) in raw {
        validate_section_key(template, &key)
            .map_err(|e| SyncError::configuration(template, e.to_string()))?;

        let is_dynamic = if template_is_dynamic {
            // Sections in the dynamic namespace are always reusable,
            // whatever the descriptor says.
            true
        } else {
            section.is_dynamic.unwrap_or(false)
        };

        sections.push(ParsedSection {
            key,
            is_dynamic,
            fields: FieldSchema(section.fields),
        });
    }

    Ok(sections)
}
