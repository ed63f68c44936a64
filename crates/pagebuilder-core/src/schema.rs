//! Field-schema model for section definitions.
//!
//! A section definition carries an ordered mapping of field name to field
//! configuration. The mapping order is the order fields were declared in the
//! template's configuration descriptor, and it is preserved all the way into
//! the persisted catalog so editing surfaces can render fields in authoring
//! order.

use crate::error::CoreError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The kind of input a section field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Number,
    Boolean,
    Image,
    Select,
}

impl FieldType {
    /// Returns the canonical descriptor string for this field type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Image => "image",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "textarea" => Ok(Self::Textarea),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "image" => Ok(Self::Image),
            "select" => Ok(Self::Select),
            other => Err(CoreError::unknown_field_type(other)),
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FieldType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Configuration of a single section field.
///
/// An empty descriptor table (`title = {}`) is a valid field: it defaults to
/// a plain text input with no label and no constraints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldConfig {
    /// The input kind, defaulting to `text`.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Human-facing label; falls back to the field name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether the editing surface should require a value.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Allowed values for `select` fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldConfig {
    /// Creates a field configuration of the given type with no constraints.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Self::default()
        }
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Marks the field as required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Ordered mapping of field name to field configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema(pub IndexMap<String, FieldConfig>);

impl FieldSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldConfig)> {
        self.0.iter()
    }

    /// Returns the field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Builds the initial `data` payload for a brand-new association:
    /// every field name mapped to an empty string value.
    pub fn seed_values(&self) -> FieldValues {
        self.0
            .keys()
            .map(|name| (name.clone(), Value::String(String::new())))
            .collect()
    }
}

impl FromIterator<(String, FieldConfig)> for FieldSchema {
    fn from_iter<I: IntoIterator<Item = (String, FieldConfig)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Operator-entered values for an association, keyed by field name.
pub type FieldValues = IndexMap<String, Value>;
