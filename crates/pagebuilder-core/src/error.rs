use thiserror::Error;

/// Core error types for Pagebuilder catalog operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Section key must be a non-empty string (template '{template}')")]
    EmptySectionKey { template: String },

    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new EmptySectionKey error
    pub fn empty_section_key(template: impl Into<String>) -> Self {
        Self::EmptySectionKey {
            template: template.into(),
        }
    }

    /// Create a new UnknownFieldType error
    pub fn unknown_field_type(value: impl Into<String>) -> Self {
        Self::UnknownFieldType(value.into())
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Validates that a section key is usable as a catalog name.
///
/// Only the empty string is rejected. All-numeric or otherwise unusual keys
/// are accepted as long as they are non-empty.
pub fn validate_section_key(template: &str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CoreError::empty_section_key(template));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::empty_section_key("home");
        assert_eq!(
            err.to_string(),
            "Section key must be a non-empty string (template 'home')"
        );

        let err = CoreError::unknown_field_type("blob");
        assert_eq!(err.to_string(), "Unknown field type: blob");
    }

    #[test]
    fn test_validate_section_key() {
        assert!(validate_section_key("home", "hero").is_ok());
        // numeric and zero-like keys are valid; only empty is rejected
        assert!(validate_section_key("home", "0").is_ok());
        assert!(validate_section_key("home", "42").is_ok());
        assert!(validate_section_key("home", "").is_err());
    }
}
