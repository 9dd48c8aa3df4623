//! UUID field

use super::{FieldBase, impl_common_builders};
use crate::error::TransformError;
use crate::i18n::MessageKey;
use crate::result::ValidationResult;
use crate::rules;
use crate::value::Value;

/// Lowercase hyphenated UUID, optionally pinned to a version.
#[derive(Debug, Clone, Default)]
pub struct UuidField {
    base: FieldBase,
    version: u8,
}

impl_common_builders!(UuidField, base, &str, Value::as_str);

impl UuidField {
    /// Creates an optional field accepting any version.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the version: 1, 3, 4 or 5. 0 accepts any.
    #[must_use = "builder methods must be chained or built"]
    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Default substitution and user transforms.
    pub fn clean(&self, raw: Value) -> Result<Value, TransformError> {
        self.base.apply_transforms(raw)
    }

    /// Presence, type, format, then custom rules.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        if !self.base.check_presence(path, value, result) {
            return;
        }
        let label = self.base.label_for(path);
        let Some(s) = value.as_str() else {
            result.add_message(path, MessageKey::String, &[&label]);
            return;
        };
        if !rules::is_valid_uuid(s, self.version) {
            result.add_message(path, MessageKey::Uuid, &[&label]);
        }
        self.base.run_custom(path, value, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, uuid};

    #[test]
    fn test_version_pinned() {
        let field = Field::from(uuid().version(4).label("ID"));
        let mut result = ValidationResult::default();
        field.validate("id", &Value::from("550e8400-e29b-41d4-a716-446655440000"), &mut result);
        assert!(!result.has_errors());

        field.validate("id", &Value::from("6ba7b810-9dad-11d1-80b4-00c04fd430c8"), &mut result);
        assert_eq!(result.field_errors("id"), ["ID must be a valid UUID"]);
    }
}
