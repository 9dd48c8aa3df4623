//! Boolean field

use super::{FieldBase, impl_common_builders};
use crate::error::TransformError;
use crate::i18n::MessageKey;
use crate::result::ValidationResult;
use crate::value::Value;

/// Strict boolean field. `"true"` and `1` are type errors.
#[derive(Debug, Clone, Default)]
pub struct BooleanField {
    base: FieldBase,
}

impl_common_builders!(BooleanField, base, bool, Value::as_bool);

impl BooleanField {
    /// Creates an optional boolean field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default substitution and user transforms.
    pub fn clean(&self, raw: Value) -> Result<Value, TransformError> {
        self.base.apply_transforms(raw)
    }

    /// Presence, type, then custom rules.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        if !self.base.check_presence(path, value, result) {
            return;
        }
        if value.as_bool().is_none() {
            result.add_message(path, MessageKey::Boolean, &[&self.base.label_for(path)]);
            return;
        }
        self.base.run_custom(path, value, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::field::{Field, boolean};

    #[test]
    fn test_strict() {
        let field = Field::from(boolean().label("Terms"));
        for bad in [Value::from("true"), Value::from(1)] {
            let mut result = ValidationResult::default();
            field.validate("terms", &bad, &mut result);
            assert_eq!(result.field_errors("terms"), ["Terms must be a boolean value"]);
        }
    }

    #[test]
    fn test_custom_sees_bool() {
        let field = Field::from(boolean().custom(|accepted: bool| {
            if accepted {
                Ok(())
            } else {
                Err(ValidationError::custom("terms must be accepted"))
            }
        }));
        let mut result = ValidationResult::default();
        field.validate("terms", &Value::from(false), &mut result);
        assert_eq!(result.field_errors("terms"), ["terms must be accepted"]);
    }
}
