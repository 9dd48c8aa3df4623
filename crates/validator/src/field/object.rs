//! Nested record field

use super::{Field, FieldBase, Shape, impl_common_builders};
use crate::error::TransformError;
use crate::i18n::MessageKey;
use crate::result::ValidationResult;
use crate::value::{Record, Value};

/// Nested record validated against its own shape.
///
/// Child failures are recorded under `path.child`. Keys outside the shape
/// pass through transform untouched and are never checked.
///
/// ```rust,ignore
/// use sieve_validator::prelude::*;
///
/// let user = object()
///     .field("name", text().required())
///     .field("age", number().integer());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectField {
    base: FieldBase,
    shape: Shape,
}

impl_common_builders!(ObjectField, base, &Record, Value::as_object);

impl ObjectField {
    /// Creates an optional record field with an empty shape.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole child shape.
    #[must_use = "builder methods must be chained or built"]
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Adds or replaces one child.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, key: impl Into<String>, field: impl Into<Field>) -> Self {
        self.shape.insert(key.into(), field.into());
        self
    }

    /// Child shape.
    #[must_use]
    pub const fn children(&self) -> &Shape {
        &self.shape
    }

    /// Default substitution, user transforms, then child transforms.
    ///
    /// A child is written back when the input carried its key or its
    /// transform produced a non-null value, so defaults can fill in
    /// missing keys.
    pub fn clean(&self, raw: Value) -> Result<Value, TransformError> {
        let mut record = match self.base.apply_transforms(raw)? {
            Value::Object(record) => record,
            Value::Null => return Ok(Value::Null),
            other => return Err(TransformError::mismatch("object", &other)),
        };

        for (key, child) in &self.shape {
            let present = record.contains_key(key);
            let sub = record.get(key).cloned().unwrap_or_default();
            let cleaned = child.transform(sub).map_err(|source| TransformError::Child {
                field: key.clone(),
                source: Box::new(source),
            })?;
            if present || !cleaned.is_null() {
                record.insert(key.clone(), cleaned);
            }
        }
        Ok(Value::Object(record))
    }

    /// Presence, type, children, then custom rules.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        if !self.base.check_presence(path, value, result) {
            return;
        }
        let Some(record) = value.as_object() else {
            result.add_message(path, MessageKey::Object, &[&self.base.label_for(path)]);
            return;
        };

        for (key, child) in &self.shape {
            let sub = record.get(key).unwrap_or(&Value::Null);
            child.validate(&format!("{path}.{key}"), sub, result);
        }

        self.base.run_custom(path, value, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{number, object, text};
    use crate::record;
    use pretty_assertions::assert_eq;

    fn user() -> ObjectField {
        object()
            .field("name", text().trim().required())
            .field("role", text().default_value("member"))
    }

    #[test]
    fn test_nested_path() {
        let field = Field::from(user());
        let mut result = ValidationResult::default();
        field.validate("user", &Value::from(record! { "name" => Value::Null }), &mut result);
        assert_eq!(result.field_errors("user.name"), ["user.name is required"]);
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_transform_keeps_extra_keys_and_fills_defaults() {
        let cleaned = user()
            .clean(Value::from(record! { "name" => "  Ada ", "extra" => 1 }))
            .unwrap();
        assert_eq!(
            cleaned,
            Value::from(record! { "name" => "Ada", "extra" => 1, "role" => "member" })
        );
    }

    #[test]
    fn test_child_transform_failure_names_key() {
        let field = object().field("when", crate::field::date());
        let err = field
            .clean(Value::from(record! { "when" => "soon" }))
            .unwrap_err();
        assert!(err.to_string().starts_with("field 'when': "));
    }

    #[test]
    fn test_deep_nesting() {
        let field = Field::from(object().field("address", object().field("zip", number().integer())));
        let mut result = ValidationResult::default();
        let data = Value::from(record! { "address" => record! { "zip" => 1.5 } });
        field.validate("user", &data, &mut result);
        assert_eq!(result.field_errors("user.address.zip"), ["user.address.zip must be an integer"]);
    }
}
