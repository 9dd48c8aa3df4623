//! List field

use std::collections::HashSet;

use super::{Field, FieldBase, impl_common_builders};
use crate::error::TransformError;
use crate::i18n::MessageKey;
use crate::result::ValidationResult;
use crate::value::Value;

/// Ordered list, optionally with a schema applied to every element.
///
/// Element failures are recorded under `path[i]`.
///
/// ```rust,ignore
/// use sieve_validator::prelude::*;
///
/// let emails = array().of(email().trim()).min(1).unique();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListField {
    base: FieldBase,
    element: Option<Box<Field>>,
    min: Option<usize>,
    max: Option<usize>,
    not_empty: bool,
    unique: bool,
    contains: Option<Value>,
}

impl_common_builders!(ListField, base, &[Value], Value::as_array);

impl ListField {
    /// Creates an optional list field without an element schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `element` to every item during transform and validation.
    #[must_use = "builder methods must be chained or built"]
    pub fn of(mut self, element: impl Into<Field>) -> Self {
        self.element = Some(Box::new(element.into()));
        self
    }

    /// Minimum number of elements.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, len: usize) -> Self {
        self.min = Some(len);
        self
    }

    /// Maximum number of elements.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, len: usize) -> Self {
        self.max = Some(len);
        self
    }

    /// Rejects an empty list.
    #[must_use = "builder methods must be chained or built"]
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Rejects duplicates, compared by their text rendering.
    #[must_use = "builder methods must be chained or built"]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Requires an element equal to `needle` by text rendering.
    #[must_use = "builder methods must be chained or built"]
    pub fn contains(mut self, needle: impl Into<Value>) -> Self {
        self.contains = Some(needle.into());
        self
    }

    /// Default substitution, user transforms, then element transforms.
    pub fn clean(&self, raw: Value) -> Result<Value, TransformError> {
        let value = self.base.apply_transforms(raw)?;
        let Some(element) = &self.element else {
            return Ok(value);
        };
        match value {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    element
                        .transform(item)
                        .map_err(|source| TransformError::Element {
                            index,
                            source: Box::new(source),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(TransformError::mismatch("array", &other)),
        }
    }

    /// Presence, type, size and content checks, elements, then custom rules.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        if !self.base.check_presence(path, value, result) {
            return;
        }
        let label = self.base.label_for(path);
        let Some(items) = value.as_array() else {
            result.add_message(path, MessageKey::Array, &[&label]);
            return;
        };

        if let Some(min) = self.min
            && items.len() < min
        {
            result.add_message(path, MessageKey::MinElements, &[&label, &min]);
        }
        if let Some(max) = self.max
            && items.len() > max
        {
            result.add_message(path, MessageKey::MaxElements, &[&label, &max]);
        }
        if self.not_empty && items.is_empty() {
            result.add_message(path, MessageKey::NotEmpty, &[&label]);
        }
        if self.unique {
            let mut seen = HashSet::with_capacity(items.len());
            if !items.iter().all(|item| seen.insert(item.to_string())) {
                result.add_message(path, MessageKey::Unique, &[&label]);
            }
        }
        if let Some(needle) = &self.contains {
            let needle_text = needle.to_string();
            if !items.iter().any(|item| item.to_string() == needle_text) {
                result.add_message(path, MessageKey::ArrayContains, &[&label, needle]);
            }
        }

        if let Some(element) = &self.element {
            for (i, item) in items.iter().enumerate() {
                element.validate(&format!("{path}[{i}]"), item, result);
            }
        }

        self.base.run_custom(path, value, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{array, email, number, text};
    use pretty_assertions::assert_eq;

    fn run(field: ListField, value: Value) -> ValidationResult {
        let field = Field::from(field);
        let mut result = ValidationResult::default();
        let cleaned = field.transform(value).unwrap();
        field.validate("emails", &cleaned, &mut result);
        result
    }

    #[test]
    fn test_element_paths() {
        let result = run(
            array().of(email().trim()),
            Value::from(vec![" a@b.com ", "not-an-email"]),
        );
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.field_errors("emails[1]"), ["emails[1] must be a valid email address"]);
    }

    #[test]
    fn test_element_transform_applied() {
        let cleaned = array()
            .of(text().trim())
            .clean(Value::from(vec!["  x ", "y  "]))
            .unwrap();
        assert_eq!(cleaned, Value::from(vec!["x", "y"]));
    }

    #[test]
    fn test_element_transform_failure_carries_index() {
        let field = array().of(text().transform(|v| match v.as_str() {
            Some("bad") => Err(TransformError::custom("rejected")),
            _ => Ok(v),
        }));
        let err = field.clean(Value::from(vec!["ok", "bad"])).unwrap_err();
        assert_eq!(err.to_string(), "index 1: rejected");
    }

    #[test]
    fn test_size_and_content() {
        let result = run(
            array().min(3).unique().contains("admin"),
            Value::from(vec!["ops", "ops"]),
        );
        assert_eq!(
            result.field_errors("emails"),
            [
                "emails must contain at least 3 elements",
                "emails must contain unique elements",
                "emails must contain admin",
            ]
        );
    }

    #[test]
    fn test_unique_compares_rendering() {
        let result = run(array().unique(), Value::from(vec![Value::from(1), Value::from("1")]));
        assert_eq!(result.field_errors("emails"), ["emails must contain unique elements"]);
    }

    #[test]
    fn test_not_empty_and_type() {
        assert_eq!(
            run(array().not_empty(), Value::Array(vec![])).field_errors("emails"),
            ["emails cannot be empty"]
        );
        let field = Field::from(array().of(number()));
        let mut result = ValidationResult::default();
        field.validate("emails", &Value::from("x"), &mut result);
        assert_eq!(result.field_errors("emails"), ["emails must be an array"]);
    }
}
