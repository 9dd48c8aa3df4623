//! Record schema
//!
//! A [`Schema`] validates a whole record in four passes:
//!
//! 1. **Transform**: every shape field cleans its raw value. A failure is
//!    recorded under the field key and the key is left out of the cleaned
//!    record.
//! 2. **Validate**: every shape field checks its cleaned value (null when
//!    the transform failed or the key was absent).
//! 3. **Conditional**: every [`when`](Schema::when) rule whose trigger field
//!    equals the expected value builds its sub-schema and merges that
//!    schema's errors.
//! 4. **Cross-field**: runs only when passes 1 and 2 recorded nothing.
//!    Failures go under [`CROSS_VALIDATION_KEY`](crate::result::CROSS_VALIDATION_KEY).
//!
//! The cleaned record is published as [`valid_data`](ValidationResult::valid_data)
//! only when no pass recorded an error.
//!
//! # Examples
//!
//! ```rust,ignore
//! use sieve_validator::prelude::*;
//!
//! let schema = Schema::new()
//!     .shape(shape! {
//!         "password" => text().password().required(),
//!         "password_confirm" => text().required(),
//!     })
//!     .cross_validate(|data| {
//!         if data.get("password") == data.get("password_confirm") {
//!             Ok(())
//!         } else {
//!             Err(ValidationError::custom("passwords do not match"))
//!         }
//!     });
//!
//! let result = schema.validate(&record! {
//!     "password" => "Str0ng!Pass99",
//!     "password_confirm" => "Str0ng!Pass99",
//! });
//! assert!(!result.has_errors());
//! ```

#[cfg(feature = "async")]
mod deferred;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::ValidatorConfig;
use crate::error::ValidationError;
use crate::field::{Field, Shape};
use crate::i18n::{MessageKey, Translator};
use crate::result::{CROSS_VALIDATION_KEY, ValidationResult};
use crate::value::{Record, Value};

#[cfg(feature = "async")]
pub use deferred::AsyncContext;

/// Validator over the whole cleaned record.
pub type CrossValidatorFn = Arc<dyn Fn(&Record) -> Result<(), ValidationError> + Send + Sync>;

/// Builds the sub-schema of a conditional rule on demand.
pub type SchemaFactory = Arc<dyn Fn() -> Schema + Send + Sync>;

// ============================================================================
// CONDITIONAL RULE
// ============================================================================

/// Sub-schema applied when a field equals a given value.
#[derive(Clone)]
pub struct ConditionalRule {
    trigger: String,
    expected: Value,
    factory: SchemaFactory,
}

impl ConditionalRule {
    /// Field whose cleaned value is compared.
    #[must_use]
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Value that activates the rule.
    #[must_use]
    pub const fn expected(&self) -> &Value {
        &self.expected
    }

    fn matches(&self, cleaned: &Record) -> bool {
        cleaned.get(&self.trigger) == Some(&self.expected)
    }
}

impl fmt::Debug for ConditionalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalRule")
            .field("trigger", &self.trigger)
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Shape plus record-level rules.
#[derive(Clone, Default)]
pub struct Schema {
    shape: Shape,
    cross: Vec<CrossValidatorFn>,
    conditionals: Vec<ConditionalRule>,
    translator: Translator,
}

/// Output of the transform and field passes.
struct FieldPass {
    result: ValidationResult,
    cleaned: Record,
    /// Keys whose transform failed.
    failed: Vec<String>,
}

impl Schema {
    /// Creates an empty schema with the built-in English catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole shape.
    #[must_use = "builder methods must be chained or built"]
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Adds or replaces one field.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, key: impl Into<String>, field: impl Into<Field>) -> Self {
        self.shape.insert(key.into(), field.into());
        self
    }

    /// Appends a cross-field validator.
    #[must_use = "builder methods must be chained or built"]
    pub fn cross_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.cross.push(Arc::new(f));
        self
    }

    /// Applies the schema built by `factory` when `trigger` equals
    /// `expected` after transform. Every matching rule runs.
    #[must_use = "builder methods must be chained or built"]
    pub fn when<F>(mut self, trigger: impl Into<String>, expected: impl Into<Value>, factory: F) -> Self
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        self.conditionals.push(ConditionalRule {
            trigger: trigger.into(),
            expected: expected.into(),
            factory: Arc::new(factory),
        });
        self
    }

    /// Formats messages in `locale`, using the current catalog.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_locale(mut self, locale: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        self.translator = self.translator.with_locale(locale);
        self
    }

    /// Replaces the translator.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    /// Applies the locale settings of a [`ValidatorConfig`].
    #[must_use = "builder methods must be chained or built"]
    pub fn with_config(self, config: &ValidatorConfig) -> Self {
        self.with_translator(config.translator())
    }

    /// Fields by key.
    #[must_use]
    pub const fn fields(&self) -> &Shape {
        &self.shape
    }

    /// Registered conditional rules.
    #[must_use]
    pub fn conditionals(&self) -> &[ConditionalRule] {
        &self.conditionals
    }

    /// Translator used for messages.
    #[must_use]
    pub const fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Runs every pass over `data`.
    #[must_use]
    pub fn validate(&self, data: &Record) -> ValidationResult {
        self.run(data, &self.translator).0
    }

    /// Full synchronous evaluation. Also returns the cleaned record so the
    /// async path can reuse it.
    fn run(&self, data: &Record, translator: &Translator) -> (ValidationResult, Record) {
        debug!(
            fields = self.shape.len(),
            conditionals = self.conditionals.len(),
            cross = self.cross.len(),
            "validating record"
        );

        let FieldPass {
            mut result,
            cleaned,
            failed,
        } = self.field_pass(data, translator);
        let field_errors = result.has_errors();

        if !self.conditionals.is_empty() {
            self.conditional_pass(data, &cleaned, &failed, &mut result);
        }

        if field_errors {
            if !self.cross.is_empty() {
                debug!("skipping cross-field validators after field errors");
            }
        } else {
            self.cross_pass(&cleaned, &mut result);
        }

        if !result.has_errors() {
            result.set_valid_data(cleaned.clone());
        }
        debug!(errors = result.error_count(), "record validated");
        (result, cleaned)
    }

    fn field_pass(&self, data: &Record, translator: &Translator) -> FieldPass {
        let mut result = ValidationResult::new(translator.clone());
        let mut cleaned = Record::with_capacity(self.shape.len());
        let mut failed = Vec::new();

        for (key, field) in &self.shape {
            let raw = data.get(key).cloned().unwrap_or_default();
            match field.transform(raw) {
                Ok(value) => {
                    cleaned.insert(key.clone(), value);
                }
                Err(e) => {
                    debug!(field = %key, error = %e, "transform failed");
                    result.add_message(key, MessageKey::TransformError, &[&e]);
                    failed.push(key.clone());
                }
            }
        }

        for (key, field) in &self.shape {
            let value = cleaned.get(key).unwrap_or(&Value::Null);
            field.validate(key, value, &mut result);
        }

        FieldPass {
            result,
            cleaned,
            failed,
        }
    }

    /// Sub-schemas see the raw record overlaid with cleaned values, minus
    /// keys whose transform failed, so they can reach fields outside this
    /// shape.
    fn conditional_pass(
        &self,
        data: &Record,
        cleaned: &Record,
        failed: &[String],
        result: &mut ValidationResult,
    ) {
        let mut scope = data.clone();
        for (key, value) in cleaned {
            scope.insert(key.clone(), value.clone());
        }
        for key in failed {
            scope.shift_remove(key);
        }

        for rule in self.conditionals.iter().filter(|rule| rule.matches(cleaned)) {
            debug!(trigger = %rule.trigger, expected = %rule.expected, "conditional rule matched");
            let sub = (rule.factory)();
            let (sub_result, _) = sub.run(&scope, result.translator());
            result.merge_errors(sub_result);
        }
    }

    fn cross_pass(&self, cleaned: &Record, result: &mut ValidationResult) {
        if !self.cross.is_empty() {
            debug!(count = self.cross.len(), "running cross-field validators");
        }
        for validator in &self.cross {
            if let Err(e) = validator(cleaned) {
                debug!(error = %e, "cross-field validator failed");
                result.add_message(CROSS_VALIDATION_KEY, MessageKey::CrossValidation, &[&e.message]);
            }
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("shape", &self.shape)
            .field("cross", &self.cross.len())
            .field("conditionals", &self.conditionals)
            .field("locale", &self.translator.locale())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{number, text};
    use crate::{record, shape};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shape_replaces() {
        let schema = Schema::new()
            .shape(shape! { "a" => text() })
            .shape(shape! { "b" => number() });
        let keys: Vec<&str> = schema.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, ["b"]);
    }

    #[test]
    fn test_transform_failure_recorded_and_key_dropped() {
        let schema = Schema::new().field("d", crate::field::date().required());
        let result = schema.validate(&record! { "d" => "not a date" });
        assert_eq!(
            result.field_errors("d"),
            [
                "Transformation error: 'not a date' does not match date layout '%Y-%m-%d'",
                "d is required",
            ]
        );
        assert!(result.valid_data().is_none());
    }

    #[test]
    fn test_absent_optional_key_is_null_in_output() {
        let schema = Schema::new().field("nick", text());
        let result = schema.validate(&Record::new());
        assert_eq!(result.valid_data().unwrap()["nick"], Value::Null);
    }

    #[test]
    fn test_cross_validators_all_run() {
        let schema = Schema::new()
            .cross_validate(|_| Err(ValidationError::custom("first")))
            .cross_validate(|_| Err(ValidationError::custom("second")));
        let result = schema.validate(&Record::new());
        assert_eq!(
            result.field_errors(CROSS_VALIDATION_KEY),
            [
                "Cross-field validation failed: first",
                "Cross-field validation failed: second",
            ]
        );
    }

    #[test]
    fn test_stacked_conditionals_all_apply() {
        let schema = Schema::new()
            .field("kind", text())
            .when("kind", "a", || Schema::new().field("x", text().required()))
            .when("kind", "a", || Schema::new().field("x", text().min(3)));
        let result = schema.validate(&record! { "kind" => "a", "x" => "" });
        assert_eq!(
            result.field_errors("x"),
            ["x is required", "x must be at least 3 characters long"]
        );
    }
}
