//! Field descriptors
//!
//! A [`Field`] describes one entry of a record: how to clean the raw value
//! (transform) and which constraints the cleaned value must satisfy
//! (validate). Every variant shares a [`FieldBase`] carrying the common
//! configuration:
//!
//! - `required`: null or `""` is reported and stops further checks
//! - `label`: display name in messages, defaults to the field path
//! - `default_value`: substituted for a null raw value before transforms run
//! - `transforms`: user steps run in registration order
//! - custom rules: see [`CustomRuleSet`]
//!
//! # Examples
//!
//! ```rust,ignore
//! use sieve_validator::prelude::*;
//!
//! let age = number().min(18.0).integer().required().label("Age");
//! let tags = array().of(text().trim().min(2)).unique().max(5);
//! let address = object().field("city", text().required());
//! ```
//!
//! # Check order
//!
//! `validate` always runs: presence gate, runtime type check, the variant's
//! constraints in their documented order, then custom rules. Each check is
//! independent of whether another field already failed.

mod advanced;
mod boolean;
mod datetime;
mod list;
mod number;
mod object;
mod payment;
mod text;
mod uuid;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::custom::CustomRuleSet;
use crate::error::TransformError;
use crate::i18n::MessageKey;
use crate::result::ValidationResult;
use crate::value::Value;

pub use advanced::AdvancedTextField;
pub use boolean::BooleanField;
pub use datetime::{DEFAULT_DATE_LAYOUT, DateField};
pub use list::ListField;
pub use number::NumberField;
pub use object::ObjectField;
pub use payment::{CreditCardField, IbanField};
pub use text::TextField;
pub use uuid::UuidField;

/// A user transform step.
pub type TransformFn = Arc<dyn Fn(Value) -> Result<Value, TransformError> + Send + Sync>;

/// Ordered mapping from key to field, the shape of a record.
pub type Shape = IndexMap<String, Field>;

// ============================================================================
// FIELD BASE
// ============================================================================

/// Configuration shared by every field variant.
#[derive(Clone, Default)]
pub struct FieldBase {
    pub(crate) required: bool,
    pub(crate) label: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) transforms: Vec<TransformFn>,
    pub(crate) custom: CustomRuleSet,
}

impl FieldBase {
    /// Whether null or `""` is rejected.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Display name for messages: the label, or the path when unset.
    #[must_use]
    pub fn label_for<'a>(&'a self, path: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(path)
    }

    /// Custom rules attached to the field.
    #[must_use]
    pub const fn custom_rules(&self) -> &CustomRuleSet {
        &self.custom
    }

    /// Substitutes the default for null, then runs user transforms.
    ///
    /// A null value (after substitution) is returned as-is without running
    /// any step.
    pub(crate) fn apply_transforms(&self, raw: Value) -> Result<Value, TransformError> {
        let value = match (raw, &self.default) {
            (Value::Null, Some(default)) => default.clone(),
            (raw, _) => raw,
        };
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.transforms.iter().try_fold(value, |acc, step| step(acc))
    }

    /// Presence gate shared by every variant.
    ///
    /// Returns `true` when the caller should continue with type and
    /// constraint checks.
    pub(crate) fn check_presence(
        &self,
        path: &str,
        value: &Value,
        result: &mut ValidationResult,
    ) -> bool {
        if self.required && value.is_missing() {
            result.add_message(path, MessageKey::Required, &[&self.label_for(path)]);
            return false;
        }
        !value.is_null()
    }

    pub(crate) fn run_custom(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        if self.custom.has_sync() {
            self.custom.validate_sync(path, value, result);
        }
    }

    pub(crate) fn push_transform<F>(&mut self, f: F)
    where
        F: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        self.transforms.push(Arc::new(f));
    }
}

impl fmt::Debug for FieldBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBase")
            .field("required", &self.required)
            .field("label", &self.label)
            .field("default", &self.default)
            .field("transforms", &self.transforms.len())
            .field("custom", &self.custom)
            .finish()
    }
}

/// Maps a text value through `f`, passing every other shape through.
pub(crate) fn map_text(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::Text(s) => Value::Text(f(&s)),
        other => other,
    }
}

// ============================================================================
// COMMON BUILDERS
// ============================================================================

/// Generates the builder methods every variant shares. `$arg` is the typed
/// view handed to `custom` and `$view` extracts it from a [`Value`].
macro_rules! impl_common_builders {
    ($ty:ty, $($base:ident).+, $arg:ty, $view:expr) => {
        impl $ty {
            /// Rejects null and `""`.
            #[must_use = "builder methods must be chained or built"]
            pub fn required(mut self) -> Self {
                self.$($base).+.required = true;
                self
            }

            /// Display name used in messages instead of the field path.
            #[must_use = "builder methods must be chained or built"]
            pub fn label(mut self, label: impl Into<String>) -> Self {
                self.$($base).+.label = Some(label.into());
                self
            }

            /// Value substituted when the raw value is null.
            #[must_use = "builder methods must be chained or built"]
            pub fn default_value(mut self, value: impl Into<$crate::value::Value>) -> Self {
                self.$($base).+.default = Some(value.into());
                self
            }

            /// Appends a user transform step.
            #[must_use = "builder methods must be chained or built"]
            pub fn transform<F>(mut self, f: F) -> Self
            where
                F: Fn($crate::value::Value) -> Result<$crate::value::Value, $crate::error::TransformError>
                    + Send
                    + Sync
                    + 'static,
            {
                self.$($base).+.push_transform(f);
                self
            }

            /// Appends a typed custom check. It only runs when the value has
            /// the variant's runtime type.
            #[must_use = "builder methods must be chained or built"]
            pub fn custom<F>(mut self, f: F) -> Self
            where
                F: Fn($arg) -> Result<(), $crate::error::ValidationError> + Send + Sync + 'static,
            {
                self.$($base).+.custom.add_sync(move |value: &$crate::value::Value| {
                    match ($view)(value) {
                        Some(typed) => f(typed),
                        None => Ok(()),
                    }
                });
                self
            }

            /// Appends a check over the raw [`Value`](crate::Value).
            #[must_use = "builder methods must be chained or built"]
            pub fn validator<F>(mut self, f: F) -> Self
            where
                F: Fn(&$crate::value::Value) -> Result<(), $crate::error::ValidationError>
                    + Send
                    + Sync
                    + 'static,
            {
                self.$($base).+.custom.add_sync(f);
                self
            }

            /// Appends a reusable [`Rule`](crate::custom::Rule).
            #[must_use = "builder methods must be chained or built"]
            pub fn rule(mut self, rule: impl $crate::custom::Rule + 'static) -> Self {
                self.$($base).+.custom.add_rule(rule);
                self
            }

            /// Appends an async check, run only by
            /// [`Schema::validate_async`](crate::Schema).
            #[must_use = "builder methods must be chained or built"]
            pub fn async_validator<F, Fut>(mut self, f: F) -> Self
            where
                F: Fn($crate::value::Value) -> Fut + Send + Sync + 'static,
                Fut: ::std::future::Future<Output = Result<(), $crate::error::ValidationError>>
                    + Send
                    + 'static,
            {
                self.$($base).+.custom.add_async(::std::sync::Arc::new(move |value| {
                    ::futures::FutureExt::boxed(f(value))
                }));
                self
            }

            /// Appends a check that also sees the transformed record, run
            /// only by [`Schema::validate_async`](crate::Schema).
            #[must_use = "builder methods must be chained or built"]
            pub fn context_validator<F>(mut self, f: F) -> Self
            where
                F: Fn(&$crate::value::Value, &$crate::value::Record)
                        -> Result<(), $crate::error::ValidationError>
                    + Send
                    + Sync
                    + 'static,
            {
                self.$($base).+.custom.add_context(f);
                self
            }

            /// Shared configuration.
            #[must_use]
            pub const fn base(&self) -> &$crate::field::FieldBase {
                &self.$($base).+
            }
        }
    };
}

pub(crate) use impl_common_builders;

// ============================================================================
// FIELD
// ============================================================================

/// Closed set of field variants.
#[derive(Debug, Clone)]
pub enum Field {
    /// Plain string.
    Text(TextField),
    /// String with sanitizers and content checks.
    AdvancedText(AdvancedTextField),
    /// Integer or float.
    Number(NumberField),
    /// Strict boolean.
    Boolean(BooleanField),
    /// String parsed into a timestamp.
    DateTime(DateField),
    /// Homogeneous list.
    List(ListField),
    /// Nested record.
    Struct(ObjectField),
    /// UUID string.
    Uuid(UuidField),
    /// IBAN string.
    Iban(IbanField),
    /// Card number string.
    CreditCard(CreditCardField),
}

impl Field {
    /// Shared configuration of the wrapped variant.
    #[must_use]
    pub const fn base(&self) -> &FieldBase {
        match self {
            Self::Text(f) => f.base(),
            Self::AdvancedText(f) => f.base(),
            Self::Number(f) => f.base(),
            Self::Boolean(f) => f.base(),
            Self::DateTime(f) => f.base(),
            Self::List(f) => f.base(),
            Self::Struct(f) => f.base(),
            Self::Uuid(f) => f.base(),
            Self::Iban(f) => f.base(),
            Self::CreditCard(f) => f.base(),
        }
    }

    /// Custom rules of the wrapped variant.
    #[must_use]
    pub const fn custom_rules(&self) -> &CustomRuleSet {
        self.base().custom_rules()
    }

    /// Cleans a raw value.
    pub fn transform(&self, raw: Value) -> Result<Value, TransformError> {
        match self {
            Self::Text(f) => f.clean(raw),
            Self::AdvancedText(f) => f.clean(raw),
            Self::Number(f) => f.clean(raw),
            Self::Boolean(f) => f.clean(raw),
            Self::DateTime(f) => f.clean(raw),
            Self::List(f) => f.clean(raw),
            Self::Struct(f) => f.clean(raw),
            Self::Uuid(f) => f.clean(raw),
            Self::Iban(f) => f.clean(raw),
            Self::CreditCard(f) => f.clean(raw),
        }
    }

    /// Checks a transformed value, recording failures under `path`.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        match self {
            Self::Text(f) => f.validate(path, value, result),
            Self::AdvancedText(f) => f.validate(path, value, result),
            Self::Number(f) => f.validate(path, value, result),
            Self::Boolean(f) => f.validate(path, value, result),
            Self::DateTime(f) => f.validate(path, value, result),
            Self::List(f) => f.validate(path, value, result),
            Self::Struct(f) => f.validate(path, value, result),
            Self::Uuid(f) => f.validate(path, value, result),
            Self::Iban(f) => f.validate(path, value, result),
            Self::CreditCard(f) => f.validate(path, value, result),
        }
    }
}

macro_rules! impl_into_field {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Field {
                fn from(field: $ty) -> Self {
                    Self::$variant(field)
                }
            }
        )*
    };
}

impl_into_field! {
    TextField => Text,
    AdvancedTextField => AdvancedText,
    NumberField => Number,
    BooleanField => Boolean,
    DateField => DateTime,
    ListField => List,
    ObjectField => Struct,
    UuidField => Uuid,
    IbanField => Iban,
    CreditCardField => CreditCard,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

/// A plain string field.
#[must_use]
pub fn text() -> TextField {
    TextField::new()
}

/// A string field with the email check enabled.
#[must_use]
pub fn email() -> TextField {
    TextField::new().email()
}

/// A string field with sanitizers and content checks.
#[must_use]
pub fn advanced_text() -> AdvancedTextField {
    AdvancedTextField::new()
}

/// A numeric field.
#[must_use]
pub fn number() -> NumberField {
    NumberField::new()
}

/// A strict boolean field.
#[must_use]
pub fn boolean() -> BooleanField {
    BooleanField::new()
}

/// A date field using [`DEFAULT_DATE_LAYOUT`].
#[must_use]
pub fn date() -> DateField {
    DateField::new()
}

/// A list field.
#[must_use]
pub fn array() -> ListField {
    ListField::new()
}

/// A nested record field.
#[must_use]
pub fn object() -> ObjectField {
    ObjectField::new()
}

/// A UUID field accepting any version.
#[must_use]
pub fn uuid() -> UuidField {
    UuidField::new()
}

/// An IBAN field.
#[must_use]
pub fn iban() -> IbanField {
    IbanField::new()
}

/// A credit card field.
#[must_use]
pub fn credit_card() -> CreditCardField {
    CreditCardField::new()
}

// ============================================================================
// TESTS
// ============================================================================
