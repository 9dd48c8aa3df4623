//! Prelude module for convenient imports.
//!
//! Provides a single `use sieve_validator::prelude::*;` import that brings
//! in the schema, every field constructor, the value model and the custom
//! rule helpers.
//!
//! # Examples
//!
//! ```rust,ignore
//! use sieve_validator::prelude::*;
//!
//! let schema = Schema::new().shape(shape! {
//!     "username" => text().trim().min(3).max(20).required(),
//!     "age" => number().integer().min(18.0),
//!     "tags" => array().of(text().min(2)).unique(),
//! });
//! ```

// ============================================================================
// CORE: Schema, results, errors, values
// ============================================================================

pub use crate::error::{TransformError, ValidationError};
pub use crate::result::{CROSS_VALIDATION_KEY, ValidationResult};
pub use crate::schema::Schema;
pub use crate::value::{Record, Value};
pub use crate::{record, shape};

#[cfg(feature = "async")]
pub use crate::error::AsyncError;
#[cfg(feature = "async")]
pub use crate::schema::AsyncContext;

// ============================================================================
// FIELDS: Variants and constructors
// ============================================================================

pub use crate::field::{
    AdvancedTextField, BooleanField, CreditCardField, DateField, Field, IbanField, ListField,
    NumberField, ObjectField, Shape, TextField, UuidField, advanced_text, array, boolean,
    credit_card, date, email, iban, number, object, text, uuid,
};

// ============================================================================
// CUSTOM RULES
// ============================================================================

pub use crate::custom::{ExistsRule, RegexRule, Rule, UniqueRule, refine, rule};

// ============================================================================
// LOCALIZATION & CONFIG
// ============================================================================

pub use crate::config::ValidatorConfig;
pub use crate::i18n::{Catalog, MessageKey, Translator};
pub use crate::rules::{IpVersion, PasswordPolicy};
