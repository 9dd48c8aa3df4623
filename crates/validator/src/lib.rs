//! # sieve-validator
//!
//! Declarative validation and sanitization of dynamic records.
//!
//! A [`Schema`] maps keys to typed [`Field`]s. Each field first cleans its
//! raw value (defaults, trimming, parsing) and then checks the cleaned value.
//! The schema adds conditional sub-schemas and cross-field rules on top and
//! returns a [`ValidationResult`] holding every message per field path plus
//! the cleaned record when nothing failed.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sieve_validator::prelude::*;
//!
//! let schema = Schema::new().shape(shape! {
//!     "username" => text().trim().min(3).max(20).required(),
//!     "email" => email().trim().required(),
//!     "age" => number().integer().min(18.0),
//! });
//!
//! let result = schema.validate(&record! {
//!     "username" => "jo",
//!     "email" => " jo@example.com ",
//! });
//! assert_eq!(
//!     result.field_errors("username"),
//!     ["username must be at least 3 characters long"]
//! );
//! ```
//!
//! ## Modules
//!
//! - [`field`]: field variants and their builders
//! - [`schema`]: record-level orchestration, plus the opt-in async runner
//! - [`rules`]: pure predicates (email, IBAN, Luhn, password policy, ...)
//! - [`custom`]: user rules attached to fields
//! - [`i18n`]: message catalogs and the [`Translator`](i18n::Translator)
//! - [`config`]: serde-friendly shared settings
//!
//! ## Feature flags
//!
//! - `async` (default): [`Schema::validate_async`] with cancellation and
//!   timeouts via tokio

pub mod config;
pub mod custom;
pub mod error;
pub mod field;
pub mod i18n;
mod macros;
pub mod prelude;
pub mod result;
pub mod rules;
pub mod schema;
pub mod value;

pub use error::{TransformError, ValidationError};
pub use field::Field;
pub use result::ValidationResult;
pub use schema::Schema;
pub use value::{Record, Value};
