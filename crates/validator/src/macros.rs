//! Macros for building records and shapes with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`record!`] — Build a [`Record`](crate::Record) from `key => value` pairs
//! - [`shape!`] — Build a [`Shape`](crate::field::Shape) from `key => field` pairs
//!
//! # Examples
//!
//! ```rust,ignore
//! use sieve_validator::prelude::*;
//!
//! let schema = Schema::new().shape(shape! {
//!     "name" => text().trim().required(),
//!     "age" => number().integer().min(18.0),
//! });
//!
//! let result = schema.validate(&record! { "name" => " Ada ", "age" => 36 });
//! assert!(!result.has_errors());
//! ```

// ============================================================================
// RECORD MACRO
// ============================================================================

/// Builds a [`Record`](crate::Record). Values go through
/// `Value::from`, so literals, `Vec`s, `Option`s and nested records work.
///
/// ```rust,ignore
/// let data = record! {
///     "name" => "Alice",
///     "age" => 30,
///     "nick" => None::<String>,
///     "address" => record! { "city" => "Ankara" },
/// };
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Record::new();
        $(
            map.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        map
    }};
}

// ============================================================================
// SHAPE MACRO
// ============================================================================

/// Builds a [`Shape`](crate::field::Shape), converting each entry into a
/// [`Field`](crate::Field). Later duplicates replace earlier ones.
///
/// ```rust,ignore
/// let card = shape! {
///     "number" => credit_card().brand("visa").required(),
///     "holder" => text().trim(),
/// };
/// ```
#[macro_export]
macro_rules! shape {
    () => {
        $crate::field::Shape::new()
    };
    ($($key:expr => $field:expr),+ $(,)?) => {{
        let mut shape = $crate::field::Shape::new();
        $(
            shape.insert(
                ::std::string::String::from($key),
                $crate::Field::from($field),
            );
        )+
        shape
    }};
}
