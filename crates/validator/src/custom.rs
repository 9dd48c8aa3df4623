//! User-supplied rules
//!
//! Every field carries a [`CustomRuleSet`]. It runs after the built-in
//! checks and holds four kinds of entries:
//!
//! - **sync callbacks**: `Fn(&Value) -> Result<(), ValidationError>`
//! - **rules**: reusable [`Rule`] objects with their own message
//! - **async validators**: futures, only run by the opt-in async path
//! - **context validators**: see the whole transformed record, only run by
//!   the opt-in async path
//!
//! Sync callbacks run before rules, and every entry runs even when an
//! earlier one failed.
//!
//! # Examples
//!
//! ```rust,ignore
//! use sieve_validator::prelude::*;
//!
//! let reserved = refine(|v| v.as_str() != Some("root"), "this username is reserved");
//! let username = text().min(3).rule(reserved);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use regex::Regex;

use crate::error::ValidationError;
use crate::result::ValidationResult;
use crate::value::{Record, Value};

/// Synchronous callback.
pub type SyncValidatorFn = Arc<dyn Fn(&Value) -> Result<(), ValidationError> + Send + Sync>;

/// Asynchronous callback, e.g. a uniqueness lookup.
pub type AsyncValidatorFn =
    Arc<dyn Fn(Value) -> BoxFuture<'static, Result<(), ValidationError>> + Send + Sync>;

/// Callback that also sees the whole transformed record.
pub type ContextValidatorFn =
    Arc<dyn Fn(&Value, &Record) -> Result<(), ValidationError> + Send + Sync>;

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A reusable check with an optional fixed message.
///
/// When [`message`](Rule::message) returns `None` (or an empty string) the
/// rejected error's own message is recorded instead.
pub trait Rule: Send + Sync {
    /// Checks a value.
    fn validate(&self, value: &Value) -> Result<(), ValidationError>;

    /// Message recorded on failure.
    fn message(&self) -> Option<&str> {
        None
    }
}

impl<R: Rule + ?Sized> Rule for Arc<R> {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        (**self).validate(value)
    }

    fn message(&self) -> Option<&str> {
        (**self).message()
    }
}

// ============================================================================
// BUILT-IN RULES
// ============================================================================

/// Rule backed by a closure.
pub struct RuleFn<F> {
    check: F,
    message: Cow<'static, str>,
}

impl<F> Rule for RuleFn<F>
where
    F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        (self.check)(value)
    }

    fn message(&self) -> Option<&str> {
        Some(self.message.as_ref()).filter(|m| !m.is_empty())
    }
}

impl<F> fmt::Debug for RuleFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleFn").field("message", &self.message).finish()
    }
}

/// Wraps a closure into a [`Rule`].
pub fn rule<F>(check: F, message: impl Into<Cow<'static, str>>) -> RuleFn<F>
where
    F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync,
{
    RuleFn {
        check,
        message: message.into(),
    }
}

/// Rule from a boolean predicate; `false` records `message`.
pub fn refine<P>(
    predicate: P,
    message: impl Into<Cow<'static, str>>,
) -> RuleFn<impl Fn(&Value) -> Result<(), ValidationError> + Send + Sync>
where
    P: Fn(&Value) -> bool + Send + Sync,
{
    let message = message.into();
    let error = message.clone();
    rule(
        move |value: &Value| {
            if predicate(value) {
                Ok(())
            } else {
                Err(ValidationError::new("refine", error.clone()))
            }
        },
        message,
    )
}

/// Passes when `checker` reports the value as unique.
pub struct UniqueRule<F> {
    checker: F,
    message: Cow<'static, str>,
}

impl<F> UniqueRule<F>
where
    F: Fn(&Value) -> Result<bool, ValidationError> + Send + Sync,
{
    /// Creates the rule. The checker returns `Ok(true)` for unique values.
    pub fn new(checker: F, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            checker,
            message: message.into(),
        }
    }
}

impl<F> Rule for UniqueRule<F>
where
    F: Fn(&Value) -> Result<bool, ValidationError> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match (self.checker)(value) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ValidationError::new("not_unique", "not unique")),
            Err(e) => Err(ValidationError::new(
                "unique_check_failed",
                format!("unique check failed: {e}"),
            )),
        }
    }

    fn message(&self) -> Option<&str> {
        Some(self.message.as_ref()).filter(|m| !m.is_empty())
    }
}

/// Passes when `checker` finds the value.
pub struct ExistsRule<F> {
    checker: F,
    message: Cow<'static, str>,
}

impl<F> ExistsRule<F>
where
    F: Fn(&Value) -> Result<bool, ValidationError> + Send + Sync,
{
    /// Creates the rule. The checker returns `Ok(true)` when the value exists.
    pub fn new(checker: F, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            checker,
            message: message.into(),
        }
    }
}

impl<F> Rule for ExistsRule<F>
where
    F: Fn(&Value) -> Result<bool, ValidationError> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match (self.checker)(value) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ValidationError::new("not_found", "not found")),
            Err(e) => Err(ValidationError::new(
                "exists_check_failed",
                format!("exists check failed: {e}"),
            )),
        }
    }

    fn message(&self) -> Option<&str> {
        Some(self.message.as_ref()).filter(|m| !m.is_empty())
    }
}

/// Text must match a pattern compiled at construction.
#[derive(Debug, Clone)]
pub struct RegexRule {
    pattern: Regex,
    message: Cow<'static, str>,
}

impl RegexRule {
    /// Compiles `pattern`.
    pub fn new(pattern: &str, message: impl Into<Cow<'static, str>>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: message.into(),
        })
    }
}

impl Rule for RegexRule {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let Some(s) = value.as_str() else {
            return Err(ValidationError::new("type_mismatch", "value must be string"));
        };
        if self.pattern.is_match(s) {
            Ok(())
        } else {
            Err(ValidationError::new("regex", "pattern mismatch")
                .with_param("pattern", self.pattern.as_str().to_string()))
        }
    }

    fn message(&self) -> Option<&str> {
        Some(self.message.as_ref()).filter(|m| !m.is_empty())
    }
}

// ============================================================================
// RULE SET
// ============================================================================

/// Ordered custom checks attached to one field.
#[derive(Clone, Default)]
pub struct CustomRuleSet {
    sync: Vec<SyncValidatorFn>,
    rules: Vec<Arc<dyn Rule>>,
    async_validators: Vec<AsyncValidatorFn>,
    context: Vec<ContextValidatorFn>,
}

impl CustomRuleSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sync callback.
    pub fn add_sync<F>(&mut self, f: F)
    where
        F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.sync.push(Arc::new(f));
    }

    /// Appends a rule.
    pub fn add_rule(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Arc::new(rule));
    }

    /// Appends an async validator.
    pub fn add_async(&mut self, f: AsyncValidatorFn) {
        self.async_validators.push(f);
    }

    /// Appends a context validator.
    pub fn add_context<F>(&mut self, f: F)
    where
        F: Fn(&Value, &Record) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.context.push(Arc::new(f));
    }

    /// Returns `true` if any kind of entry exists.
    #[must_use]
    pub fn has_validators(&self) -> bool {
        self.has_sync() || self.has_deferred()
    }

    /// Returns `true` if the synchronous pass has work.
    #[must_use]
    pub fn has_sync(&self) -> bool {
        !self.sync.is_empty() || !self.rules.is_empty()
    }

    /// Returns `true` if the async path has work.
    #[must_use]
    pub fn has_deferred(&self) -> bool {
        !self.async_validators.is_empty() || !self.context.is_empty()
    }

    /// Runs sync callbacks then rules, recording every failure.
    pub fn validate_sync(&self, field: &str, value: &Value, result: &mut ValidationResult) {
        for validator in &self.sync {
            if let Err(e) = validator(value) {
                result.add_error(field, e.message);
            }
        }

        for rule in &self.rules {
            if let Err(e) = rule.validate(value) {
                let message = rule
                    .message()
                    .map_or_else(|| e.message.into_owned(), str::to_owned);
                result.add_error(field, message);
            }
        }
    }

    /// Runs context validators against the transformed record.
    pub fn validate_context(
        &self,
        field: &str,
        value: &Value,
        record: &Record,
        result: &mut ValidationResult,
    ) {
        for validator in &self.context {
            if let Err(e) = validator(value, record) {
                result.add_error(field, e.message);
            }
        }
    }

    /// Runs async validators in order, stopping at the first failure.
    ///
    /// The failure is recorded and also returned.
    pub async fn validate_async(
        &self,
        field: &str,
        value: &Value,
        result: &mut ValidationResult,
    ) -> Result<(), ValidationError> {
        for validator in &self.async_validators {
            if let Err(e) = validator(value.clone()).await {
                result.add_error(field, e.message.clone());
                return Err(e);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CustomRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRuleSet")
            .field("sync", &self.sync.len())
            .field("rules", &self.rules.len())
            .field("async", &self.async_validators.len())
            .field("context", &self.context.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
