//! Validation outcome
//!
//! A [`ValidationResult`] is created fresh for every
//! [`Schema::validate`](crate::Schema::validate) call and collects messages
//! keyed by field path. Cleaned output is published only when no field
//! recorded anything.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::i18n::{MessageKey, Translator};
use crate::value::Record;

/// Pseudo-field key under which cross-field failures are recorded.
pub const CROSS_VALIDATION_KEY: &str = "_cross_validation";

/// Field path to ordered messages.
pub type ErrorMap = IndexMap<String, Vec<String>>;

/// Accumulated errors plus the sanitized record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    errors: ErrorMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid_data: Option<Record>,
    #[serde(skip)]
    translator: Translator,
}

impl ValidationResult {
    /// Creates an empty result that formats messages with `translator`.
    #[must_use]
    pub fn new(translator: Translator) -> Self {
        Self {
            errors: ErrorMap::new(),
            valid_data: None,
            translator,
        }
    }

    /// Appends a message to a field, preserving order.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Formats `key` with the result's translator and appends it.
    pub fn add_message(&mut self, field: &str, key: MessageKey, args: &[&dyn fmt::Display]) {
        let message = self.translator.format(key, args);
        self.add_error(field, message);
    }

    /// Appends every message of another result, field by field.
    pub fn merge_errors(&mut self, other: Self) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    /// Returns `true` when any field recorded a message.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Total number of messages across fields.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// All messages by field path.
    #[must_use]
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Messages for one field path.
    #[must_use]
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// Sanitized record, present only for a fully valid input.
    #[must_use]
    pub fn valid_data(&self) -> Option<&Record> {
        self.valid_data.as_ref()
    }

    /// Consumes the result, yielding the record or the error map.
    pub fn into_result(self) -> Result<Record, ErrorMap> {
        match self.valid_data {
            Some(data) if self.errors.is_empty() => Ok(data),
            _ => Err(self.errors),
        }
    }

    /// Translator used for this result's messages.
    #[must_use]
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub(crate) fn set_valid_data(&mut self, data: Record) {
        self.valid_data = Some(data);
    }

    pub(crate) fn clear_valid_data(&mut self) {
        self.valid_data = None;
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("valid");
        }
        writeln!(f, "validation failed with {} error(s):", self.error_count())?;
        for (field, messages) in &self.errors {
            for message in messages {
                writeln!(f, "  [{field}] {message}")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
