//! Opt-in async execution
//!
//! [`Schema::validate`] never runs async or context validators. This module
//! adds [`Schema::validate_async`], which runs the synchronous passes first
//! and then every deferred validator of the top-level fields, bounded by a
//! caller-supplied [`AsyncContext`].

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Schema;
use crate::error::AsyncError;
use crate::result::ValidationResult;
use crate::value::{Record, Value};

/// Cancellation and deadline for [`Schema::validate_async`].
#[derive(Debug, Clone, Default)]
pub struct AsyncContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl AsyncContext {
    /// No deadline and a token nobody else holds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a shared cancellation token.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Bounds the deferred validators by `timeout`.
    #[must_use = "builder methods must be chained or built"]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The cancellation token.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Configured deadline.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Schema {
    /// Runs [`validate`](Schema::validate), then context and async
    /// validators of every top-level field holding a non-null cleaned value.
    ///
    /// Per field, context validators run before async ones and async
    /// validators stop at the first failure. Any new error clears
    /// `valid_data`.
    ///
    /// # Errors
    ///
    /// [`AsyncError::Cancelled`] when the token fires and
    /// [`AsyncError::TimedOut`] when the deadline elapses. Partial results
    /// are discarded in both cases.
    pub async fn validate_async(
        &self,
        data: &Record,
        ctx: &AsyncContext,
    ) -> Result<ValidationResult, AsyncError> {
        let (result, cleaned) = self.run(data, &self.translator);
        let before = result.error_count();

        let deferred = self.run_deferred(result, &cleaned);
        let mut result = match ctx.timeout {
            Some(limit) => tokio::select! {
                outcome = tokio::time::timeout(limit, deferred) => {
                    outcome.map_err(|_| {
                        warn!(timeout = ?limit, "async validation timed out");
                        AsyncError::TimedOut(limit)
                    })?
                }
                () = ctx.cancel.cancelled() => {
                    warn!("async validation cancelled");
                    return Err(AsyncError::Cancelled);
                }
            },
            None => tokio::select! {
                result = deferred => result,
                () = ctx.cancel.cancelled() => {
                    warn!("async validation cancelled");
                    return Err(AsyncError::Cancelled);
                }
            },
        };

        if result.error_count() > before {
            result.clear_valid_data();
        }
        debug!(
            errors = result.error_count(),
            deferred_errors = result.error_count() - before,
            "async validation finished"
        );
        Ok(result)
    }

    async fn run_deferred(&self, mut result: ValidationResult, cleaned: &Record) -> ValidationResult {
        for (key, field) in &self.shape {
            let rules = field.custom_rules();
            if !rules.has_deferred() {
                continue;
            }
            let value = cleaned.get(key).unwrap_or(&Value::Null);
            if value.is_null() {
                continue;
            }

            rules.validate_context(key, value, cleaned, &mut result);
            if let Err(e) = rules.validate_async(key, value, &mut result).await {
                debug!(field = %key, error = %e, "async validator failed");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::field::text;
    use crate::record;
    use pretty_assertions::assert_eq;

    fn username_schema() -> Schema {
        Schema::new().field(
            "username",
            text()
                .required()
                .async_validator(|value: Value| async move {
                    if value.as_str() == Some("taken") {
                        Err(ValidationError::custom("username is taken"))
                    } else {
                        Ok(())
                    }
                })
                .context_validator(|value, record| {
                    if record.get("email") == Some(value) {
                        Err(ValidationError::custom("username equals email"))
                    } else {
                        Ok(())
                    }
                }),
        )
    }

    #[test]
    fn test_sync_validate_ignores_deferred() {
        let result = username_schema().validate(&record! { "username" => "taken" });
        assert!(!result.has_errors());
    }

    #[tokio::test]
    async fn test_async_error_clears_valid_data() {
        let result = username_schema()
            .validate_async(&record! { "username" => "taken" }, &AsyncContext::new())
            .await
            .unwrap();
        assert_eq!(result.field_errors("username"), ["username is taken"]);
        assert!(result.valid_data().is_none());
    }

    #[tokio::test]
    async fn test_async_pass_keeps_valid_data() {
        let result = username_schema()
            .validate_async(&record! { "username" => "free" }, &AsyncContext::new())
            .await
            .unwrap();
        assert!(result.valid_data().is_some());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let ctx = AsyncContext::new();
        ctx.cancellation().cancel();
        let schema = Schema::new().field(
            "username",
            text().async_validator(|_| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            }),
        );
        let err = schema
            .validate_async(&record! { "username" => "x" }, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err, AsyncError::Cancelled);
    }

    #[tokio::test]
    async fn test_timeout() {
        let schema = Schema::new().field(
            "username",
            text().async_validator(|_| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            }),
        );
        let ctx = AsyncContext::new().with_timeout(Duration::from_millis(10));
        let err = schema
            .validate_async(&record! { "username" => "x" }, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err, AsyncError::TimedOut(Duration::from_millis(10)));
    }
}
