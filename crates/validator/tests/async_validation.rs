//! Async and context validators through `Schema::validate_async`.

#![cfg(feature = "async")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use sieve_validator::prelude::*;
use tokio_util::sync::CancellationToken;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

async fn lookup_taken(value: Value) -> Result<(), ValidationError> {
    tokio::time::sleep(Duration::from_millis(1)).await;
    match value.as_str() {
        Some("alice" | "bob") => Err(ValidationError::custom("username is already taken")),
        _ => Ok(()),
    }
}

fn signup() -> Schema {
    Schema::new().shape(shape! {
        "username" => text()
            .trim()
            .lowercase()
            .min(3)
            .required()
            .async_validator(lookup_taken),
        "email" => email().required(),
        "referrer" => text().context_validator(|value, record| {
            if record.get("username") == Some(value) {
                Err(ValidationError::custom("cannot refer yourself"))
            } else {
                Ok(())
            }
        }),
    })
}

#[tokio::test]
async fn async_validator_sees_cleaned_value() {
    init_tracing();
    let result = signup()
        .validate_async(
            &record! { "username" => "  ALICE ", "email" => "a@b.com" },
            &AsyncContext::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.field_errors("username"), ["username is already taken"]);
    assert!(result.valid_data().is_none());
}

#[tokio::test]
async fn context_validator_sees_whole_record() {
    init_tracing();
    let result = signup()
        .validate_async(
            &record! { "username" => "carol", "email" => "c@d.com", "referrer" => "carol" },
            &AsyncContext::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.field_errors("referrer"), ["cannot refer yourself"]);
}

#[tokio::test]
async fn sync_errors_are_kept_alongside_async_errors() {
    init_tracing();
    let result = signup()
        .validate_async(&record! { "username" => "bob" }, &AsyncContext::new())
        .await
        .unwrap();

    assert_eq!(result.field_errors("email"), ["email is required"]);
    assert_eq!(result.field_errors("username"), ["username is already taken"]);
}

#[tokio::test]
async fn clean_record_keeps_valid_data() {
    let result = signup()
        .validate_async(
            &record! { "username" => "carol", "email" => "c@d.com" },
            &AsyncContext::new().with_timeout(Duration::from_secs(5)),
        )
        .await
        .unwrap();

    let data = result.valid_data().unwrap();
    assert_eq!(data["username"], Value::from("carol"));
    assert_eq!(data["referrer"], Value::Null);
}

#[tokio::test]
async fn async_validators_stop_at_first_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let schema = Schema::new().field(
        "code",
        text()
            .async_validator(|_| async { Err(ValidationError::custom("first")) })
            .async_validator(move |_| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
    );

    let result = schema
        .validate_async(&record! { "code" => "x" }, &AsyncContext::new())
        .await
        .unwrap();
    assert_eq!(result.field_errors("code"), ["first"]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn null_values_skip_deferred_validators() {
    let schema = Schema::new().field(
        "code",
        text().async_validator(|_| async { Err(ValidationError::custom("should not run")) }),
    );
    let result = schema
        .validate_async(&Record::new(), &AsyncContext::new())
        .await
        .unwrap();
    assert!(!result.has_errors());
}

#[tokio::test]
async fn shared_token_cancels_in_flight_validation() {
    init_tracing();
    let token = CancellationToken::new();
    let schema = Schema::new().field(
        "slow",
        text().async_validator(|_| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }),
    );
    let ctx = AsyncContext::new().with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let err = schema
        .validate_async(&record! { "slow" => "x" }, &ctx)
        .await
        .unwrap_err();
    assert_eq!(err, AsyncError::Cancelled);
    canceller.await.unwrap();
}

#[tokio::test]
async fn config_deadline_applies() {
    let config = ValidatorConfig::from_json(r#"{ "async_timeout_ms": 15 }"#).unwrap();
    let schema = Schema::new().field(
        "slow",
        text().async_validator(|_| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }),
    );

    let err = schema
        .validate_async(&record! { "slow" => "x" }, &config.async_context())
        .await
        .unwrap_err();
    assert_eq!(err, AsyncError::TimedOut(Duration::from_millis(15)));
}
