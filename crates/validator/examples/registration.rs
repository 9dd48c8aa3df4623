//! Registration form validation with sieve-validator

use std::time::Duration;

use sieve_validator::prelude::*;

fn registration_schema() -> Schema {
    Schema::new()
        .shape(shape! {
            "username" => text()
                .trim()
                .lowercase()
                .min(3)
                .max(20)
                .alphanumeric()
                .required()
                .async_validator(|value: Value| async move {
                    // Stand-in for a database lookup
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    if value.as_str() == Some("admin") {
                        Err(ValidationError::custom("username is already taken"))
                    } else {
                        Ok(())
                    }
                }),
            "email" => email().trim().lowercase().required(),
            "password" => text().password().required(),
            "password_confirm" => text().required(),
            "age" => number().integer().min(18.0),
            "bio" => advanced_text()
                .strip_tags(&["b", "i"])
                .filter_emoji(true)
                .text(|t| t.max(200)),
            "account_type" => text().one_of(["personal", "business"]).default_value("personal"),
        })
        .when("account_type", "business", || {
            Schema::new().field("tax_id", text().numeric().min(10).max(11).required())
        })
        .cross_validate(|data| {
            if data.get("password") == data.get("password_confirm") {
                Ok(())
            } else {
                Err(ValidationError::custom("passwords do not match"))
            }
        })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let schema = registration_schema();

    let bad = record! {
        "username" => "  Jo ",
        "email" => "not-an-email",
        "password" => "Weak1",
        "password_confirm" => "Weak1",
        "age" => 16,
        "account_type" => "business",
    };
    println!("{}", schema.validate(&bad));

    let good = record! {
        "username" => "  JaneDoe ",
        "email" => " Jane@Example.com ",
        "password" => "Str0ng!Pass99",
        "password_confirm" => "Str0ng!Pass99",
        "age" => 30,
        "bio" => "<p>Hello <b>there</b> 👋</p>",
    };
    let result = schema.validate(&good);
    println!("{result}");
    if let Some(data) = result.valid_data() {
        for (key, value) in data {
            println!("  {key} = {value}");
        }
    }

    // Turkish messages for the same schema
    let tr = registration_schema().with_locale("tr");
    println!("{}", tr.validate(&record! { "username" => "jo" }));

    let ctx = AsyncContext::new().with_timeout(Duration::from_secs(1));
    let taken = record! {
        "username" => "admin",
        "email" => "a@b.com",
        "password" => "Str0ng!Pass99",
        "password_confirm" => "Str0ng!Pass99",
    };
    match schema.validate_async(&taken, &ctx).await {
        Ok(result) => println!("{result}"),
        Err(e) => eprintln!("async validation aborted: {e}"),
    }
}
