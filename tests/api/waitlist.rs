use anyhow::Result;
use fake::{faker::address::en::CountryName, Fake};
use reqwest::{header::CONTENT_TYPE, StatusCode};
use serde_json::{json, Value};

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running Postgres instance (see config/local.toml)"]
async fn api_waitlist_join_ok() -> Result<()> {
    let app = TestApp::spawn_with_db().await?;

    let nationality: String = CountryName().fake();
    let json_request = json!({
        "email": "x@y.com",
        "nationality": nationality,
        "language": "Spanish"
    });

    let res = app.post_waitlist(&json_request).await?;

    assert_eq!(
        res.status(),
        StatusCode::OK,
        "Wrong response StatusCode: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Entry added successfully!");
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["email"], "x@y.com");
    assert_eq!(body["data"][0]["nationality"], nationality.as_str());
    assert_eq!(body["data"][0]["language"], "Spanish");

    let (email, stored_nationality, language): (String, String, String) =
        sqlx::query_as("SELECT email, nationality, language FROM waitlist")
            .fetch_one(app.dm.db())
            .await?;

    assert_eq!(email, "x@y.com");
    assert_eq!(stored_nationality, nationality);
    assert_eq!(language, "Spanish");

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Postgres instance (see config/local.toml)"]
async fn api_waitlist_duplicate_email_conflict() -> Result<()> {
    let app = TestApp::spawn_with_db().await?;

    let first = json!({
        "email": "a@example.com",
        "nationality": "France",
        "language": "Spanish"
    });
    // Same email, different everything else: still a duplicate.
    let second = json!({
        "email": "a@example.com",
        "nationality": "Italy",
        "language": "Japanese"
    });

    let res = app.post_waitlist(&first).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.post_waitlist(&second).await?;
    assert_eq!(
        res.status(),
        StatusCode::CONFLICT,
        "Resubmitting an email should conflict, got: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    let message = body["error"]["message"]
        .as_str()
        .expect("error body should carry a message");
    assert!(
        message.to_lowercase().contains("duplicate"),
        "conflict response should surface the datastore message, got: {message}"
    );

    // The stored row count for that email must remain 1.
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM waitlist WHERE email = 'a@example.com'")
            .fetch_one(app.dm.db())
            .await?;
    assert_eq!(count, 1);

    Ok(())
}

#[tokio::test]
async fn api_waitlist_missing_or_empty_fields_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (
            json!({ "nationality": "France", "language": "Spanish" }),
            "Missing email",
        ),
        (
            json!({ "email": "x@y.com", "language": "Spanish" }),
            "Missing nationality",
        ),
        (
            json!({ "email": "x@y.com", "nationality": "France" }),
            "Missing language",
        ),
        (
            json!({ "email": null, "nationality": "France", "language": "Spanish" }),
            "Null email",
        ),
        (
            json!({ "email": "x@y.com", "nationality": "   ", "language": "Spanish" }),
            "Whitespace-only nationality",
        ),
        (
            json!({ "email": "x@y.com", "nationality": "France", "language": "" }),
            "Empty language",
        ),
        (json!({}), "Empty json"),
    ];

    for (json_request, description) in cases {
        let res = app.post_waitlist(&json_request).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Wrong response: ({}), for request with: {description}",
            res.status(),
        );
    }

    Ok(())
}

#[tokio::test]
async fn api_waitlist_bad_request_names_the_missing_field() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(&json!({ "nationality": "France", "language": "Spanish" }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    let message = body["error"]["message"]
        .as_str()
        .expect("error body should carry a message");
    assert!(
        message.contains("email"),
        "validation message should identify the missing field, got: {message}"
    );

    Ok(())
}

#[tokio::test]
async fn api_waitlist_invalid_email_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        "not an email",
        "missing-at-sign.com",
        "@no-local-part.com",
        "trailing@dot.com.",
        "oddtld@domain.c",
    ];

    for email in cases {
        let json_request = json!({
            "email": email,
            "nationality": "France",
            "language": "Spanish"
        });
        let res = app.post_waitlist(&json_request).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Wrong response: ({}), for email: {email}",
            res.status(),
        );
    }

    Ok(())
}

#[tokio::test]
async fn api_waitlist_malformed_body_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(format!("http://{}/api/waitlist", app.addr))
        .header(CONTENT_TYPE, "application/json")
        .body("{ definitely not json")
        .send()
        .await?;

    assert_eq!(
        res.status(),
        StatusCode::BAD_REQUEST,
        "Malformed body should be a 400, got: {}",
        res.status()
    );

    Ok(())
}

#[tokio::test]
async fn api_waitlist_wrong_content_type_unsupported_media_type() -> Result<()> {
    let app = TestApp::spawn().await?;

    // A perfectly valid body, declared as the wrong media type.
    let res = app
        .http_client
        .post(format!("http://{}/api/waitlist", app.addr))
        .header(CONTENT_TYPE, "text/plain")
        .body(r#"{"email":"x@y.com","nationality":"France","language":"Spanish"}"#)
        .send()
        .await?;

    assert_eq!(
        res.status(),
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        "Non-JSON content type should be a 415, got: {}",
        res.status()
    );

    Ok(())
}

#[tokio::test]
async fn api_waitlist_wrong_verb_method_not_allowed() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .get(format!("http://{}/api/waitlist", app.addr))
        .send()
        .await?;

    assert_eq!(
        res.status(),
        StatusCode::METHOD_NOT_ALLOWED,
        "GET on the waitlist endpoint should be a 405, got: {}",
        res.status()
    );

    Ok(())
}
