use crate::helpers::{
    body_json, confirmation_page, spawn_app, spawn_app_with, FailingSubscriptionStore,
    InMemorySubscriptionStore,
};
use serde_json::json;
use unsubscribe::templates::{ConfirmationTemplate, UNSUBSCRIBE_SUCCESSFUL};

#[tokio::test]
async fn unsubscribe_returns_a_200_and_the_confirmation_page_for_valid_data() {
    // Arrange
    let app = spawn_app().await;
    app.store.subscribe("sub-123", "user@example.com");

    // Act
    let response = app
        .post_unsubscribe(json!({ "id": "sub-123", "emailAddress": "user@example.com" }))
        .await;

    // Assert
    assert_eq!(200, response.status_code);
    let body = body_json(&response);
    assert!(body.get("error").is_none());
    assert_eq!(body["data"], confirmation_page());
}

#[tokio::test]
async fn unsubscribe_removes_the_subscription() {
    let app = spawn_app().await;
    app.store.subscribe("sub-123", "user@example.com");
    app.store.subscribe("sub-456", "other@example.com");

    app.post_unsubscribe(json!({ "id": "sub-123", "emailAddress": "user@example.com" }))
        .await;

    assert!(!app.store.is_subscribed("user@example.com"));
    assert!(app.store.is_subscribed("other@example.com"));
}

#[tokio::test]
async fn unsubscribe_accepts_a_mailbox_with_a_display_name() {
    let app = spawn_app().await;
    app.store.subscribe("sub-123", "user@example.com");

    let response = app
        .post_unsubscribe(json!({ "id": "sub-123", "emailAddress": "User <user@example.com>" }))
        .await;

    assert_eq!(200, response.status_code);
    assert!(!app.store.is_subscribed("user@example.com"));
}

#[tokio::test]
async fn unsubscribe_reads_the_fields_from_the_query_string_of_a_get() {
    let app = spawn_app().await;
    app.store.subscribe("sub-123", "user@example.com");

    let response = app
        .get_unsubscribe(&[("id", "sub-123"), ("emailAddress", "user@example.com")])
        .await;

    assert_eq!(200, response.status_code);
    assert!(!app.store.is_subscribed("user@example.com"));
}

#[tokio::test]
async fn unsubscribing_twice_succeeds_both_times() {
    let app = spawn_app().await;
    app.store.subscribe("sub-123", "user@example.com");
    let body = json!({ "id": "sub-123", "emailAddress": "user@example.com" });

    let first = app.post_unsubscribe(body.clone()).await;
    let second = app.post_unsubscribe(body).await;

    assert_eq!(200, first.status_code);
    assert_eq!(200, second.status_code);
}

#[tokio::test]
async fn unsubscribe_returns_a_400_when_the_id_is_empty() {
    let app = spawn_app().await;

    let response = app
        .post_unsubscribe(json!({ "id": "", "emailAddress": "user@example.com" }))
        .await;

    assert_eq!(400, response.status_code);
    assert_eq!(
        body_json(&response),
        json!({ "error": "id cannot be empty" })
    );
}

#[tokio::test]
async fn unsubscribe_returns_a_400_when_fields_are_present_but_invalid() {
    let app = spawn_app().await;
    app.store.subscribe("sub-123", "user@example.com");

    let test_cases = vec![
        (
            json!({ "id": "sub-123", "emailAddress": "" }),
            "empty email",
            "failed to validate EmailAddress",
        ),
        (
            json!({ "id": "sub-123", "emailAddress": "definitely-not-an-email" }),
            "invalid email",
            "failed to validate EmailAddress",
        ),
        (
            json!({ "id": "sub-123", "emailAddress": "@example.com" }),
            "email missing subject",
            "failed to validate EmailAddress",
        ),
        (
            json!({ "id": "sub-123", "emailAddress": "@@@ <user@example.com>" }),
            "malformed display name",
            "failed to validate EmailAddress",
        ),
        (
            json!({ "id": 123, "emailAddress": "user@example.com" }),
            "numeric id",
            "id must be a string",
        ),
    ];

    for (invalid_body, description, expected_error) in test_cases {
        let response = app.post_unsubscribe(invalid_body).await;

        assert_eq!(
            400,
            response.status_code,
            "The API did not return a 400 when the payload was {}",
            description
        );
        let body = body_json(&response);
        assert!(
            body.get("data").is_none(),
            "The API returned a page when the payload was {}",
            description
        );
        assert!(
            body["error"].as_str().unwrap().starts_with(expected_error),
            "Unexpected error {} when the payload was {}",
            body["error"],
            description
        );
    }

    assert!(app.store.is_subscribed("user@example.com"));
}

#[tokio::test]
async fn unsubscribe_returns_a_400_when_data_is_missing() {
    let app = spawn_app().await;

    let test_cases = vec![
        (r#"{"id": "sub-123"}"#, "missing the email address"),
        (r#"{"emailAddress": "user@example.com"}"#, "missing the id"),
        ("{}", "missing both id and email address"),
        ("", "an empty body"),
        ("id=sub-123", "a body that is not JSON"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_unsubscribe_raw(invalid_body).await;

        assert_eq!(
            400,
            response.status_code,
            "The API did not fail with 400 bad request when the payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn unsubscribe_returns_a_500_and_still_the_page_when_the_store_fails() {
    let app = spawn_app_with(
        FailingSubscriptionStore::default(),
        ConfirmationTemplate::load(UNSUBSCRIBE_SUCCESSFUL),
    )
    .await;

    let response = app
        .post_unsubscribe(json!({ "id": "sub-123", "emailAddress": "user@example.com" }))
        .await;

    assert_eq!(500, response.status_code);
    let body = body_json(&response);
    assert_eq!(
        body["error"],
        "failed to delete subscription: connection reset by peer"
    );
    assert_eq!(body["data"], confirmation_page());
}

#[tokio::test]
async fn unsubscribe_returns_a_500_when_the_id_does_not_match_the_subscription() {
    let app = spawn_app().await;
    app.store.subscribe("sub-123", "user@example.com");

    let response = app
        .post_unsubscribe(json!({ "id": "sub-999", "emailAddress": "user@example.com" }))
        .await;

    assert_eq!(500, response.status_code);
    assert_eq!(body_json(&response)["data"], confirmation_page());
    assert!(app.store.is_subscribed("user@example.com"));
}

#[tokio::test]
async fn every_request_fails_with_a_500_when_the_template_did_not_load() {
    let app = spawn_app_with(
        InMemorySubscriptionStore::default(),
        ConfirmationTemplate::load("missing.tmpl.html"),
    )
    .await;
    app.store.subscribe("sub-123", "user@example.com");

    let test_cases = vec![
        (
            json!({ "id": "sub-123", "emailAddress": "user@example.com" }),
            "a valid request",
        ),
        (
            json!({ "id": "", "emailAddress": "user@example.com" }),
            "an empty id",
        ),
        (
            json!({ "id": "sub-123", "emailAddress": "definitely-not-an-email" }),
            "an invalid email",
        ),
    ];

    for (body, description) in test_cases {
        let response = app.post_unsubscribe(body).await;

        assert_eq!(
            500,
            response.status_code,
            "The API did not fail with 500 for {}",
            description
        );
        let body = body_json(&response);
        assert!(body.get("data").is_none());
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("failed to create template from file"));
    }

    // Nothing is deleted once the template is known to be unavailable.
    assert!(app.store.is_subscribed("user@example.com"));
}

#[tokio::test]
async fn a_template_that_fails_to_render_yields_a_500_without_a_page() {
    let app = spawn_app_with(
        InMemorySubscriptionStore::default(),
        ConfirmationTemplate::from_source("broken.tmpl.html", "<div>{{ page.title }}</div>"),
    )
    .await;
    app.store.subscribe("sub-123", "user@example.com");

    let response = app
        .post_unsubscribe(json!({ "id": "sub-123", "emailAddress": "user@example.com" }))
        .await;

    assert_eq!(500, response.status_code);
    let body = body_json(&response);
    assert!(body.get("data").is_none());
    assert!(body["error"].as_str().unwrap().starts_with(
        "failed to render confirmation template: failed to render template broken.tmpl.html"
    ));
    assert!(app.store.is_subscribed("user@example.com"));
}

#[tokio::test]
async fn responses_allow_the_configured_origin() {
    let app = spawn_app().await;

    let response = app
        .post_unsubscribe(json!({ "id": "", "emailAddress": "user@example.com" }))
        .await;

    assert_eq!(response.headers["content-type"], "application/json");
    assert_eq!(
        response.headers["access-control-allow-origin"],
        app.allowed_origin.as_str()
    );
}
