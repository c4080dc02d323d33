use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use wiremock::{
    matchers::{any, body_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{assert_redirect, TestApp, ERROR_PAGE, LIST_ID, SUCCESS_PAGE};

#[tokio::test]
async fn subscribe_valid_email_redirects_to_success() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/v3/marketing/contacts"))
        .and(method("PUT"))
        .and(header("Authorization", "Bearer SG.test"))
        .and(body_json(json!({
            "contacts": [{ "email": "a@b.com" }],
            "list_ids": [LIST_ID],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.contacts_server)
        .await;

    let res = app.get("/subscribe", Some("a@b.com")).await?;
    assert_redirect(&res, SUCCESS_PAGE);

    Ok(())
}

#[tokio::test]
async fn subscribe_invalid_email_redirects_to_error_without_calls() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.contacts_server)
        .await;

    let cases = [
        (None, "missing email"),
        (Some(""), "empty email"),
        (Some("not-an-email"), "no at sign"),
        (Some("@b.com"), "missing local part"),
        (Some("a@b"), "shorter than 5 chars"),
        (Some("a@b.com, c@d.com"), "two addresses"),
    ];

    for (email, description) in cases {
        let res = app.get("/subscribe", email).await?;
        assert_eq!(
            Some(ERROR_PAGE),
            res.headers()
                .get("location")
                .and_then(|loc| loc.to_str().ok()),
            "The API did not redirect to the error page for: {description}"
        );
        assert_redirect(&res, ERROR_PAGE);
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_forwards_only_the_address_of_a_named_mailbox() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(method("PUT"))
        .and(body_json(json!({
            "contacts": [{ "email": "ursula@example.com" }],
            "list_ids": [LIST_ID],
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&app.contacts_server)
        .await;

    let res = app
        .get("/subscribe", Some("Ursula Le Guin <ursula@example.com>"))
        .await?;
    assert_redirect(&res, SUCCESS_PAGE);

    Ok(())
}

#[tokio::test]
async fn subscribe_remote_rejection_still_redirects_to_success() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(method("PUT"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "errors": [{ "message": "invalid email" }] })),
        )
        .expect(1)
        .mount(&app.contacts_server)
        .await;

    let res = app.get("/subscribe", Some("a@b.com")).await?;
    assert_redirect(&res, SUCCESS_PAGE);

    Ok(())
}

#[tokio::test]
async fn subscribe_transport_error_redirects_to_error() -> Result<()> {
    let app = TestApp::spawn().await?;

    // Longer than the client timeout
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .expect(1)
        .mount(&app.contacts_server)
        .await;

    let res = app.get("/subscribe", Some("a@b.com")).await?;
    assert_redirect(&res, ERROR_PAGE);

    Ok(())
}

#[tokio::test]
async fn subscribe_accepts_any_method() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&app.contacts_server)
        .await;

    let res = app
        .http_client
        .post(format!("http://{}/subscribe", app.addr))
        .query(&[("email", "a@b.com")])
        .send()
        .await?;
    assert_redirect(&res, SUCCESS_PAGE);

    Ok(())
}
