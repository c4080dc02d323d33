use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use wiremock::{
    matchers::{any, body_json, method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::helpers::{assert_redirect, TestApp, ERROR_PAGE, LIST_ID, SUCCESS_PAGE};

#[tokio::test]
async fn unsubscribe_redirects_before_the_delete_completes() -> Result<()> {
    let app = TestApp::spawn().await?;

    // The search answers slowly so the redirect is back long before the delete is sent.
    Mock::given(path("/v3/marketing/contacts/search"))
        .and(method("POST"))
        .and(body_json(json!({ "query": "email = 'a@b.com'" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": [{ "id": "abc", "email": "a@b.com" }] }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&app.contacts_server)
        .await;
    Mock::given(path(format!("/v3/marketing/lists/{LIST_ID}/contacts")))
        .and(method("DELETE"))
        .and(query_param("contact_ids", "abc"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&app.contacts_server)
        .await;

    let res = app.get("/unsubscribe", Some("a@b.com")).await?;
    assert_redirect(&res, SUCCESS_PAGE);
    assert!(app.requests_with_method("DELETE").await.is_empty());

    let deletes = app.wait_for_requests("DELETE", 1).await?;
    assert_eq!(1, deletes.len());

    Ok(())
}

#[tokio::test]
async fn unsubscribe_missing_or_empty_email_redirects_to_error() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.contacts_server)
        .await;

    for email in [None, Some("")] {
        let res = app.get("/unsubscribe", email).await?;
        assert_redirect(&res, ERROR_PAGE);
    }

    Ok(())
}

#[tokio::test]
async fn unsubscribe_accepts_any_non_empty_email() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(method("POST"))
        .and(body_json(json!({ "query": "email = 'not-an-email'" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .expect(1)
        .mount(&app.contacts_server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.contacts_server)
        .await;

    let res = app.get("/unsubscribe", Some("not-an-email")).await?;
    assert_redirect(&res, SUCCESS_PAGE);

    app.wait_for_requests("POST", 1).await?;

    Ok(())
}

#[tokio::test]
async fn address_with_apostrophe_is_refused_by_both_routes() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.contacts_server)
        .await;

    // Never stored, so there is no contact left behind that unsubscribe can't reach.
    let res = app.get("/subscribe", Some("o'brien@example.com")).await?;
    assert_redirect(&res, ERROR_PAGE);

    let res = app.get("/unsubscribe", Some("o'brien@example.com")).await?;
    assert_redirect(&res, ERROR_PAGE);

    Ok(())
}
