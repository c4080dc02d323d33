use anyhow::Result;
use wiremock::{matchers::any, Mock, ResponseTemplate};

use crate::helpers::{assert_redirect, TestApp, ERROR_PAGE};

#[tokio::test]
async fn unknown_paths_redirect_to_error_without_calls() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.contacts_server)
        .await;

    for path in ["/", "/health-check", "/subscribe/confirm", "/Unsubscribe"] {
        let res = app.get(path, Some("a@b.com")).await?;
        assert_redirect(&res, ERROR_PAGE);
    }

    let res = app
        .http_client
        .delete(format!("http://{}/contacts", app.addr))
        .send()
        .await?;
    assert_redirect(&res, ERROR_PAGE);

    Ok(())
}
