//! The API Gateway binding of the signup handlers.
//!
//! Each Lambda invocation is answered with the same redirect the standing server
//! would send. Deletions queued here only progress while the runtime is thawed,
//! a frozen or recycled execution environment can leave them unprocessed.

use lambda_http::{
    http::{header, HeaderValue, StatusCode},
    service_fn, Body, Request, RequestExt, Response,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    web::{handlers, log},
    AppState,
};

/// Hands control to the Lambda runtime, only returns if the runtime fails.
pub async fn run(app_state: AppState) -> Result<(), lambda_http::Error> {
    info!("{:<12} - Waiting for invocations", "gateway");

    lambda_http::run(service_fn(move |req: Request| {
        let app_state = app_state.clone();
        async move { handle(&app_state, req).await }
    }))
    .await
}

#[tracing::instrument(name = "gateway", skip_all, fields(path = %route_path(&req)))]
pub async fn handle(
    app_state: &AppState,
    req: Request,
) -> Result<Response<Body>, lambda_http::Error> {
    let request_id = req
        .lambda_context_ref()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let email = req
        .query_string_parameters_ref()
        .and_then(|params| params.first("email"));
    let outcome = handlers::handle(app_state, route_path(&req), email).await;

    let location = outcome.location(app_state).clone();
    let resp = Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(header::LOCATION, location.clone())
        .header(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        )
        .body(Body::Empty)?;

    log::log_request(
        request_id,
        req.method(),
        req.uri(),
        resp.status(),
        location.to_str().ok(),
        outcome.error(),
    );

    Ok(resp)
}

/// The resource path as API Gateway matched it.
///
/// A REST API stage (`/prod`) is part of the request uri but not of the routed path.
/// Requests that didn't come from an event have no raw path and fall back to the uri.
fn route_path(req: &Request) -> &str {
    match req.raw_http_path() {
        "" => req.uri().path(),
        path => path,
    }
}
