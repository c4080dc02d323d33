//! The standing-server binding of the signup handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tracing::warn;

use crate::{
    web::{
        handlers::{self, Outcome, SUBSCRIBE_PATH, UNSUBSCRIBE_PATH},
        types::EmailQuery,
    },
    AppState,
};

/// All the routes of the server.
/// Both paths accept any method, everything else falls through to the error page.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route(SUBSCRIBE_PATH, any(subscribe))
        .route(UNSUBSCRIBE_PATH, any(unsubscribe))
        .fallback(fallback)
        .with_state(app_state)
}

async fn subscribe(
    State(app_state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Response {
    let query = email_query(query);
    let outcome = handlers::subscribe(&app_state, query.email.as_deref()).await;

    redirect(&app_state, outcome)
}

async fn unsubscribe(
    State(app_state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Response {
    let query = email_query(query);
    let outcome = handlers::unsubscribe(&app_state, query.email.as_deref());

    redirect(&app_state, outcome)
}

async fn fallback(State(app_state): State<AppState>, uri: Uri) -> Response {
    redirect(&app_state, handlers::not_found(uri.path()))
}

/// A query that can't be deserialized counts as a missing `email`.
fn email_query(query: Result<Query<EmailQuery>, QueryRejection>) -> EmailQuery {
    query.map(|Query(query)| query).unwrap_or_else(|er| {
        warn!(error = %er, "failed to read the query string");
        EmailQuery::default()
    })
}

/// Builds the `303 See Other` for `outcome`.
///
/// A failure is stored in the response extensions so the response mapper can log it.
pub fn redirect(app_state: &AppState, outcome: Outcome) -> Response {
    let mut resp = StatusCode::SEE_OTHER.into_response();

    let headers = resp.headers_mut();
    headers.insert(header::LOCATION, outcome.location(app_state).clone());
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    if let Outcome::Failure(er) = outcome {
        resp.extensions_mut().insert(Arc::new(er));
    }

    resp
}
