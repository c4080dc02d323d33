use std::sync::Arc;

use axum::{
    http::{header, Method, Uri},
    response::Response,
};
use uuid::Uuid;

use crate::web::{log, SignupError, REQUEST_ID_HEADER};

/// Writes a log line for every response leaving the server.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    let request_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let signup_error = resp
        .extensions()
        .get::<Arc<SignupError>>()
        .map(|er| &**er);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|loc| loc.to_str().ok());

    log::log_request(
        request_id,
        &req_method,
        &uri,
        resp.status(),
        location,
        signup_error,
    );

    resp
}
