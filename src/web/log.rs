use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::web::SignupError;

/// Logs one JSON line describing a finished request.
/// Shared by both adapters so every request looks the same in the logs.
pub fn log_request(
    request_id: String,
    req_method: &Method,
    uri: &Uri,
    status_code: StatusCode,
    location: Option<&str>,
    signup_error: Option<&SignupError>,
) {
    let logline = LogLine {
        timestamp: chrono::Utc::now().to_rfc3339(),
        request_id,
        req_method: req_method.to_string(),
        uri: uri.to_string(),
        status_code: status_code.as_u16(),
        location: location.map(str::to_string),
        error_type: signup_error.map(|er| er.as_ref().to_string()),
        error_detail: signup_error.map(|er| er.to_string()),
    };

    info!("LOGLINE: {}", json!(logline));
}

#[derive(Serialize)]
struct LogLine {
    timestamp: String,
    request_id: String,

    req_method: String,
    uri: String,
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
}
