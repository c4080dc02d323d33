use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, Request, Response},
    middleware, Router,
};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{MakeSpan, OnRequest, OnResponse, TraceLayer},
};
use tracing::{info, warn, Span};

use crate::AppState;

use super::{midware, routes::routes, REQUEST_ID_HEADER};

/// Serves the signup routes on `listener` until SIGINT or SIGTERM.
///
/// Sets up a TraceLayer that provides console logging and tags every request with an `x-request-id`.
pub async fn serve(listener: TcpListener, app_state: AppState) -> std::io::Result<()> {
    let x_request_id: HeaderName = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace_layer = build_trace_layer();

    let app = Router::new().merge(routes(app_state)).layer(
        ServiceBuilder::new()
            // Set UUID per request
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                MakeRequestUuid,
            ))
            .layer(trace_layer)
            // Responses travel the stack bottom-up: the mapper has to sit above the
            // propagation layer to see the request id on the response.
            .layer(middleware::map_response(midware::response_mapper))
            // Propagate UUID to response, keep it last so it processes the response first!
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{:<20} - {}", "Server stopped", "no longer accepting requests");

    Ok(())
}

/// Every answer is a redirect, so the interesting part of a response is where it sends
/// the browser. The request id is recorded on the span and repeated on the response line.
fn build_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl MakeSpan<Body> + Clone,
    impl OnRequest<Body> + Clone,
    impl OnResponse<Body> + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            let request_id = request_id(req.headers());

            tracing::info_span!(
                "signup",
                request_id,
                method = %req.method(),
                path = req.uri().path()
            )
        })
        .on_request(|req: &Request<Body>, _s: &Span| {
            tracing::debug!(query = req.uri().query().unwrap_or_default(), "received")
        })
        .on_response(|res: &Response<Body>, latency: Duration, _s: &Span| {
            let location = res
                .headers()
                .get(header::LOCATION)
                .and_then(|loc| loc.to_str().ok())
                .unwrap_or_default();

            tracing::info!(
                request_id = request_id(res.headers()),
                status = res.status().as_u16(),
                latency_ms = latency.as_millis() as u64,
                location,
                "redirected"
            )
        })
}

fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .unwrap_or_default()
}

/// Completes when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(er) = signal::ctrl_c().await {
            warn!(error = %er, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(er) => {
                warn!(error = %er, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
