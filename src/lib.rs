//! Forwards newsletter sign-ups from a web form to the SendGrid Marketing Contacts API.
//!
//! The same signup handlers are served either by a standing axum server or by an
//! API Gateway triggered Lambda function, see `App::run`.

pub mod app;
pub mod config;
pub mod contacts_client;
mod error;
pub mod gateway;
pub mod queue;
pub mod web;

pub use app::{App, AppState};
pub use contacts_client::ContactsClient;
pub use error::{Error, Result};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Compact, human readable logs for local development.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .compact()
        .init();
}

/// JSON lines, one object per event.
pub fn init_production_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();
}
