//! The signup logic both inbound adapters share.
//!
//! Every handler turns its input into an `Outcome`; the adapters only translate their
//! request envelope into these calls and the `Outcome` back into a `303 See Other`.

use axum::http::HeaderValue;
use tracing::{info, warn};

use crate::{
    contacts_client,
    web::{types::ValidEmail, SignupError, WebResult},
    AppState,
};

pub const SUBSCRIBE_PATH: &str = "/subscribe";
pub const UNSUBSCRIBE_PATH: &str = "/unsubscribe";

// ###################################
// ->   STRUCTS
// ###################################
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Subscribe,
    Unsubscribe,
    Unknown,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path {
            SUBSCRIBE_PATH => Route::Subscribe,
            UNSUBSCRIBE_PATH => Route::Unsubscribe,
            _ => Route::Unknown,
        }
    }
}

/// Where the browser gets sent.
#[derive(Debug)]
pub enum Outcome {
    Success,
    Failure(SignupError),
}

impl Outcome {
    pub fn location<'a>(&self, app_state: &'a AppState) -> &'a HeaderValue {
        match self {
            Outcome::Success => &app_state.redirects.success,
            Outcome::Failure(_) => &app_state.redirects.error,
        }
    }

    pub fn error(&self) -> Option<&SignupError> {
        match self {
            Outcome::Success => None,
            Outcome::Failure(er) => Some(er),
        }
    }
}

impl From<WebResult<()>> for Outcome {
    fn from(value: WebResult<()>) -> Self {
        match value {
            Ok(()) => Outcome::Success,
            Err(er) => {
                warn!(error = %er, "request failed");
                Outcome::Failure(er)
            }
        }
    }
}

// ###################################
// ->   HANDLERS
// ###################################
/// Dispatches on the request path, used by adapters without their own router.
pub async fn handle(app_state: &AppState, path: &str, email: Option<&str>) -> Outcome {
    match Route::from_path(path) {
        Route::Subscribe => subscribe(app_state, email).await,
        Route::Unsubscribe => unsubscribe(app_state, email),
        Route::Unknown => not_found(path),
    }
}

#[tracing::instrument(name = "Adding a new contact to the list", skip(app_state))]
pub async fn subscribe(app_state: &AppState, email: Option<&str>) -> Outcome {
    try_subscribe(app_state, email).await.into()
}

async fn try_subscribe(app_state: &AppState, email: Option<&str>) -> WebResult<()> {
    let email = ValidEmail::parse(email.ok_or(SignupError::EmailMissing)?)?;

    app_state.contacts_client.add_contact(&email).await?;
    info!("SUCCESS");

    Ok(())
}

/// Queues the deletion and answers right away, the contact is removed in the background.
#[tracing::instrument(name = "Queueing a contact deletion", skip(app_state))]
pub fn unsubscribe(app_state: &AppState, email: Option<&str>) -> Outcome {
    try_unsubscribe(app_state, email).into()
}

fn try_unsubscribe(app_state: &AppState, email: Option<&str>) -> WebResult<()> {
    let email = email
        .filter(|email| !email.is_empty())
        .ok_or(SignupError::EmailMissing)?;

    // The worker could never find it, answer with the error page instead of queueing.
    contacts_client::email_query(email)?;

    app_state.deletion_queue.enqueue(email)?;
    info!("deletion queued");

    Ok(())
}

pub fn not_found(path: &str) -> Outcome {
    Err::<(), _>(SignupError::RouteNotFound(path.to_string())).into()
}
