use strum_macros::AsRefStr;

use crate::{contacts_client, queue, web::types::DataParsingError};

pub type WebResult<T> = core::result::Result<T, SignupError>;

/// Everything that sends a browser to the error page.
/// None of it is shown to the user, it only ends up in the logs.
#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum SignupError {
    #[error("email parameter not supplied")]
    EmailMissing,
    #[error("no route for path: {0}")]
    RouteNotFound(String),

    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),
    #[error("contacts client error: {0}")]
    ContactsClient(#[from] contacts_client::Error),
    #[error("deletion queue error: {0}")]
    Queue(#[from] queue::QueueError),
}
