//! Structs the handlers validate their input into, their parsing implementations and tests for those.

use axum::http::HeaderValue;
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidateEmail;

use crate::{config::RedirectConfig, contacts_client};

/// Addresses shorter than this are rejected even if they parse.
pub const MIN_EMAIL_LEN: usize = 5;
const MAX_EMAIL_LEN: usize = 256;

// ###################################
// ->   STRUCTS
// ###################################
/// The query both routes read: `?email=...`
#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Validated Subscriber Email
///
/// Accepts an RFC 5322 mailbox (`Jane <jane@example.com>` or a bare address) and keeps
/// only the address part.
///
/// Stricter than a bare RFC 5322 parse: the address must also pass `validate_email`
/// (HTML5 rules), so quoted local parts like `"john doe"@example.com` are rejected.
/// Addresses the contacts search can't express (`'`, `\`) are rejected too,
/// every stored contact has to stay removable through `/unsubscribe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.graphemes(true).count() > MAX_EMAIL_LEN {
            return Err(DataParsingError::EmailTooLong);
        }

        let addr = mailparse::addrparse(value)
            .ok()
            .and_then(|list| list.extract_single_info())
            .map(|info| info.addr)
            .ok_or(DataParsingError::EmailInvalid)?;

        if addr.graphemes(true).count() < MIN_EMAIL_LEN {
            return Err(DataParsingError::EmailTooShort);
        }

        if !addr.validate_email() {
            return Err(DataParsingError::EmailInvalid);
        }
        if !contacts_client::is_query_safe(&addr) {
            return Err(DataParsingError::EmailNotSearchable);
        }

        Ok(ValidEmail(addr))
    }
}

/// The two pages a browser can end up on, ready to be used as `Location` headers.
#[derive(Debug, Clone)]
pub struct Redirects {
    pub success: HeaderValue,
    pub error: HeaderValue,
}

impl TryFrom<&RedirectConfig> for Redirects {
    type Error = DataParsingError;

    fn try_from(config: &RedirectConfig) -> Result<Self, Self::Error> {
        let header = |page: &str| {
            HeaderValue::from_str(page)
                .map_err(|_| DataParsingError::RedirectInvalid(page.to_string()))
        };

        Ok(Redirects {
            success: header(&config.success_page)?,
            error: header(&config.error_page)?,
        })
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email invalid")]
    EmailInvalid,
    #[error("email too long")]
    EmailTooLong,
    #[error("email too short")]
    EmailTooShort,
    #[error("email can't be used in a contacts search")]
    EmailNotSearchable,

    #[error("redirect target can't be used as a header: {0}")]
    RedirectInvalid(String),
}
