use reqwest::{header, Client, Method, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::web::types::ValidEmail;

// ###################################
// ->   STRUCTS
// ###################################
/// A client for the SendGrid Marketing Contacts API (v3).
///
/// Every request carries the `Authorization: Bearer` header. Response status codes
/// are not interpreted, callers get the raw body back and decide what it means.
#[derive(Debug, Clone)]
pub struct ContactsClient {
    pub http_client: Client,
    pub url: Url,
    pub list_id: String,
    api_key: SecretString,
}

#[derive(Serialize)]
pub struct AddContactsBody<'a> {
    pub contacts: [ContactEmail<'a>; 1],
    pub list_ids: [&'a str; 1],
}

#[derive(Serialize)]
pub struct ContactEmail<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub struct SearchBody {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub result: Vec<ContactRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

// ###################################
// ->   IMPLs
// ###################################
impl ContactsClient {
    pub fn new<S: AsRef<str>>(
        url: S,
        api_key: SecretString,
        list_id: String,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(ContactsClient {
            http_client,
            url,
            list_id,
            api_key,
        })
    }

    /// Sends a request to `endpoint` and returns the full response body.
    ///
    /// `content-type: application/json` is only attached to POST and PUT requests with a body.
    pub async fn send_request<B>(
        &self,
        method: Method,
        endpoint: Url,
        body: Option<&B>,
    ) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http_client
            .request(method.clone(), endpoint)
            .bearer_auth(self.api_key.expose_secret());

        if let Some(body) = body {
            if method == Method::POST || method == Method::PUT {
                request = request.header(header::CONTENT_TYPE, "application/json");
            }
            request = request.body(serde_json::to_vec(body)?);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!(%method, status = status.as_u16(), "contacts api returned a non-success status");
        }

        Ok(body)
    }

    /// Adds `email` to the configured contact list.
    pub async fn add_contact(&self, email: &ValidEmail) -> Result<()> {
        let endpoint = self.endpoint(&["v3", "marketing", "contacts"])?;
        let body = AddContactsBody {
            contacts: [ContactEmail {
                email: email.as_ref(),
            }],
            list_ids: [self.list_id.as_str()],
        };

        let resp = self
            .send_request(Method::PUT, endpoint, Some(&body))
            .await
            .map_err(|er| Error::AddFailed(Box::new(er)))?;
        info!(response = %resp, "add contact response");

        Ok(())
    }

    /// Looks up the id of the contact with `email`.
    /// Only the first match is returned; the remote service decides the order.
    pub async fn search_contact(&self, email: &str) -> Result<String> {
        let endpoint = self.endpoint(&["v3", "marketing", "contacts", "search"])?;
        let body = SearchBody {
            query: email_query(email)?,
        };

        let resp = self.send_request(Method::POST, endpoint, Some(&body)).await?;

        let search: SearchResponse = serde_json::from_str(&resp).map_err(|er| {
            warn!(error = %er, response = %resp, "search response has an unexpected shape");
            Error::ContactNotFound
        })?;

        search
            .result
            .into_iter()
            .next()
            .map(|record| record.id)
            .ok_or(Error::ContactNotFound)
    }

    /// Resolves `email` to a contact id and removes that contact from the configured list.
    pub async fn delete_contact(&self, email: &str) -> Result<()> {
        let id = self.search_contact(email).await.inspect_err(|er| {
            warn!(error = %er, "delete contact: search failed");
        })?;
        info!(contact_id = %id, "delete contact: resolved id");

        let mut endpoint =
            self.endpoint(&["v3", "marketing", "lists", &self.list_id, "contacts"])?;
        endpoint.query_pairs_mut().append_pair("contact_ids", &id);

        let resp = self
            .send_request::<()>(Method::DELETE, endpoint, None)
            .await
            .inspect_err(|er| {
                warn!(error = %er, "delete contact: request failed");
            })?;
        info!(response = %resp, "delete contact response");
        info!("deleted: {email}");

        Ok(())
    }

    /// Appends `segments` to the base url, percent-encoding each of them.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::UrlParsing(format!("{} cannot be a base url", self.url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

/// Builds the `email = '<addr>'` query used by the search endpoint.
///
/// Values that could break out of the quoted literal are refused.
pub fn email_query(email: &str) -> Result<String> {
    if !is_query_safe(email) {
        return Err(Error::InvalidQueryValue(email.to_string()));
    }

    Ok(format!("email = '{email}'"))
}

/// True if `value` can sit inside a quoted search literal as is.
pub fn is_query_safe(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c == '\'' || c == '\\' || c.is_control())
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, strum_macros::AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("value can't be used in a contacts query: {0:?}")]
    InvalidQueryValue(String),
    #[error("could not send address to sendgrid: {0}")]
    AddFailed(Box<Error>),
    #[error("email address not in sendgrid")]
    ContactNotFound,

    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
