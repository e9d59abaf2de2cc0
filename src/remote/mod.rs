//! Remote user service: the REST backend holding user records.
//!
//! [`UserService`] is the seam the store talks to; [`HttpUserService`] is the
//! real implementation on top of a blocking `reqwest` client.
//!
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::model::{User, UserDraft, UserPatch};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Errors raised while talking to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connect, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("{url} returned {status}")]
    Status { status: StatusCode, url: String },

    /// Body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Operations offered by the remote user service.
pub trait UserService: Send + Sync {
    fn list_users(&self) -> Result<Vec<User>, ApiError>;
    fn create_user(&self, draft: &UserDraft) -> Result<User, ApiError>;
    /// Returns whatever the server echoes back, which may be partial.
    fn update_user(&self, id: u64, patch: &UserPatch) -> Result<UserPatch, ApiError>;
    fn delete_user(&self, id: u64) -> Result<(), ApiError>;
}

/// [`UserService`] over HTTP/JSON.
#[derive(Clone, Debug)]
pub struct HttpUserService {
    client: Client,
    base_url: String,
}

impl HttpUserService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use a preconfigured client (proxy, TLS or header settings of the caller's choosing).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn record_url(&self, id: u64) -> String {
        format!("{}/users/{}", self.base_url, id)
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status,
            url: response.url().to_string(),
        })
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = check_status(response)?.text()?;
    Ok(serde_json::from_str(&body)?)
}

impl UserService for HttpUserService {
    fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.collection_url();
        debug!(%url, "GET");
        decode(self.client.get(&url).send()?)
    }

    fn create_user(&self, draft: &UserDraft) -> Result<User, ApiError> {
        let url = self.collection_url();
        debug!(%url, "POST");
        decode(self.client.post(&url).json(draft).send()?)
    }

    fn update_user(&self, id: u64, patch: &UserPatch) -> Result<UserPatch, ApiError> {
        let url = self.record_url(id);
        debug!(%url, "PUT");
        decode(self.client.put(&url).json(patch).send()?)
    }

    fn delete_user(&self, id: u64) -> Result<(), ApiError> {
        let url = self.record_url(id);
        debug!(%url, "DELETE");
        check_status(self.client.delete(&url).send()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let svc = HttpUserService::new("http://localhost:8080/api/", Duration::from_secs(1))
            .expect("client");
        assert_eq!(svc.base_url(), "http://localhost:8080/api");
        assert_eq!(svc.collection_url(), "http://localhost:8080/api/users");
        assert_eq!(svc.record_url(7), "http://localhost:8080/api/users/7");
    }

    #[test]
    fn status_error_display_names_url() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            url: "http://x/users/9".into(),
        };
        assert_eq!(err.to_string(), "http://x/users/9 returned 404 Not Found");
    }
}
