//! Shared HTTP plumbing for the catalog and session clients

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use gamecast_core::prelude::*;
use gamecast_core::Credential;

use crate::auth::AuthProvider;

/// Characters left as-is in a path segment (RFC 3986 unreserved)
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Longest slice of an error body kept in messages
const MAX_ERROR_BODY: usize = 200;

/// Why a backend call failed, before it is mapped onto an operation's error
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CallError {
    /// No credential available
    Auth(String),
    /// No HTTP response (connect, DNS, timeout, request construction)
    Network(String),
    /// Non-2xx status or malformed body
    Api(String),
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Auth(msg) => write!(f, "sign-in required: {msg}"),
            CallError::Network(msg) | CallError::Api(msg) => f.write_str(msg),
        }
    }
}

/// Base URL, HTTP client and credential source shared by every backend call
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    auth: Arc<dyn AuthProvider>,
}

impl HttpBackend {
    /// Build a backend handle for `base_url`.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the URL does not parse or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, timeout: Duration, auth: Arc<dyn AuthProvider>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid api.base_url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "api.base_url '{base_url}' cannot be used as a base URL"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gamecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    /// Join percent-encoded path segments onto the base URL
    pub fn endpoint(&self, segments: &[&str]) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path: Vec<String> = segments
            .iter()
            .map(|s| utf8_percent_encode(s, PATH_SEGMENT).to_string())
            .collect();
        format!("{}/{}", base, path.join("/"))
    }

    pub(crate) async fn credential(&self) -> std::result::Result<Credential, CallError> {
        self.auth
            .current_credential()
            .await
            .map_err(|e| match e {
                Error::Unauthenticated { reason } => CallError::Auth(reason),
                other => CallError::Auth(other.to_string()),
            })
    }

    /// Start an authorized request
    pub(crate) fn request(
        &self,
        method: Method,
        url: &str,
        credential: &Credential,
    ) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&credential.token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send a request and decode a JSON response body
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, CallError> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                CallError::Network(format!("timed out reading response: {e}"))
            } else {
                CallError::Api(format!("malformed response: {e}"))
            }
        })
    }

    /// Send a request and check its status, discarding the body
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<Response, CallError> {
        let response = request.send().await.map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.trim();
            let message = if body.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {}", truncate(body, MAX_ERROR_BODY))
            };
            return Err(CallError::Api(message));
        }

        Ok(response)
    }
}

/// An error from `send()` never carries an HTTP response
fn classify_send_error(e: reqwest::Error) -> CallError {
    if e.is_timeout() {
        CallError::Network(format!("request timed out: {e}"))
    } else if e.is_connect() {
        CallError::Network(format!("could not connect: {e}"))
    } else {
        CallError::Network(e.to_string())
    }
}

/// Cut `s` to at most `max` characters
pub(crate) fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
