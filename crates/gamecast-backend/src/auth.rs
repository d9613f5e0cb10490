//! Credential providers.
//!
//! Token issuance belongs to an external identity provider. The client only
//! needs a way to read the current bearer token, and it asks again before
//! every API call so a refreshed token is picked up without a restart.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use gamecast_core::prelude::*;
use gamecast_core::Credential;

/// Source of the current user's credential
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Return the credential to use for the next request.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthenticated`] when no usable token is available.
    async fn current_credential(&self) -> Result<Credential>;
}

// ---------------------------------------------------------------------------
// Static token
// ---------------------------------------------------------------------------

/// A fixed token, typically from the settings file
#[derive(Clone)]
pub struct StaticTokenProvider {
    credential: Credential,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            credential: Credential::new(token, user_id),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn current_credential(&self) -> Result<Credential> {
        if self.credential.token.trim().is_empty() {
            return Err(Error::unauthenticated("configured token is empty"));
        }
        Ok(self.credential.clone())
    }
}

// ---------------------------------------------------------------------------
// Environment variable
// ---------------------------------------------------------------------------

/// Reads the token from an environment variable on every call
pub struct EnvTokenProvider {
    var: String,
    user_id: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for EnvTokenProvider {
    async fn current_credential(&self) -> Result<Credential> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => {
                Ok(Credential::new(token.trim(), &self.user_id))
            }
            Ok(_) => Err(Error::unauthenticated(format!("${} is empty", self.var))),
            Err(_) => Err(Error::unauthenticated(format!("${} is not set", self.var))),
        }
    }
}

// ---------------------------------------------------------------------------
// Token file
// ---------------------------------------------------------------------------

/// JSON form of the token file written by identity helpers
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenFile {
    token: String,
    #[serde(default, alias = "user_id")]
    user_id: Option<String>,
}

/// Reads the token from a file on every call.
///
/// The file holds either the bare token or a JSON object
/// `{"token": "...", "userId": "..."}`. A user id in the file wins over the
/// configured one.
pub struct FileTokenProvider {
    path: PathBuf,
    user_id: String,
}

impl FileTokenProvider {
    pub fn new(path: impl Into<PathBuf>, user_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            user_id: user_id.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, content: &str) -> Result<Credential> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::unauthenticated(format!(
                "token file {} is empty",
                self.path.display()
            )));
        }

        if content.starts_with('{') {
            let file: TokenFile = serde_json::from_str(content).map_err(|e| {
                Error::unauthenticated(format!(
                    "token file {} is not valid JSON: {e}",
                    self.path.display()
                ))
            })?;
            let user_id = file.user_id.unwrap_or_else(|| self.user_id.clone());
            return Ok(Credential::new(file.token, user_id));
        }

        Ok(Credential::new(content, &self.user_id))
    }
}

#[async_trait]
impl AuthProvider for FileTokenProvider {
    async fn current_credential(&self) -> Result<Credential> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            debug!("Failed to read token file {}: {}", self.path.display(), e);
            Error::unauthenticated(format!(
                "cannot read token file {}: {e}",
                self.path.display()
            ))
        })?;
        self.parse(&content)
    }
}

// ---------------------------------------------------------------------------
// Missing configuration
// ---------------------------------------------------------------------------

/// Used when no token source is configured; every call fails
pub struct NoCredentials;

#[async_trait]
impl AuthProvider for NoCredentials {
    async fn current_credential(&self) -> Result<Credential> {
        Err(Error::unauthenticated(
            "no token configured (set auth.token, auth.token_env or auth.token_file)",
        ))
    }
}
