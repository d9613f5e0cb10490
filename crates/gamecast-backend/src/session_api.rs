//! Session API client: create, poll, renegotiate and terminate play sessions

use async_trait::async_trait;
use reqwest::Method;

use gamecast_core::prelude::*;
use gamecast_core::FailureKind;

use crate::http::{CallError, HttpBackend};
use crate::protocol::{
    CreateSessionRequest, CreateSessionResponse, SessionStatusResponse, UpdateSessionRequest,
    UpdateSessionResponse,
};

/// Parameters of a `create_session` call
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSession {
    pub app_id: String,
    pub group_id: String,
    pub local_signal: String,
    pub regions: Vec<String>,
}

/// The four session operations of the backend
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// # Errors
    ///
    /// [`Error::SessionCreateFailed`] with [`FailureKind::Network`] when no
    /// response arrived, [`FailureKind::Api`] for rejections, malformed
    /// bodies and missing credentials.
    async fn create_session(&self, params: CreateSession) -> Result<CreateSessionResponse>;

    /// # Errors
    ///
    /// [`Error::StatusCheckFailed`] on any failure.
    async fn get_session_status(&self, group_id: &str, arn: &str)
        -> Result<SessionStatusResponse>;

    /// # Errors
    ///
    /// [`Error::SessionUpdateFailed`] on any failure.
    async fn update_session(
        &self,
        group_id: &str,
        arn: &str,
        local_signal: &str,
    ) -> Result<UpdateSessionResponse>;

    /// Best effort; callers log the [`Error::TerminateFailed`] and move on.
    async fn terminate_session(&self, group_id: &str, arn: &str) -> Result<()>;
}

/// [`SessionApi`] over the REST backend
#[derive(Clone)]
pub struct HttpSessionApi {
    backend: HttpBackend,
}

impl HttpSessionApi {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }
}

fn create_error(e: CallError) -> Error {
    let kind = match e {
        CallError::Network(_) => FailureKind::Network,
        CallError::Api(_) | CallError::Auth(_) => FailureKind::Api,
    };
    Error::create_failed(kind, e.to_string())
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn create_session(&self, params: CreateSession) -> Result<CreateSessionResponse> {
        let credential = self.backend.credential().await.map_err(create_error)?;

        let body = CreateSessionRequest {
            app_id: params.app_id,
            group_id: params.group_id,
            user_id: credential.user_id.clone(),
            signal_request: params.local_signal,
            regions: params.regions,
        };

        let url = self.backend.endpoint(&[""]);
        info!(
            "Creating session for {}:{} (regions: {:?})",
            body.app_id, body.group_id, body.regions
        );

        let request = self
            .backend
            .request(Method::POST, &url, &credential)
            .json(&body);
        let response: CreateSessionResponse =
            self.backend.send_json(request).await.map_err(create_error)?;

        if response.arn.trim().is_empty() {
            return Err(Error::create_failed(
                FailureKind::Api,
                "response did not include a session arn",
            ));
        }

        debug!(
            "Session created: arn={} status={:?}",
            response.arn, response.status
        );
        Ok(response)
    }

    async fn get_session_status(
        &self,
        group_id: &str,
        arn: &str,
    ) -> Result<SessionStatusResponse> {
        let credential = self
            .backend
            .credential()
            .await
            .map_err(|e| Error::status_check_failed(e.to_string()))?;

        let url = self.backend.endpoint(&["session", group_id, arn]);
        let request = self.backend.request(Method::GET, &url, &credential);
        let response: SessionStatusResponse = self
            .backend
            .send_json(request)
            .await
            .map_err(|e| Error::status_check_failed(e.to_string()))?;

        trace!(
            "Session {} status: {}",
            arn,
            response.status().unwrap_or("(none)")
        );
        Ok(response)
    }

    async fn update_session(
        &self,
        group_id: &str,
        arn: &str,
        local_signal: &str,
    ) -> Result<UpdateSessionResponse> {
        let credential = self
            .backend
            .credential()
            .await
            .map_err(|e| Error::update_failed(e.to_string()))?;

        let url = self.backend.endpoint(&["session", group_id, arn, "update"]);
        let body = UpdateSessionRequest {
            signal_request: local_signal.to_string(),
        };

        info!("Renegotiating session {}", arn);
        let request = self
            .backend
            .request(Method::POST, &url, &credential)
            .json(&body);
        self.backend
            .send_json(request)
            .await
            .map_err(|e| Error::update_failed(e.to_string()))
    }

    async fn terminate_session(&self, group_id: &str, arn: &str) -> Result<()> {
        let credential = self
            .backend
            .credential()
            .await
            .map_err(|e| Error::terminate_failed(e.to_string()))?;

        let url = self
            .backend
            .endpoint(&["session", group_id, arn, "terminate"]);

        info!("Terminating session {}", arn);
        let request = self.backend.request(Method::POST, &url, &credential);
        self.backend
            .send(request)
            .await
            .map_err(|e| Error::terminate_failed(e.to_string()))?;
        Ok(())
    }
}
