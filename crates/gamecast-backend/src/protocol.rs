//! Wire types for the session REST API

use gamecast_core::null_as_default;
use serde::{Deserialize, Serialize};

/// Body of `POST /`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSessionRequest {
    #[serde(rename = "AppIdentifier")]
    pub app_id: String,
    #[serde(rename = "SGIdentifier")]
    pub group_id: String,
    #[serde(rename = "UserId")]
    pub user_id: String,
    #[serde(rename = "SignalRequest")]
    pub signal_request: String,
    #[serde(rename = "Regions")]
    pub regions: Vec<String>,
}

/// Response of `POST /`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    #[serde(alias = "Arn")]
    pub arn: String,
    #[serde(default, alias = "Region")]
    pub region: Option<String>,
    #[serde(default, alias = "Status")]
    pub status: Option<String>,
    #[serde(default, alias = "SignalResponse")]
    pub signal_response: Option<String>,
}

impl CreateSessionResponse {
    pub fn remote_signal(&self) -> Option<&str> {
        non_empty(self.signal_response.as_deref())
    }
}

/// Response of `GET /session/{groupId}/{arn}`.
///
/// Every field may be missing or `null`: a pending session has no region yet,
/// and some backends answer with only the remote signal.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    #[serde(default, alias = "Arn", deserialize_with = "null_as_default")]
    pub arn: String,
    #[serde(default, alias = "Region")]
    pub region: Option<String>,
    #[serde(default, alias = "Status")]
    pub status: Option<String>,
    #[serde(default, alias = "SignalResponse")]
    pub signal_response: Option<String>,
}

impl SessionStatusResponse {
    pub fn remote_signal(&self) -> Option<&str> {
        non_empty(self.signal_response.as_deref())
    }

    /// Backend status, if one was reported
    pub fn status(&self) -> Option<&str> {
        non_empty(self.status.as_deref())
    }

    /// Assigned region, if already known
    pub fn region(&self) -> Option<&str> {
        non_empty(self.region.as_deref())
    }
}

/// Body of `POST /session/{groupId}/{arn}/update`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateSessionRequest {
    #[serde(rename = "SignalRequest")]
    pub signal_request: String,
}

/// Response of `POST /session/{groupId}/{arn}/update`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionResponse {
    #[serde(default, alias = "SignalResponse")]
    pub signal_response: Option<String>,
}

impl UpdateSessionResponse {
    pub fn remote_signal(&self) -> Option<&str> {
        non_empty(self.signal_response.as_deref())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
