//! User-status operations (online state and status messages).
//!
//! Available on servers at or past
//! [`Milestone::USER_STATUS`](nimbus_version::Milestone::USER_STATUS); older
//! servers answer 404 and the operations surface that as a status failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::{AuthClient, HttpRequest};
use crate::error::{RemoteError, RemoteResult};
use crate::ocs;
use crate::operation::{RemoteOperation, ensure_success};

const USER_STATUS_PATH: &str = "ocs/v2.php/apps/user_status/api/v1/user_status";
const PREDEFINED_PATH: &str = "ocs/v2.php/apps/user_status/api/v1/predefined_statuses";

/// The closed set of online states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusType {
    Online,
    Away,
    Dnd,
    Invisible,
    Offline,
}

impl StatusType {
    pub const ALL: &'static [StatusType] = &[
        StatusType::Online,
        StatusType::Away,
        StatusType::Dnd,
        StatusType::Invisible,
        StatusType::Offline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusType::Online => "online",
            StatusType::Away => "away",
            StatusType::Dnd => "dnd",
            StatusType::Invisible => "invisible",
            StatusType::Offline => "offline",
        }
    }
}

/// A status identifier outside the closed set. Raised at parse time, before
/// any network exchange.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status type: {0}")]
pub struct UnknownStatusError(pub String);

impl FromStr for StatusType {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusType::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatusError(s.to_string()))
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current status of the authenticated user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub message_is_predefined: bool,
    #[serde(default)]
    pub icon: Option<String>,
    /// Epoch seconds at which the message expires.
    #[serde(default)]
    pub clear_at: Option<i64>,
    pub status: StatusType,
    #[serde(default)]
    pub status_is_user_defined: bool,
}

/// A server-provided status message template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedStatus {
    pub id: String,
    pub icon: String,
    pub message: String,
    #[serde(default)]
    pub clear_at: Option<ClearAt>,
}

/// Relative expiry attached to a predefined status.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearAt {
    #[serde(rename = "type")]
    pub kind: String,
    pub time: ClearAtTime,
}

/// The server sends either a second count ("period") or a named moment such
/// as "day" ("end-of").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClearAtTime {
    Seconds(i64),
    Moment(String),
}

/// Read the authenticated user's current status.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetStatus;

impl GetStatus {
    pub fn new() -> Self {
        Self
    }
}

impl<C: AuthClient> RemoteOperation<C> for GetStatus {
    type Output = UserStatus;

    async fn execute(&self, client: &C) -> RemoteResult<UserStatus> {
        let request = HttpRequest::get(USER_STATUS_PATH).query("format", "json");
        let response = client.send(request).await.map_err(RemoteError::transport)?;
        ensure_success(&response)?;
        ocs::decode(&response)
    }
}

/// Switch the online state.
#[derive(Debug, Clone, Copy)]
pub struct SetStatus {
    status: StatusType,
}

impl SetStatus {
    pub fn new(status: StatusType) -> Self {
        Self { status }
    }
}

impl<C: AuthClient> RemoteOperation<C> for SetStatus {
    type Output = ();

    async fn execute(&self, client: &C) -> RemoteResult<()> {
        let request = HttpRequest::put(format!("{USER_STATUS_PATH}/status"))
            .query("format", "json")
            .form("statusType", self.status.as_str());
        let response = client.send(request).await.map_err(RemoteError::transport)?;
        ensure_success(&response)
    }
}

/// Remove the current status message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearStatusMessage;

impl ClearStatusMessage {
    pub fn new() -> Self {
        Self
    }
}

impl<C: AuthClient> RemoteOperation<C> for ClearStatusMessage {
    type Output = ();

    async fn execute(&self, client: &C) -> RemoteResult<()> {
        let request =
            HttpRequest::delete(format!("{USER_STATUS_PATH}/message")).query("format", "json");
        let response = client.send(request).await.map_err(RemoteError::transport)?;
        ensure_success(&response)
    }
}

/// List the status message templates the server offers.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetPredefinedStatuses;

impl GetPredefinedStatuses {
    pub fn new() -> Self {
        Self
    }
}

impl<C: AuthClient> RemoteOperation<C> for GetPredefinedStatuses {
    type Output = Vec<PredefinedStatus>;

    async fn execute(&self, client: &C) -> RemoteResult<Vec<PredefinedStatus>> {
        let request = HttpRequest::get(PREDEFINED_PATH).query("format", "json");
        let response = client.send(request).await.map_err(RemoteError::transport)?;
        ensure_success(&response)?;
        ocs::decode(&response)
    }
}

/// Select a predefined status message by its template id.
#[derive(Debug, Clone)]
pub struct SetPredefinedStatusMessage {
    message_id: String,
    clear_at: Option<i64>,
}

impl SetPredefinedStatusMessage {
    pub fn new(message_id: impl Into<String>, clear_at: Option<i64>) -> Self {
        Self {
            message_id: message_id.into(),
            clear_at,
        }
    }
}

impl<C: AuthClient> RemoteOperation<C> for SetPredefinedStatusMessage {
    type Output = ();

    async fn execute(&self, client: &C) -> RemoteResult<()> {
        let mut request = HttpRequest::put(format!("{USER_STATUS_PATH}/message/predefined"))
            .query("format", "json")
            .form("messageId", &self.message_id);
        if let Some(clear_at) = self.clear_at {
            request = request.form("clearAt", clear_at.to_string());
        }
        let response = client.send(request).await.map_err(RemoteError::transport)?;
        ensure_success(&response)
    }
}

/// Set a free-form status message with an optional icon and expiry.
#[derive(Debug, Clone)]
pub struct SetCustomStatusMessage {
    message: String,
    icon: Option<String>,
    clear_at: Option<i64>,
}

impl SetCustomStatusMessage {
    pub fn new(message: impl Into<String>, icon: Option<String>, clear_at: Option<i64>) -> Self {
        Self {
            message: message.into(),
            icon,
            clear_at,
        }
    }
}

impl<C: AuthClient> RemoteOperation<C> for SetCustomStatusMessage {
    type Output = ();

    async fn execute(&self, client: &C) -> RemoteResult<()> {
        let mut request = HttpRequest::put(format!("{USER_STATUS_PATH}/message/custom"))
            .query("format", "json")
            .form("message", &self.message);
        if let Some(icon) = &self.icon {
            request = request.form("statusIcon", icon);
        }
        if let Some(clear_at) = self.clear_at {
            request = request.form("clearAt", clear_at.to_string());
        }
        let response = client.send(request).await.map_err(RemoteError::transport)?;
        ensure_success(&response)
    }
}
