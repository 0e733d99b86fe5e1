//! User-profile operations: read all fields, write a single field.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use nimbus_version::{Milestone, ServerVersion};

use crate::client::{AuthClient, HttpRequest};
use crate::error::{RemoteError, RemoteResult, UnknownFieldError};
use crate::ocs;
use crate::operation::{RemoteOperation, ensure_success};

const USER_INFO_PATH: &str = "ocs/v1.php/cloud/user";

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").unwrap());

/// The closed set of writable profile fields.
///
/// Each variant maps to a fixed server-side key; adding a field is an
/// explicit, compile-time-checked change here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Email,
    DisplayName,
    Phone,
    Address,
    Website,
    Twitter,
}

impl UserField {
    pub const ALL: &'static [UserField] = &[
        UserField::Email,
        UserField::DisplayName,
        UserField::Phone,
        UserField::Address,
        UserField::Website,
        UserField::Twitter,
    ];

    /// The server-side field key.
    pub fn key(self) -> &'static str {
        match self {
            UserField::Email => "email",
            UserField::DisplayName => "displayname",
            UserField::Phone => "phone",
            UserField::Address => "address",
            UserField::Website => "website",
            UserField::Twitter => "twitter",
        }
    }
}

impl FromStr for UserField {
    type Err = UnknownFieldError;

    /// Resolve a field key. Fails fast, before any network exchange.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserField::ALL
            .iter()
            .copied()
            .find(|field| field.key() == s)
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Profile of the authenticated user.
///
/// Fields the server omits or sends as `null` come back as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(
        rename = "displayname",
        default,
        deserialize_with = "string_or_empty"
    )]
    pub display_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub website: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub twitter: String,
}

impl UserInfo {
    /// Value of a profile field by its enum identifier.
    pub fn field(&self, field: UserField) -> &str {
        match field {
            UserField::Email => &self.email,
            UserField::DisplayName => &self.display_name,
            UserField::Phone => &self.phone,
            UserField::Address => &self.address,
            UserField::Website => &self.website,
            UserField::Twitter => &self.twitter,
        }
    }
}

/// Read every known profile field of the authenticated user.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetUserInfo;

impl GetUserInfo {
    pub fn new() -> Self {
        Self
    }
}

impl<C: AuthClient> RemoteOperation<C> for GetUserInfo {
    type Output = UserInfo;

    async fn execute(&self, client: &C) -> RemoteResult<UserInfo> {
        let request = HttpRequest::get(USER_INFO_PATH).query("format", "json");
        let response = client.send(request).await.map_err(RemoteError::transport)?;
        ensure_success(&response)?;
        ocs::decode(&response)
    }
}

/// Write a single profile field.
///
/// The server version for the phone gate is supplied out-of-band, typically
/// from a prior [`GetCapabilities`](crate::capabilities::GetCapabilities) run.
/// Without it the unknown sentinel applies and values are sent verbatim.
#[derive(Debug, Clone)]
pub struct SetUserInfo {
    field: UserField,
    value: String,
    server: ServerVersion,
}

impl SetUserInfo {
    pub fn new(field: UserField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            server: ServerVersion::unknown(),
        }
    }

    pub fn with_server_version(mut self, server: ServerVersion) -> Self {
        self.server = server;
        self
    }

    /// The value as it will go on the wire: phone numbers are normalized for
    /// servers at or past [`Milestone::PHONE_NORMALIZATION`], everything else
    /// is verbatim.
    pub fn effective_value(&self) -> Cow<'_, str> {
        if self.field == UserField::Phone
            && self.server.is_newer_or_equal(Milestone::PHONE_NORMALIZATION)
        {
            Cow::Owned(normalize_phone(&self.value))
        } else {
            Cow::Borrowed(self.value.as_str())
        }
    }
}

impl<C: AuthClient> RemoteOperation<C> for SetUserInfo {
    type Output = ();

    async fn execute(&self, client: &C) -> RemoteResult<()> {
        let value = self.effective_value();
        if value != self.value {
            debug!(field = %self.field, "normalized field value for transmission");
        }

        let request = HttpRequest::put(format!("ocs/v1.php/cloud/users/{}", client.user_id()))
            .query("format", "json")
            .form("key", self.field.key())
            .form("value", value);

        let response = client.send(request).await.map_err(RemoteError::transport)?;
        // Success is determined purely by HTTP status; no body payload.
        ensure_success(&response)
    }
}

/// Strip every non-digit character from a phone number, preserving at most
/// one leading `+`.
fn normalize_phone(raw: &str) -> String {
    let (prefix, rest) = match raw.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", raw),
    };
    format!("{prefix}{}", NON_DIGIT.replace_all(rest, ""))
}
