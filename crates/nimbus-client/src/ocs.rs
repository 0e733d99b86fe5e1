//! OCS response envelope.
//!
//! Every JSON endpoint wraps its payload as `{"ocs": {"meta": ..., "data": ...}}`.
//! The meta block can reject a request even under HTTP 200 (for example
//! statuscode 997 for a failed authentication), so decoding checks it before
//! handing out the data payload.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::HttpResponse;
use crate::error::RemoteError;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub ocs: Body<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Body<T> {
    pub meta: Meta,
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Meta {
    pub status: String,
    pub statuscode: u16,
    #[serde(default)]
    pub message: Option<String>,
}

impl Meta {
    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Decode the body of a success response into its OCS data payload.
///
/// Schema mismatch is a parse failure even though the HTTP status was
/// success; a non-ok meta block is a protocol rejection carrying the OCS
/// statuscode and message. The meta block is checked before the payload is
/// typed: rejection bodies ship a placeholder data element that matches no
/// payload schema.
pub(crate) fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, RemoteError> {
    let envelope: Envelope<serde_json::Value> =
        serde_json::from_slice(&response.body).map_err(|e| {
            debug!(status = response.status, "response body did not match schema");
            RemoteError::Parse(e)
        })?;

    let Body { meta, data } = envelope.ocs;
    if !meta.is_ok() {
        return Err(RemoteError::Status {
            status: meta.statuscode,
            message: meta.message.unwrap_or(meta.status),
        });
    }

    serde_json::from_value(data).map_err(RemoteError::Parse)
}
