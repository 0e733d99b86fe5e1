//! Server capability discovery.

use serde::Deserialize;

use nimbus_version::ServerVersion;

use crate::client::{AuthClient, HttpRequest};
use crate::error::{RemoteError, RemoteResult};
use crate::ocs;
use crate::operation::{RemoteOperation, ensure_success};

const CAPABILITIES_PATH: &str = "ocs/v1.php/cloud/capabilities";

#[derive(Debug, Deserialize)]
struct CapabilitiesData {
    version: VersionData,
    #[serde(default)]
    capabilities: serde_json::Map<String, serde_json::Value>,
}

// A response without a version object is rejected as malformed rather than
// defaulted: the version feeds feature gates.
#[derive(Debug, Deserialize)]
struct VersionData {
    major: u64,
    minor: u64,
    micro: u64,
    #[serde(default)]
    string: Option<String>,
    #[serde(default)]
    edition: Option<String>,
}

/// Server-advertised metadata: release version plus the per-app capability
/// map.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub version: ServerVersion,
    pub edition: String,
    apps: serde_json::Map<String, serde_json::Value>,
}

impl Capabilities {
    /// Capability block of a single app, when advertised.
    pub fn app(&self, name: &str) -> Option<&serde_json::Value> {
        self.apps.get(name)
    }

    pub fn apps(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }
}

impl From<CapabilitiesData> for Capabilities {
    fn from(data: CapabilitiesData) -> Self {
        let VersionData {
            major,
            minor,
            micro,
            string,
            edition,
        } = data.version;

        // Prefer the string form; it is what the server actually reports.
        let version = string
            .map(ServerVersion::parse)
            .filter(ServerVersion::is_known)
            .unwrap_or_else(|| ServerVersion::new(major, minor, micro));

        Self {
            version,
            edition: edition.unwrap_or_default(),
            apps: data.capabilities,
        }
    }
}

/// Fetch and parse the capabilities document.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetCapabilities;

impl GetCapabilities {
    pub fn new() -> Self {
        Self
    }
}

impl<C: AuthClient> RemoteOperation<C> for GetCapabilities {
    type Output = Capabilities;

    async fn execute(&self, client: &C) -> RemoteResult<Capabilities> {
        let request = HttpRequest::get(CAPABILITIES_PATH).query("format", "json");
        let response = client.send(request).await.map_err(RemoteError::transport)?;
        ensure_success(&response)?;
        let data: CapabilitiesData = ocs::decode(&response)?;
        Ok(data.into())
    }
}
