//! Scripted in-memory server used by the integration tests.

// Each integration binary uses a different slice of the helpers.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};
use thiserror::Error;

use nimbus_client::{AuthClient, HttpRequest, HttpResponse, Method};

pub const USER_ID: &str = "admin";

#[derive(Debug, Error)]
#[error("connection dropped")]
pub struct ConnectionDropped;

struct ServerState {
    fields: HashMap<String, String>,
    status: String,
    message: Option<String>,
    message_id: Option<String>,
    icon: Option<String>,
    clear_at: Option<i64>,
}

/// In-memory stand-in for a Nimbus server.
///
/// Stores profile fields and user status verbatim as received, so round-trip
/// tests observe exactly what the client transmitted.
pub struct MockServer {
    version: &'static str,
    omit_version: bool,
    dropped: Mutex<bool>,
    reject_auth: Mutex<bool>,
    exchanges: AtomicUsize,
    state: Mutex<ServerState>,
}

impl MockServer {
    pub fn new(version: &'static str) -> Self {
        let mut fields = HashMap::new();
        for key in ["email", "displayname", "phone", "address", "website", "twitter"] {
            fields.insert(key.to_string(), String::new());
        }
        fields.insert("displayname".to_string(), USER_ID.to_string());

        Self {
            version,
            omit_version: false,
            dropped: Mutex::new(false),
            reject_auth: Mutex::new(false),
            exchanges: AtomicUsize::new(0),
            state: Mutex::new(ServerState {
                fields,
                status: "online".to_string(),
                message: None,
                message_id: None,
                icon: None,
                clear_at: None,
            }),
        }
    }

    /// Serve a capabilities document without a version object.
    pub fn without_version(mut self) -> Self {
        self.omit_version = true;
        self
    }

    /// Fail every subsequent exchange at the transport level.
    pub fn drop_connections(&self) {
        *self.dropped.lock().unwrap() = true;
    }

    /// Answer every subsequent exchange with HTTP 200 and a failed OCS meta.
    pub fn reject_auth(&self) {
        *self.reject_auth.lock().unwrap() = true;
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub fn stored_field(&self, key: &str) -> String {
        self.state.lock().unwrap().fields[key].clone()
    }

    fn user_info(&self) -> Value {
        let state = self.state.lock().unwrap();
        json!({
            "id": USER_ID,
            "email": state.fields["email"],
            "displayname": state.fields["displayname"],
            "phone": state.fields["phone"],
            "address": state.fields["address"],
            "website": state.fields["website"],
            "twitter": state.fields["twitter"],
        })
    }

    fn user_status(&self) -> Value {
        let state = self.state.lock().unwrap();
        json!({
            "userId": USER_ID,
            "message": state.message,
            "messageId": state.message_id,
            "messageIsPredefined": state.message_id.is_some(),
            "icon": state.icon,
            "clearAt": state.clear_at,
            "status": state.status,
            "statusIsUserDefined": true,
        })
    }

    fn capabilities(&self) -> Value {
        if self.omit_version {
            return json!({ "capabilities": {} });
        }
        let parts: Vec<i64> = self
            .version
            .split('.')
            .map(|p| p.parse().unwrap_or(0))
            .collect();
        json!({
            "version": {
                "major": parts.first().copied().unwrap_or(0),
                "minor": parts.get(1).copied().unwrap_or(0),
                "micro": parts.get(2).copied().unwrap_or(0),
                "string": self.version,
                "edition": "",
            },
            "capabilities": { "user_status": { "enabled": true } },
        })
    }

    fn predefined_statuses() -> Value {
        json!([
            { "id": "meeting", "icon": "M", "message": "In a meeting",
              "clearAt": { "type": "period", "time": 3600 } },
            { "id": "commuting", "icon": "C", "message": "Commuting",
              "clearAt": { "type": "period", "time": 1800 } },
            { "id": "remote-work", "icon": "R", "message": "Working remotely",
              "clearAt": { "type": "end-of", "time": "day" } },
        ])
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let set_path = format!("ocs/v1.php/cloud/users/{USER_ID}");

        match (request.method, request.path.as_str()) {
            (Method::Get, "ocs/v1.php/cloud/user") => ocs_v1(self.user_info()),
            (Method::Put, path) if path == set_path => {
                let Some(key) = form_value(request, "key") else {
                    return bad_request();
                };
                let Some(value) = form_value(request, "value") else {
                    return bad_request();
                };
                let mut state = self.state.lock().unwrap();
                if !state.fields.contains_key(&key) {
                    return bad_request();
                }
                state.fields.insert(key, value);
                ocs_v1(json!([]))
            }
            (Method::Get, "ocs/v1.php/cloud/capabilities") => ocs_v1(self.capabilities()),
            (Method::Get, "ocs/v2.php/apps/user_status/api/v1/user_status") => {
                ocs_v2(self.user_status())
            }
            (Method::Put, "ocs/v2.php/apps/user_status/api/v1/user_status/status") => {
                let Some(status) = form_value(request, "statusType") else {
                    return bad_request();
                };
                self.state.lock().unwrap().status = status;
                ocs_v2(self.user_status())
            }
            (Method::Delete, "ocs/v2.php/apps/user_status/api/v1/user_status/message") => {
                let mut state = self.state.lock().unwrap();
                state.message = None;
                state.message_id = None;
                state.icon = None;
                state.clear_at = None;
                ocs_v2(json!([]))
            }
            (Method::Get, "ocs/v2.php/apps/user_status/api/v1/predefined_statuses") => {
                ocs_v2(Self::predefined_statuses())
            }
            (Method::Put, "ocs/v2.php/apps/user_status/api/v1/user_status/message/predefined") => {
                let Some(message_id) = form_value(request, "messageId") else {
                    return bad_request();
                };
                let template = Self::predefined_statuses()
                    .as_array()
                    .unwrap()
                    .iter()
                    .find(|t| t["id"] == message_id.as_str())
                    .cloned();
                let Some(template) = template else {
                    return bad_request();
                };
                let mut state = self.state.lock().unwrap();
                state.message = Some(template["message"].as_str().unwrap().to_string());
                state.icon = Some(template["icon"].as_str().unwrap().to_string());
                state.message_id = Some(message_id);
                state.clear_at = form_value(request, "clearAt").and_then(|v| v.parse().ok());
                // Release before user_status() takes the lock again.
                drop(state);
                ocs_v2(self.user_status())
            }
            (Method::Put, "ocs/v2.php/apps/user_status/api/v1/user_status/message/custom") => {
                let Some(message) = form_value(request, "message") else {
                    return bad_request();
                };
                let mut state = self.state.lock().unwrap();
                state.message = Some(message);
                state.message_id = None;
                state.icon = form_value(request, "statusIcon");
                state.clear_at = form_value(request, "clearAt").and_then(|v| v.parse().ok());
                drop(state);
                ocs_v2(self.user_status())
            }
            _ => HttpResponse::new(404, "Not Found", Vec::new()),
        }
    }
}

impl AuthClient for MockServer {
    type Error = ConnectionDropped;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ConnectionDropped> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if *self.dropped.lock().unwrap() {
            return Err(ConnectionDropped);
        }
        if *self.reject_auth.lock().unwrap() {
            let body = json!({
                "ocs": {
                    "meta": { "status": "failure", "statuscode": 997,
                              "message": "Current user is not logged in" },
                    "data": [],
                }
            });
            return Ok(HttpResponse::new(200, "OK", body.to_string().into_bytes()));
        }
        Ok(self.handle(&request))
    }

    fn user_id(&self) -> &str {
        USER_ID
    }
}

fn form_value(request: &HttpRequest, key: &str) -> Option<String> {
    request
        .form
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

fn envelope(statuscode: u16, data: Value) -> HttpResponse {
    let body = json!({
        "ocs": {
            "meta": { "status": "ok", "statuscode": statuscode, "message": "OK" },
            "data": data,
        }
    });
    HttpResponse::new(200, "OK", body.to_string().into_bytes())
}

fn ocs_v1(data: Value) -> HttpResponse {
    envelope(100, data)
}

fn ocs_v2(data: Value) -> HttpResponse {
    envelope(200, data)
}

fn bad_request() -> HttpResponse {
    HttpResponse::new(400, "Bad Request", Vec::new())
}
