//! Client-handle abstraction over an authenticated HTTP session.

use std::future::Future;

use bytes::Bytes;

/// HTTP methods used by the profile and status endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// A single outbound request, built by an operation and dispatched by the
/// client handle.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a form-encoded body pair. The client handle encodes the body as
    /// `application/x-www-form-urlencoded` when any pair is present.
    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }
}

/// Status line and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// Success class: 2xx, Multi-Status included.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub(crate) fn status_message(&self) -> String {
        if self.reason.is_empty() {
            format!("HTTP {}", self.status)
        } else {
            self.reason.clone()
        }
    }
}

/// Authenticated request dispatch.
///
/// The handle is an external collaborator: it is already authenticated and
/// connected when an operation receives it, and operations never mutate it.
/// One `send` is exactly one exchange; redirects, timeouts and cancellation
/// belong to the implementation.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - Scripted in-memory servers in the test suite
pub trait AuthClient: Send + Sync {
    /// Transport error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Dispatch one request and block (at the await point) until the
    /// response or a transport failure.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;

    /// Identifier of the authenticated user, used to address per-user
    /// endpoints.
    fn user_id(&self) -> &str;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use thiserror::Error;
    use tracing::debug;

    use super::{AuthClient, HttpRequest, HttpResponse, Method};

    #[derive(Debug, Error)]
    pub enum ClientError {
        #[error("invalid URL: {0}")]
        InvalidUrl(String),
        #[error(transparent)]
        Http(#[from] reqwest::Error),
    }

    /// Production client handle backed by `reqwest` with basic auth.
    pub struct ReqwestClient {
        client: reqwest::Client,
        base_url: reqwest::Url,
        user_id: String,
        username: String,
        password: String,
    }

    impl ReqwestClient {
        /// Create a handle for `base_url` authenticating as `username`.
        ///
        /// The user id defaults to the login name; override it with
        /// [`with_user_id`](Self::with_user_id) when the server reports a
        /// distinct internal id.
        pub fn new(
            base_url: &str,
            username: impl Into<String>,
            password: impl Into<String>,
        ) -> Result<Self, ClientError> {
            let base_url = reqwest::Url::parse(base_url)
                .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
            let username = username.into();

            Ok(Self {
                client: reqwest::Client::new(),
                base_url,
                user_id: username.clone(),
                username,
                password: password.into(),
            })
        }

        pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
            self.user_id = user_id.into();
            self
        }
    }

    impl AuthClient for ReqwestClient {
        type Error = ClientError;

        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
            let url = self
                .base_url
                .join(request.path.trim_start_matches('/'))
                .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

            debug!(method = request.method.as_str(), path = %request.path, "dispatching request");

            let mut builder = match request.method {
                Method::Get => self.client.get(url),
                Method::Put => self.client.put(url),
                Method::Post => self.client.post(url),
                Method::Delete => self.client.delete(url),
            };

            builder = builder
                .basic_auth(&self.username, Some(&self.password))
                .header("OCS-APIRequest", "true")
                .header(reqwest::header::ACCEPT, "application/json")
                .query(&request.query);

            if !request.form.is_empty() {
                builder = builder.form(&request.form);
            }

            let response = builder.send().await?;
            let status = response.status();
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            let body = response.bytes().await?;

            Ok(HttpResponse::new(status.as_u16(), reason, body))
        }

        fn user_id(&self) -> &str {
            &self.user_id
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::{ClientError, ReqwestClient};
