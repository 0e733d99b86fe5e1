//! Typed remote operations for the Nimbus user-profile and user-status APIs.
//!
//! Every server interaction is a [`RemoteOperation`]: an immutable unit of
//! work that, given an authenticated [`AuthClient`] handle, performs exactly
//! one HTTP exchange and yields a [`RemoteResult`]. Transport failures,
//! unexpected statuses and malformed bodies all come back through the same
//! error shape, so callers have one thing to branch on.
//!
//! # Architecture
//!
//! ```text
//! Caller
//!   ↓ execute(client)
//! RemoteOperation (GetUserInfo, SetUserInfo, GetCapabilities, ...)
//!   ↓ send(HttpRequest)
//! AuthClient (ReqwestClient or a test double)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use nimbus_client::{GetCapabilities, GetUserInfo, RemoteOperation, ReqwestClient};
//! use nimbus_client::{SetUserInfo, UserField};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ReqwestClient::new("https://cloud.example.com/", "alice", "app-password")?;
//!
//! let caps = GetCapabilities::new().execute(&client).await?;
//! let profile = GetUserInfo::new().execute(&client).await?;
//! println!("{} <{}> on {}", profile.display_name, profile.email, caps.version);
//!
//! // Phone values are normalized for servers that expect it.
//! SetUserInfo::new(UserField::Phone, "+49 555-12345")
//!     .with_server_version(caps.version)
//!     .execute(&client)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod ocs;
mod operation;

pub mod capabilities;
pub mod user_status;
pub mod users;

pub use client::{AuthClient, HttpRequest, HttpResponse, Method};
pub use error::{RemoteError, RemoteResult, UnknownFieldError};
pub use operation::RemoteOperation;

pub use capabilities::{Capabilities, GetCapabilities};
pub use user_status::{GetStatus, SetStatus, StatusType, UserStatus};
pub use users::{GetUserInfo, SetUserInfo, UserField, UserInfo};

#[cfg(feature = "reqwest")]
pub use client::{ClientError, ReqwestClient};
