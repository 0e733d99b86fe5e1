//! The remote-operation execution contract.

use std::future::Future;

use crate::client::{AuthClient, HttpResponse};
use crate::error::{RemoteError, RemoteResult};

/// A single, self-contained client-to-server interaction.
///
/// Concrete operations carry their request parameters, set at construction
/// and immutable afterwards. `execute` performs exactly one HTTP exchange
/// against the supplied handle and never panics or propagates past the
/// result: transport failures, unexpected statuses and malformed bodies all
/// arrive as [`RemoteError`] variants.
///
/// There is no internal concurrency, queueing or retrying; callers sequence
/// executions themselves and offload to a task if they need the call off
/// their thread. Re-executing an operation is allowed, but writes are not
/// idempotent against server state.
pub trait RemoteOperation<C: AuthClient> {
    /// Typed payload produced on success.
    type Output;

    fn execute(&self, client: &C) -> impl Future<Output = RemoteResult<Self::Output>> + Send;
}

/// Reject any response outside the success class.
pub(crate) fn ensure_success(response: &HttpResponse) -> Result<(), RemoteError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(RemoteError::Status {
            status: response.status,
            message: response.status_message(),
        })
    }
}
