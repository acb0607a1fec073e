//! Error types for safepoint commands.

use thiserror::Error;

/// Errors returned by a [`RequestDispatcher`](crate::client::RequestDispatcher).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The HTTP exchange could not be completed.
    #[error("{message}")]
    Transport {
        /// The transport error and its underlying causes.
        message: String,
    },

    /// The coordinator answered with a non-success status.
    #[error("[{status}] {body}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Response body as returned by the coordinator.
        body: String,
    },

    /// The response body could not be read.
    #[error("failed to read response body: {message}")]
    Body {
        /// Description of the read failure.
        message: String,
    },
}

/// Failures of the list and delete operations.
///
/// Every variant is terminal for the invocation. The `Display` output is the
/// exact message reported to the user.
#[derive(Debug, Error)]
pub enum SafepointError {
    /// The listing request failed.
    #[error("Failed to get service GC safepoint: {0}")]
    Get(#[source] DispatchError),

    /// The listing body did not match the expected schema.
    #[error("Failed to unmarshal service GC safepoint: {0}")]
    Unmarshal(#[source] serde_json::Error),

    /// The sorted listing could not be re-encoded.
    #[error("Failed to marshal service GC safepoint: {0}")]
    Marshal(#[source] serde_json::Error),

    /// The delete request failed.
    #[error("Failed to delete service GC safepoint: {0}")]
    Delete(#[source] DispatchError),
}
