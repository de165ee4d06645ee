//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`LumenError`]
//! via `#[from]` — no `String` variants at the top level.

/// Top-level error for the lumen core.
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced object does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The backing store failed.
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// The outbound command channel failed.
    #[error("transport error")]
    Transport(#[from] TransportError),

    /// The optional reasoning collaborator failed.
    #[error("reasoning error")]
    Reasoning(#[from] ReasoningError),
}

/// Violated domain invariants.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("at least one action is required")]
    NoActions,
}

/// A lookup by identifier or name found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Kind of object that was looked up (e.g. `"Schedule"`).
    pub entity: &'static str,
    /// The identifier or name that missed.
    pub id: String,
}

impl NotFoundError {
    #[must_use]
    pub fn new(entity: &'static str, id: impl Into<String>) -> Self {
        Self {
            entity,
            id: id.into(),
        }
    }
}

/// Failure reported by a repository implementation.
#[derive(Debug, thiserror::Error)]
#[error("storage operation failed: {message}")]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by the outbound command channel.
#[derive(Debug, thiserror::Error)]
#[error("command publish failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by the reasoning collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    /// No credential configured; the deterministic path should be used.
    #[error("reasoning service is not configured")]
    NotConfigured,
    /// The HTTP call failed or returned a non-success status.
    #[error("reasoning request failed: {0}")]
    Request(String),
    /// The response body could not be interpreted.
    #[error("malformed reasoning response: {0}")]
    MalformedResponse(String),
    /// The call exceeded its time bound.
    #[error("reasoning request timed out")]
    Timeout,
}
