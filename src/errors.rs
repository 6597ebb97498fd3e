use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy for the workflow engine.
///
/// `IllegalTransition` and `Conflict` both carry the request's fresh
/// authoritative status so a caller can re-render without another read.
/// `Conflict` is the store-detected flavor: a concurrent transition raced
/// ahead of this one between the caller's read and its command.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Request {0} not found")]
    NotFound(Uuid),

    #[error("Illegal transition: {action} is not legal from status '{current}'")]
    IllegalTransition { action: String, current: String },

    #[error("Authorization error: actor {actor} lacks role '{role}'")]
    AuthorizationError { actor: Uuid, role: String },

    #[error("Concurrent modification of request {id}: status is now '{current}'")]
    Conflict { id: Uuid, current: String },

    #[error("Ledger error: {0}")]
    LedgerError(String),
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}
