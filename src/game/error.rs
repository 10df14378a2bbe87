//! Error types for the game session core
//!
//! Covers local contract violations (bad square labels, malformed boards sent
//! by the collaborator) and recoverable remote conditions (unknown game,
//! transport or collaborator failure).

use shared::Operation;

/// Errors that can occur while driving a game session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Square label outside `[1-9][a-i]`
    #[error("Invalid square label: {label:?}")]
    InvalidSquare { label: String },

    /// Piece code outside `[+]?[plnsgkrbPLNSGKRB]`
    #[error("Invalid piece code: {code:?}")]
    InvalidPiece { code: String },

    /// Board or legal-moves payload with the wrong shape
    #[error("Malformed board: {message}")]
    MalformedBoard { message: String },

    /// The collaborator has no game with this identifier
    #[error("Game not found: {uid}")]
    NotFound { uid: String },

    /// Operation needs an active game but none is open
    #[error("No active game session")]
    NoActiveSession,

    /// Refused because another remote operation is still in flight
    #[error("Busy: {operation} refused while another request is pending")]
    Busy { operation: Operation },

    /// Transport or collaborator failure during a remote call
    #[error("Remote call {operation} failed: {message}")]
    RemoteFailure { operation: Operation, message: String },
}

impl ClientError {
    pub fn remote(operation: Operation, message: impl Into<String>) -> Self {
        ClientError::RemoteFailure {
            operation,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ClientError::MalformedBoard {
            message: message.into(),
        }
    }

    /// Contract violations point at a bug on one side of the wire rather
    /// than a runtime condition worth retrying.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidSquare { .. }
                | ClientError::InvalidPiece { .. }
                | ClientError::MalformedBoard { .. }
        )
    }
}

/// Result type alias for game session operations
pub type ClientResult<T> = Result<T, ClientError>;
