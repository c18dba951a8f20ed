use crate::SessionState;
use thiserror::Error;
use token::UnitsError;

/// Failures surfaced by session operations.
///
/// Every variant is recoverable: the session is left in a stable state and
/// the operation can be retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No wallet provider was detected or it could not be reached
    #[error("wallet provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The wallet is connected to a different chain
    #[error("wrong network: wallet is on chain {actual}, please switch to chain {expected}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// The account request was rejected or returned no accounts
    #[error("account authorization failed: {0}")]
    AuthorizationFailed(String),

    /// One of the initial token reads failed
    #[error("failed to read token metadata: {0}")]
    MetadataFetchFailed(String),

    /// The transfer amount cannot be scaled to base units
    #[error("invalid transfer amount: {0}")]
    AmountScaling(#[from] UnitsError),

    /// The wallet or network refused the transfer
    #[error("transfer rejected: {0}")]
    SubmissionRejected(String),

    /// The transfer was submitted but never confirmed
    #[error("transfer confirmation failed: {0}")]
    ConfirmationFailed(String),

    /// The operation is not allowed in the current state
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
}

impl SessionError {
    /// Stable snake_case name of the variant, for logs and metric labels.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::WrongNetwork { .. } => "wrong_network",
            Self::AuthorizationFailed(_) => "authorization_failed",
            Self::MetadataFetchFailed(_) => "metadata_fetch_failed",
            Self::AmountScaling(_) => "amount_scaling",
            Self::SubmissionRejected(_) => "submission_rejected",
            Self::ConfirmationFailed(_) => "confirmation_failed",
            Self::InvalidState { .. } => "invalid_state",
        }
    }
}
