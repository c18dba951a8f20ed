use crate::SessionError;
use alloy_primitives::TxHash;
use std::fmt;

/// Lifecycle state of a [`crate::WalletSession`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(Activity),
}

/// What a connected session is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Activity {
    #[default]
    Idle,
    Submitting,
    AwaitingConfirmation,
}

impl SessionState {
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// Connected and not busy with a transfer.
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Connected(Activity::Idle))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected(Activity::Idle) => write!(f, "connected"),
            Self::Connected(Activity::Submitting) => write!(f, "submitting a transfer"),
            Self::Connected(Activity::AwaitingConfirmation) => {
                write!(f, "awaiting transfer confirmation")
            }
        }
    }
}

/// Narrative of the last significant session event.
///
/// There is always exactly one current status; every transition replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing has happened yet.
    #[default]
    Idle,
    /// Wallet connected and token summary loaded.
    Connected,
    /// Transfer is being submitted.
    Sending,
    /// Transfer accepted by the wallet, waiting for inclusion.
    Sent(TxHash),
    /// Transfer included in a block.
    Confirmed(TxHash),
    /// The last operation failed.
    Failed(SessionError),
}

impl SessionStatus {
    /// The error behind a failed status.
    pub const fn error(&self) -> Option<&SessionError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Connected => write!(f, "Wallet connected successfully!"),
            Self::Sending => write!(f, "Sending tokens..."),
            Self::Sent(tx_hash) => write!(f, "Transaction sent: {tx_hash}"),
            Self::Confirmed(tx_hash) => write!(f, "Transaction confirmed: {tx_hash}"),
            Self::Failed(err) => write!(f, "Error: {err}"),
        }
    }
}
