//! Wallet connection and token transfer lifecycle.
//!
//! [`WalletSession`] sequences a wallet's fallible, asynchronous operations
//! into one observable state:
//!
//! ```text
//! Disconnected -> Connecting -> Connected(Idle) <-> Connected(Submitting | AwaitingConfirmation)
//! ```
//!
//! Failed connects fall back to `Disconnected`, failed transfers to
//! `Connected(Idle)`. Nothing is retried automatically.

pub mod error;
pub mod session;
pub mod state;

pub use error::SessionError;
pub use session::{SessionSettings, TransferRequest, WalletSession};
pub use state::{Activity, SessionState, SessionStatus};

#[cfg(test)]
pub(crate) mod test_utils;
