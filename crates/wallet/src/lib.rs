//! Wallet provider capability.
//!
//! A wallet provider knows which chain it is connected to, which accounts
//! the user has authorized, and can sign transactions for those accounts.
//! The session only needs the narrow interface in [`WalletProvider`];
//! [`rpc::RpcWallet`] implements it on top of an alloy provider.

pub mod rpc;

use alloy_primitives::Address;
use std::future::Future;
use token::TokenContract;

pub use rpc::RpcWallet;

/// Capability interface of a wallet.
pub trait WalletProvider: Send + Sync {
    /// Contract handle produced by [`WalletProvider::bind_token`].
    type Token: TokenContract;

    /// Chain id the wallet is currently connected to.
    fn chain_id(&self) -> impl Future<Output = eyre::Result<u64>> + Send;

    /// Ask the wallet for the accounts the user authorizes.
    ///
    /// An empty list means nothing was authorized.
    fn request_accounts(&self) -> impl Future<Output = eyre::Result<Vec<Address>>> + Send;

    /// Bind a token contract at `token` that sends writes from `signer`.
    fn bind_token(&self, token: Address, signer: Address) -> Self::Token;
}
