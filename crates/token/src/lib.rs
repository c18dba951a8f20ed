//! ERC20 token access for the token client.
//!
//! This crate provides the [`TokenContract`] capability the session talks
//! to, an alloy-backed implementation in [`erc20`], and decimal scaling
//! between human units and base units in [`units`].

pub mod erc20;
pub mod units;

use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::future::Future;

pub use erc20::Erc20Token;
pub use units::{format_units, parse_units, UnitsError, MAX_DECIMALS};

/// Token metadata read once per connected session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Number of fractional digits between base units and human units
    pub decimals: u8,
    /// Total supply in base units
    pub total_supply: U256,
}

impl TokenMetadata {
    /// Total supply scaled by `decimals`.
    pub fn formatted_total_supply(&self) -> String {
        format_units(self.total_supply, self.decimals)
    }
}

/// Outcome of waiting for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: u64,
    /// Whether the transaction executed without reverting
    pub success: bool,
}

/// Read/write access to a single ERC20 contract, bound to a signer.
pub trait TokenContract: Send + Sync {
    /// Token name.
    fn name(&self) -> impl Future<Output = eyre::Result<String>> + Send;

    /// Token symbol.
    fn symbol(&self) -> impl Future<Output = eyre::Result<String>> + Send;

    /// Token decimals.
    fn decimals(&self) -> impl Future<Output = eyre::Result<u8>> + Send;

    /// Total supply in base units.
    fn total_supply(&self) -> impl Future<Output = eyre::Result<U256>> + Send;

    /// Balance of `account` in base units.
    fn balance_of(&self, account: Address) -> impl Future<Output = eyre::Result<U256>> + Send;

    /// Submit a transfer of `amount` base units to `recipient`.
    ///
    /// Resolves once the transaction has been accepted for broadcast and
    /// returns its hash; it does not wait for inclusion.
    fn transfer(
        &self,
        recipient: Address,
        amount: U256,
    ) -> impl Future<Output = eyre::Result<TxHash>> + Send;

    /// Wait until the transaction is included in a block.
    fn await_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = eyre::Result<Confirmation>> + Send;
}
