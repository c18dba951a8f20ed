use crate::WalletProvider;
use alloy_primitives::Address;
use alloy_provider::Provider;
use eyre::Result;
use token::Erc20Token;
use tracing::debug;

/// Wallet backed by an alloy provider.
///
/// With a local signer the signer's address is the only authorized account.
/// Without one the node is asked for its unlocked accounts (`eth_accounts`).
#[derive(Debug, Clone)]
pub struct RpcWallet<P> {
    provider: P,
    signer: Option<Address>,
    confirmations: u64,
}

impl<P> RpcWallet<P>
where
    P: Provider + Clone,
{
    /// Wallet using the node's own accounts.
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            signer: None,
            confirmations: 1,
        }
    }

    /// Wallet whose provider signs locally for `signer`.
    pub const fn with_signer(provider: P, signer: Address) -> Self {
        Self {
            provider,
            signer: Some(signer),
            confirmations: 1,
        }
    }

    /// Confirmations required by the token handles this wallet binds.
    pub const fn confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }
}

impl<P> WalletProvider for RpcWallet<P>
where
    P: Provider + Clone,
{
    type Token = Erc20Token<P>;

    async fn chain_id(&self) -> Result<u64> {
        let chain_id = self.provider.get_chain_id().await?;
        debug!(chain_id, "Wallet reported chain");
        Ok(chain_id)
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        if let Some(signer) = self.signer {
            return Ok(vec![signer]);
        }

        let accounts = self.provider.get_accounts().await?;
        debug!(count = accounts.len(), "Node returned accounts");
        Ok(accounts)
    }

    fn bind_token(&self, token: Address, signer: Address) -> Self::Token {
        Erc20Token::new(self.provider.clone(), token, signer).with_confirmations(self.confirmations)
    }
}
