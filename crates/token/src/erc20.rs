use crate::{Confirmation, TokenContract};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{PendingTransactionBuilder, Provider};
use binding::token::IERC20;
use eyre::Result;
use tracing::debug;

/// ERC20 contract handle backed by an alloy provider.
///
/// Writes are sent from `signer`; the provider must be able to sign for it,
/// either through a local wallet or through the node's own accounts.
#[derive(Debug, Clone)]
pub struct Erc20Token<P> {
    provider: P,
    address: Address,
    signer: Address,
    confirmations: u64,
}

impl<P> Erc20Token<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, address: Address, signer: Address) -> Self {
        Self {
            provider,
            address,
            signer,
            confirmations: 1,
        }
    }

    /// Number of blocks a transfer must be buried under before it is
    /// considered confirmed.
    pub const fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }
}

impl<P> TokenContract for Erc20Token<P>
where
    P: Provider + Clone,
{
    async fn name(&self) -> Result<String> {
        let contract = IERC20::new(self.address, &self.provider);
        Ok(contract.name().call().await?)
    }

    async fn symbol(&self) -> Result<String> {
        let contract = IERC20::new(self.address, &self.provider);
        Ok(contract.symbol().call().await?)
    }

    async fn decimals(&self) -> Result<u8> {
        let contract = IERC20::new(self.address, &self.provider);
        Ok(contract.decimals().call().await?)
    }

    async fn total_supply(&self) -> Result<U256> {
        let contract = IERC20::new(self.address, &self.provider);
        Ok(contract.totalSupply().call().await?)
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        debug!("Querying erc20 {} balance: address={}", self.address, account);

        let contract = IERC20::new(self.address, &self.provider);
        Ok(contract.balanceOf(account).call().await?)
    }

    async fn transfer(&self, recipient: Address, amount: U256) -> Result<TxHash> {
        debug!(
            token = %self.address,
            from = %self.signer,
            to = %recipient,
            %amount,
            "Submitting erc20 transfer"
        );

        let contract = IERC20::new(self.address, &self.provider);
        let tx = contract
            .transfer(recipient, amount)
            .from(self.signer)
            .send()
            .await?;

        Ok(*tx.tx_hash())
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation> {
        debug!(
            %tx_hash,
            confirmations = self.confirmations,
            "Waiting for transaction receipt"
        );

        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await?;

        Ok(Confirmation {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            success: receipt.status(),
        })
    }
}
