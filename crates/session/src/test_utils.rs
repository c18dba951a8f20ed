//! In-memory wallet and token fakes for session tests.

use alloy_primitives::{Address, TxHash, U256};
use std::{
    future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use token::{Confirmation, TokenContract};
use tokio::sync::Notify;
use wallet::WalletProvider;

pub const SEPOLIA: u64 = 0xaa36a7;

pub fn token_address() -> Address {
    Address::repeat_byte(0x77)
}

pub fn holder() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn recipient() -> Address {
    Address::repeat_byte(0xbb)
}

pub fn units(s: &str) -> U256 {
    U256::from_str_radix(s, 10).unwrap()
}

/// Read that should reject during connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    Name,
    Symbol,
    Decimals,
    TotalSupply,
    BalanceOf,
}

/// Lets a test hold a transfer inside the wallet until it is released.
#[derive(Debug, Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Debug)]
pub struct MockTokenState {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    pub balance: Mutex<U256>,
    pub failing_read: Option<Read>,
    pub hanging_read: Option<Read>,
    pub reject_transfer: Option<String>,
    pub reject_confirmation: Option<String>,
    pub revert: bool,
    pub hang_confirmation: bool,
    pub fail_refresh: bool,
    pub gate: Option<Arc<Gate>>,
    pub transfers: Mutex<Vec<(Address, Address, U256)>>,
    pub balance_reads: AtomicUsize,
}

/// Shared ERC20 fake. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct MockToken {
    pub state: Arc<MockTokenState>,
    signer: Address,
}

impl MockToken {
    async fn read(&self, read: Read) -> eyre::Result<()> {
        if self.state.hanging_read == Some(read) {
            future::pending::<()>().await;
        }
        if self.state.failing_read == Some(read) {
            eyre::bail!("execution reverted: {read:?}");
        }
        Ok(())
    }

    fn tx_hash(&self) -> TxHash {
        let count = self.state.transfers.lock().unwrap().len();
        TxHash::with_last_byte(count as u8)
    }
}

impl TokenContract for MockToken {
    async fn name(&self) -> eyre::Result<String> {
        self.read(Read::Name).await?;
        Ok(self.state.name.clone())
    }

    async fn symbol(&self) -> eyre::Result<String> {
        self.read(Read::Symbol).await?;
        Ok(self.state.symbol.clone())
    }

    async fn decimals(&self) -> eyre::Result<u8> {
        self.read(Read::Decimals).await?;
        Ok(self.state.decimals)
    }

    async fn total_supply(&self) -> eyre::Result<U256> {
        self.read(Read::TotalSupply).await?;
        Ok(self.state.total_supply)
    }

    async fn balance_of(&self, _account: Address) -> eyre::Result<U256> {
        self.read(Read::BalanceOf).await?;
        let reads = self.state.balance_reads.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_refresh && reads > 0 {
            eyre::bail!("header not found");
        }
        Ok(*self.state.balance.lock().unwrap())
    }

    async fn transfer(&self, recipient: Address, amount: U256) -> eyre::Result<TxHash> {
        if let Some(gate) = &self.state.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        if let Some(reason) = &self.state.reject_transfer {
            eyre::bail!("{reason}");
        }

        {
            let mut balance = self.state.balance.lock().unwrap();
            *balance = balance.saturating_sub(amount);
        }
        self.state
            .transfers
            .lock()
            .unwrap()
            .push((self.signer, recipient, amount));

        Ok(self.tx_hash())
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> eyre::Result<Confirmation> {
        if self.state.hang_confirmation {
            future::pending::<()>().await;
        }

        if let Some(reason) = &self.state.reject_confirmation {
            eyre::bail!("{reason}");
        }

        Ok(Confirmation {
            tx_hash,
            block_number: Some(100),
            gas_used: 51_000,
            success: !self.state.revert,
        })
    }
}

/// Builder for the token fake, defaulting to an 18 decimals token with a
/// total supply of 1000 and a holder balance of 0.5.
#[derive(Debug)]
pub struct MockTokenBuilder {
    state: MockTokenState,
}

impl Default for MockTokenBuilder {
    fn default() -> Self {
        Self {
            state: MockTokenState {
                name: "ChainLink Token".to_string(),
                symbol: "LINK".to_string(),
                decimals: 18,
                total_supply: units("1000000000000000000000"),
                balance: Mutex::new(units("500000000000000000")),
                failing_read: None,
                hanging_read: None,
                reject_transfer: None,
                reject_confirmation: None,
                revert: false,
                hang_confirmation: false,
                fail_refresh: false,
                gate: None,
                transfers: Mutex::new(Vec::new()),
                balance_reads: AtomicUsize::new(0),
            },
        }
    }
}

impl MockTokenBuilder {
    pub fn decimals(mut self, decimals: u8) -> Self {
        self.state.decimals = decimals;
        self
    }

    pub fn failing_read(mut self, read: Read) -> Self {
        self.state.failing_read = Some(read);
        self
    }

    pub fn hanging_read(mut self, read: Read) -> Self {
        self.state.hanging_read = Some(read);
        self
    }

    pub fn reject_transfer(mut self, reason: &str) -> Self {
        self.state.reject_transfer = Some(reason.to_string());
        self
    }

    pub fn reject_confirmation(mut self, reason: &str) -> Self {
        self.state.reject_confirmation = Some(reason.to_string());
        self
    }

    pub fn revert(mut self) -> Self {
        self.state.revert = true;
        self
    }

    pub fn hang_confirmation(mut self) -> Self {
        self.state.hang_confirmation = true;
        self
    }

    pub fn fail_refresh(mut self) -> Self {
        self.state.fail_refresh = true;
        self
    }

    pub fn gate(mut self, gate: Arc<Gate>) -> Self {
        self.state.gate = Some(gate);
        self
    }

    pub fn build(self) -> Arc<MockTokenState> {
        Arc::new(self.state)
    }
}

/// Wallet fake. Clones share the call counters.
#[derive(Debug, Clone)]
pub struct MockWallet {
    pub chain_id: Arc<Mutex<Result<u64, String>>>,
    pub accounts: Result<Vec<Address>, String>,
    pub token: Arc<MockTokenState>,
    pub account_requests: Arc<AtomicUsize>,
    pub bound: Arc<Mutex<Option<(Address, Address)>>>,
}

impl MockWallet {
    pub fn new(chain_id: u64, token: Arc<MockTokenState>) -> Self {
        Self {
            chain_id: Arc::new(Mutex::new(Ok(chain_id))),
            accounts: Ok(vec![holder()]),
            token,
            account_requests: Arc::new(AtomicUsize::new(0)),
            bound: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_accounts(mut self, accounts: Result<Vec<Address>, String>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_chain_error(self, message: &str) -> Self {
        *self.chain_id.lock().unwrap() = Err(message.to_string());
        self
    }

    pub fn switch_chain(&self, chain_id: u64) {
        *self.chain_id.lock().unwrap() = Ok(chain_id);
    }

    pub fn account_requests(&self) -> usize {
        self.account_requests.load(Ordering::SeqCst)
    }
}

impl WalletProvider for MockWallet {
    type Token = MockToken;

    async fn chain_id(&self) -> eyre::Result<u64> {
        let chain_id = self.chain_id.lock().unwrap().clone();
        chain_id.map_err(|e| eyre::eyre!(e))
    }

    async fn request_accounts(&self) -> eyre::Result<Vec<Address>> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        self.accounts.clone().map_err(|e| eyre::eyre!(e))
    }

    fn bind_token(&self, token: Address, signer: Address) -> Self::Token {
        *self.bound.lock().unwrap() = Some((token, signer));
        MockToken {
            state: Arc::clone(&self.token),
            signer,
        }
    }
}
