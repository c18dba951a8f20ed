use crate::{Activity, SessionError, SessionState, SessionStatus};
use alloy_primitives::{Address, TxHash, U256};
use config::NetworkConfig;
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use token::{format_units, parse_units, Confirmation, TokenContract, TokenMetadata};
use tracing::{debug, info, warn};
use wallet::WalletProvider;

/// Fixed parameters of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Chain id the wallet must be connected to
    pub chain_id: u64,
    /// ERC20 token contract address
    pub token: Address,
    /// Upper bound on waiting for a transfer to be confirmed
    pub confirmation_timeout: Option<Duration>,
}

impl SessionSettings {
    pub const fn new(chain_id: u64, token: Address) -> Self {
        Self {
            chain_id,
            token,
            confirmation_timeout: None,
        }
    }

    pub const fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = Some(timeout);
        self
    }
}

impl From<&NetworkConfig> for SessionSettings {
    fn from(network: &NetworkConfig) -> Self {
        Self::new(network.chain_id, network.token)
    }
}

/// A token transfer in human units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Recipient address
    pub recipient: Address,
    /// Amount as a decimal string, e.g. `"0.5"`
    pub amount: String,
}

impl TransferRequest {
    pub fn new(recipient: Address, amount: impl Into<String>) -> Self {
        Self {
            recipient,
            amount: amount.into(),
        }
    }
}

/// Everything that exists only while connected. Set as a whole once all
/// initial reads succeeded.
struct Connection<T> {
    account: Address,
    contract: Arc<T>,
    metadata: TokenMetadata,
    balance: U256,
}

struct Inner<T> {
    state: SessionState,
    connection: Option<Connection<T>>,
    status: SessionStatus,
    last_transaction: Option<TxHash>,
}

impl<T> Default for Inner<T> {
    fn default() -> Self {
        Self {
            state: SessionState::Disconnected,
            connection: None,
            status: SessionStatus::Idle,
            last_transaction: None,
        }
    }
}

/// Puts a busy session back into a stable state when the operation future is
/// dropped before it finishes. On normal returns the state is already stable
/// and dropping the guard changes nothing.
struct Busy<'a, W: WalletProvider> {
    session: &'a WalletSession<W>,
    operation: &'static str,
}

impl<W: WalletProvider> Drop for Busy<'_, W> {
    fn drop(&mut self) {
        let mut inner = self.session.lock();
        let restored = match inner.state {
            SessionState::Connecting => SessionState::Disconnected,
            SessionState::Connected(Activity::Submitting | Activity::AwaitingConfirmation) => {
                SessionState::Connected(Activity::Idle)
            }
            _ => return,
        };

        warn!(operation = self.operation, state = %inner.state, "Operation cancelled");
        if restored == SessionState::Disconnected {
            inner.connection = None;
        }
        inner.state = restored;
    }
}

/// Wallet session state machine.
///
/// Operations take `&self`. Only one `connect` or `transfer` runs at a time:
/// a call made while another is in flight is rejected with
/// [`SessionError::InvalidState`]. The internal lock is never held across an
/// `.await`. Dropping an in-flight `connect` or `transfer` future returns the
/// session to `Disconnected` or `Connected(Idle)`.
pub struct WalletSession<W: WalletProvider> {
    wallet: Option<W>,
    settings: SessionSettings,
    inner: Mutex<Inner<W::Token>>,
}

impl<W: WalletProvider> WalletSession<W> {
    /// Create a disconnected session. `wallet` is `None` when no wallet
    /// provider could be detected.
    pub fn new(wallet: Option<W>, settings: SessionSettings) -> Self {
        Self {
            wallet,
            settings,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().status.clone()
    }

    /// Authorized account, once connected.
    pub fn account(&self) -> Option<Address> {
        self.lock().connection.as_ref().map(|c| c.account)
    }

    pub fn token_metadata(&self) -> Option<TokenMetadata> {
        self.lock().connection.as_ref().map(|c| c.metadata.clone())
    }

    /// Balance of the authorized account, scaled by the token decimals.
    pub fn balance(&self) -> Option<String> {
        self.lock()
            .connection
            .as_ref()
            .map(|c| format_units(c.balance, c.metadata.decimals))
    }

    /// Balance of the authorized account in base units.
    pub fn balance_units(&self) -> Option<U256> {
        self.lock().connection.as_ref().map(|c| c.balance)
    }

    /// Hash of the most recently submitted transfer.
    pub fn last_transaction(&self) -> Option<TxHash> {
        self.lock().last_transaction
    }

    /// Connect to the wallet and load the token summary.
    ///
    /// Only allowed while disconnected. On failure the session stays
    /// disconnected and nothing from the attempt is retained.
    pub async fn connect(&self) -> Result<(), SessionError> {
        let _busy = self.begin_connect()?;

        match self.establish().await {
            Ok(connection) => {
                info!(
                    account = %connection.account,
                    token = %self.settings.token,
                    symbol = %connection.metadata.symbol,
                    decimals = connection.metadata.decimals,
                    balance = %format_units(connection.balance, connection.metadata.decimals),
                    "Wallet connected"
                );

                let mut inner = self.lock();
                inner.state = SessionState::Connected(Activity::Idle);
                inner.connection = Some(connection);
                inner.status = SessionStatus::Connected;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Wallet connection failed");

                let mut inner = self.lock();
                inner.state = SessionState::Disconnected;
                inner.connection = None;
                inner.status = SessionStatus::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Forget the authorized account and token summary.
    ///
    /// A no-op when already disconnected; rejected while connecting or while
    /// a transfer is in flight.
    pub fn disconnect(&self) -> Result<(), SessionError> {
        let mut inner = self.lock();
        match inner.state {
            SessionState::Disconnected => Ok(()),
            SessionState::Connected(Activity::Idle) => {
                info!("Wallet disconnected");
                *inner = Inner::default();
                Ok(())
            }
            state => Err(SessionError::InvalidState {
                operation: "disconnect",
                state,
            }),
        }
    }

    /// Submit a transfer and wait for it to be confirmed.
    ///
    /// Only allowed while connected and idle. The session is back to idle
    /// when this returns, whatever the outcome. A balance that cannot be
    /// re-read after confirmation is left stale and only logged.
    pub async fn transfer(&self, request: TransferRequest) -> Result<Confirmation, SessionError> {
        let (_busy, account, contract, decimals) = self.begin_transfer()?;

        let amount = match parse_units(&request.amount, decimals) {
            Ok(amount) => amount,
            Err(err) => return Err(self.fail_transfer(err.into())),
        };

        info!(
            from = %account,
            to = %request.recipient,
            amount = %request.amount,
            base_units = %amount,
            "Submitting transfer"
        );

        let tx_hash = match contract.transfer(request.recipient, amount).await {
            Ok(tx_hash) => tx_hash,
            Err(e) => return Err(self.fail_transfer(SessionError::SubmissionRejected(e.to_string()))),
        };

        info!(%tx_hash, "Transfer submitted");
        {
            let mut inner = self.lock();
            inner.state = SessionState::Connected(Activity::AwaitingConfirmation);
            inner.status = SessionStatus::Sent(tx_hash);
            inner.last_transaction = Some(tx_hash);
        }

        let confirmation = match self.wait_for_confirmation(&contract, tx_hash).await {
            Ok(confirmation) => confirmation,
            Err(err) => return Err(self.fail_transfer(err)),
        };

        info!(
            %tx_hash,
            block_number = ?confirmation.block_number,
            gas_used = confirmation.gas_used,
            "Transfer confirmed"
        );
        self.lock().status = SessionStatus::Confirmed(tx_hash);

        let refreshed = match contract.balance_of(account).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!(error = %e, "Failed to refresh balance after transfer");
                None
            }
        };
        self.finish_transfer(refreshed);

        Ok(confirmation)
    }

    async fn establish(&self) -> Result<Connection<W::Token>, SessionError> {
        let wallet = self.wallet.as_ref().ok_or_else(|| {
            SessionError::ProviderUnavailable("no wallet provider detected".to_string())
        })?;

        let chain_id = wallet
            .chain_id()
            .await
            .map_err(|e| SessionError::ProviderUnavailable(e.to_string()))?;
        if chain_id != self.settings.chain_id {
            return Err(SessionError::WrongNetwork {
                expected: self.settings.chain_id,
                actual: chain_id,
            });
        }

        let accounts = wallet
            .request_accounts()
            .await
            .map_err(|e| SessionError::AuthorizationFailed(e.to_string()))?;
        let account = accounts.first().copied().ok_or_else(|| {
            SessionError::AuthorizationFailed("no accounts authorized".to_string())
        })?;

        debug!(%account, token = %self.settings.token, "Reading token summary");

        let contract = wallet.bind_token(self.settings.token, account);
        let (name, symbol, decimals, total_supply, balance) = tokio::try_join!(
            contract.name(),
            contract.symbol(),
            contract.decimals(),
            contract.total_supply(),
            contract.balance_of(account),
        )
        .map_err(|e| SessionError::MetadataFetchFailed(e.to_string()))?;

        Ok(Connection {
            account,
            contract: Arc::new(contract),
            metadata: TokenMetadata {
                name,
                symbol,
                decimals,
                total_supply,
            },
            balance,
        })
    }

    async fn wait_for_confirmation(
        &self,
        contract: &W::Token,
        tx_hash: TxHash,
    ) -> Result<Confirmation, SessionError> {
        let wait = contract.await_confirmation(tx_hash);
        let result = match self.settings.confirmation_timeout {
            Some(limit) => tokio::time::timeout(limit, wait).await.map_err(|_| {
                SessionError::ConfirmationFailed(format!(
                    "no receipt for {tx_hash} after {}s",
                    limit.as_secs_f64()
                ))
            })?,
            None => wait.await,
        };

        let confirmation = result.map_err(|e| SessionError::ConfirmationFailed(e.to_string()))?;
        if !confirmation.success {
            return Err(SessionError::ConfirmationFailed(format!(
                "transaction {tx_hash} reverted"
            )));
        }

        Ok(confirmation)
    }

    fn begin_connect(&self) -> Result<Busy<'_, W>, SessionError> {
        let mut inner = self.lock();
        if inner.state != SessionState::Disconnected {
            return Err(Self::reject("connect", inner.state));
        }

        inner.state = SessionState::Connecting;
        Ok(Busy {
            session: self,
            operation: "connect",
        })
    }

    /// Check the idle gate and enter `Submitting` under a single lock, so a
    /// concurrent second call sees the busy state.
    #[allow(clippy::type_complexity)]
    fn begin_transfer(&self) -> Result<(Busy<'_, W>, Address, Arc<W::Token>, u8), SessionError> {
        let mut inner = self.lock();
        let (account, contract, decimals) = match (&inner.state, &inner.connection) {
            (SessionState::Connected(Activity::Idle), Some(c)) => {
                (c.account, Arc::clone(&c.contract), c.metadata.decimals)
            }
            (state, _) => return Err(Self::reject("transfer", *state)),
        };

        inner.state = SessionState::Connected(Activity::Submitting);
        inner.status = SessionStatus::Sending;
        let busy = Busy {
            session: self,
            operation: "transfer",
        };
        Ok((busy, account, contract, decimals))
    }

    fn reject(operation: &'static str, state: SessionState) -> SessionError {
        debug!(operation, %state, "Rejecting operation");
        SessionError::InvalidState { operation, state }
    }

    fn fail_transfer(&self, err: SessionError) -> SessionError {
        warn!(error = %err, "Transfer failed");

        let mut inner = self.lock();
        inner.state = SessionState::Connected(Activity::Idle);
        inner.status = SessionStatus::Failed(err.clone());
        err
    }

    fn finish_transfer(&self, balance: Option<U256>) {
        let mut inner = self.lock();
        if let (Some(connection), Some(balance)) = (inner.connection.as_mut(), balance) {
            connection.balance = balance;
        }
        inner.state = SessionState::Connected(Activity::Idle);
    }

    fn lock(&self) -> MutexGuard<'_, Inner<W::Token>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
