pub mod config;
pub mod metrics;

use crate::{config::Config, metrics::Metrics};
use alloy_provider::{DynProvider, Provider};
use session::{SessionError, TransferRequest, WalletSession};
use std::time::Instant;
use token::Confirmation;
use tracing::{info, warn};
use wallet::{RpcWallet, WalletProvider};

/// Session over an RPC backed wallet.
pub type RpcSession = WalletSession<RpcWallet<DynProvider>>;

/// Build the wallet provider described by `config`.
///
/// With a private key the wallet signs locally; without one it relies on the
/// node's unlocked accounts. Returns `None` when no provider can be built,
/// which the session reports as an unavailable provider.
pub fn detect_wallet(
    config: &Config,
    private_key: Option<&str>,
) -> Option<RpcWallet<DynProvider>> {
    let wallet = match private_key {
        Some(key) => client::create_wallet_provider(&config.rpc_url, key)
            .map(|(provider, signer)| RpcWallet::with_signer(provider.erased(), signer)),
        None => client::create_provider(&config.rpc_url)
            .map(|provider| RpcWallet::new(provider.erased())),
    };

    match wallet {
        Ok(wallet) => Some(wallet.confirmations(config.confirmations)),
        Err(e) => {
            warn!(error = %e, "No wallet provider available");
            None
        }
    }
}

/// Create a disconnected session for `config`.
pub fn open_session(config: &Config, private_key: Option<&str>) -> RpcSession {
    let wallet = detect_wallet(config, private_key);
    WalletSession::new(wallet, config.session_settings())
}

/// Connect the session, recording the outcome and resulting balance.
pub async fn connect<W>(session: &WalletSession<W>, metrics: &Metrics) -> Result<(), SessionError>
where
    W: WalletProvider,
{
    let result = session.connect().await;
    metrics.record_connect(outcome(&result));
    record_balance(session, metrics);
    result
}

/// Run a transfer, recording its outcome and latency.
pub async fn transfer<W>(
    session: &WalletSession<W>,
    request: TransferRequest,
    metrics: &Metrics,
) -> Result<Confirmation, SessionError>
where
    W: WalletProvider,
{
    let started = Instant::now();
    let result = session.transfer(request).await;
    metrics.record_transfer(outcome(&result), started.elapsed());
    record_balance(session, metrics);
    result
}

/// One line summary of the connected token and account.
pub fn summary<W: WalletProvider>(session: &WalletSession<W>) -> Option<String> {
    let metadata = session.token_metadata()?;
    let account = session.account()?;
    let balance = session.balance()?;

    Some(format!(
        "{} ({}) decimals={} total_supply={} account={} balance={} {}",
        metadata.name,
        metadata.symbol,
        metadata.decimals,
        metadata.formatted_total_supply(),
        account,
        balance,
        metadata.symbol,
    ))
}

fn record_balance<W: WalletProvider>(session: &WalletSession<W>, metrics: &Metrics) {
    let (Some(metadata), Some(balance)) = (session.token_metadata(), session.balance()) else {
        return;
    };

    match balance.parse::<f64>() {
        Ok(value) => metrics.set_balance(&metadata.symbol, value),
        Err(e) => info!(error = %e, %balance, "Balance not representable as a gauge"),
    }
}

fn outcome<T>(result: &Result<T, SessionError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(err) => err.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::NetworkType;

    fn config(rpc_url: &str) -> Config {
        Config {
            rpc_url: rpc_url.to_string(),
            network: NetworkType::Testnet,
            chain_id: None,
            token: None,
            confirmations: 1,
            confirmation_timeout_secs: None,
            metrics_port: None,
        }
    }

    #[test]
    fn test_detect_wallet_invalid_url() {
        assert!(detect_wallet(&config("not a url"), None).is_none());
    }

    #[test]
    fn test_detect_wallet_invalid_key() {
        assert!(detect_wallet(&config("http://localhost:8545"), Some("not a key")).is_none());
    }

    #[test]
    fn test_detect_wallet_with_key() {
        let key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        assert!(detect_wallet(&config("http://localhost:8545"), Some(key)).is_some());
    }

    #[tokio::test]
    async fn test_connect_without_wallet_reports_unavailable() {
        let session = open_session(&config("not a url"), None);

        let err = connect(&session, &Metrics::new()).await.unwrap_err();
        assert_eq!(err.kind(), "provider_unavailable");
        assert!(session.status().to_string().starts_with("Error: "));
        assert!(summary(&session).is_none());
    }
}
