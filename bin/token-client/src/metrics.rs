//! Prometheus metrics for the token client.
//!
//! All metrics are aggregated in the [`Metrics`] struct.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Aggregated metrics for the token client.
///
/// Metrics are registered with the global metrics registry on creation.
/// Without an installed exporter recording is a no-op.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "token_client_connects_total",
            "Wallet connection attempts by outcome"
        );
        describe_counter!(
            "token_client_transfers_total",
            "Token transfers by outcome"
        );
        describe_histogram!(
            "token_client_transfer_duration_seconds",
            "Duration of transfer calls that confirmed, from amount scaling to balance refresh"
        );
        describe_gauge!(
            "token_client_balance",
            "Balance of the connected account in token units"
        );
    }

    /// Record the outcome of a connect attempt (`ok` or an error kind).
    pub fn record_connect(&self, outcome: &'static str) {
        counter!("token_client_connects_total", "outcome" => outcome).increment(1);
    }

    /// Record the outcome of a transfer (`ok` or an error kind). `duration`
    /// covers the whole session call and only feeds the histogram on `ok`.
    pub fn record_transfer(&self, outcome: &'static str, duration: Duration) {
        counter!("token_client_transfers_total", "outcome" => outcome).increment(1);

        if outcome == "ok" {
            histogram!("token_client_transfer_duration_seconds").record(duration.as_secs_f64());
        }
    }

    /// Set the current balance of the connected account.
    pub fn set_balance(&self, symbol: &str, balance: f64) {
        gauge!("token_client_balance", "symbol" => symbol.to_string()).set(balance);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
