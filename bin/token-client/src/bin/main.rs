//! Command line front end for a token wallet session.
//!
//! - `info`: connect and print the token summary
//! - `transfer`: connect, send tokens and wait for confirmation

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use session::TransferRequest;
use std::time::Duration;
use token_client::{
    config::Config,
    metrics::{install_prometheus_exporter, Metrics},
    open_session, summary, RpcSession,
};
use tokio::time;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "token-client")]
#[command(about = "Read an ERC20 token and transfer it through a wallet session")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key for signing transactions (hex string, with or without 0x prefix).
    /// Without it the node's unlocked accounts are used.
    #[arg(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect and print token metadata and balance
    Info,

    /// Transfer tokens and wait for confirmation
    Transfer {
        /// Recipient address
        #[arg(long)]
        to: Address,

        /// Amount in token units, e.g. 0.5
        #[arg(long)]
        amount: String,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;
    let network = config.network_config();

    info!("Loaded config:");
    info!("  Network: {} (chain {})", network.name(), network.chain_id);
    info!("  RPC URL: {}", config.rpc_url);
    info!("  Token: {}", network.token);

    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!("  Metrics: 0.0.0.0:{}", port);
    }
    let metrics = Metrics::new();

    let session = open_session(&config, cli.private_key.as_deref());

    if let Err(e) = token_client::connect(&session, &metrics).await {
        error!("{}", session.status());
        return Err(e.into());
    }
    info!("{}", session.status());
    print_summary(&session);

    match cli.command {
        Command::Info => {}
        Command::Transfer { to, amount } => {
            let request = TransferRequest::new(to, amount);
            run_transfer(&session, request, &metrics).await?;
            print_summary(&session);
        }
    }

    Ok(())
}

/// Drive a transfer while logging each status change.
async fn run_transfer(
    session: &RpcSession,
    request: TransferRequest,
    metrics: &Metrics,
) -> eyre::Result<()> {
    let transfer = token_client::transfer(session, request, metrics);
    tokio::pin!(transfer);

    let mut ticker = time::interval(Duration::from_millis(250));
    let mut last = session.status();

    let result = loop {
        tokio::select! {
            result = &mut transfer => break result,
            _ = ticker.tick() => {
                let status = session.status();
                if status != last {
                    info!("{}", status);
                    last = status;
                }
            }
        }
    };

    match result {
        Ok(confirmation) => {
            info!(
                tx_hash = %confirmation.tx_hash,
                block_number = ?confirmation.block_number,
                gas_used = confirmation.gas_used,
                "{}",
                session.status()
            );
            Ok(())
        }
        Err(e) => {
            error!("{}", session.status());
            Err(e.into())
        }
    }
}

fn print_summary(session: &RpcSession) {
    if let Some(summary) = summary(session) {
        info!("{}", summary);
    }
}
