use alloy_primitives::Address;
use config::{NetworkConfig, NetworkConfigBuilder, NetworkType};
use serde::{Deserialize, Serialize};
use session::SessionSettings;
use std::{path::Path, time::Duration};

const fn default_confirmations() -> u64 {
    1
}

/// Top-level token client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint url of the wallet provider
    pub rpc_url: String,

    /// Network the wallet must be connected to
    pub network: NetworkType,

    /// Override of the network's expected chain id (e.g. a local fork)
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// Override of the network's token address
    #[serde(default)]
    pub token: Option<Address>,

    /// Blocks a transfer must be buried under to count as confirmed
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,

    /// Give up waiting for a confirmation after this many seconds
    #[serde(default)]
    pub confirmation_timeout_secs: Option<u64>,

    /// Serve Prometheus metrics on this port
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Network preset with the overrides from this file applied.
    pub fn network_config(&self) -> NetworkConfig {
        let mut builder = NetworkConfigBuilder::from_network_type(self.network);
        if let Some(chain_id) = self.chain_id {
            builder = builder.chain_id(chain_id);
        }
        if let Some(token) = self.token {
            builder = builder.token(token);
        }
        builder.build()
    }

    pub fn session_settings(&self) -> SessionSettings {
        let settings = SessionSettings::from(&self.network_config());
        match self.confirmation_timeout_secs {
            Some(secs) => settings.with_confirmation_timeout(Duration::from_secs(secs)),
            None => settings,
        }
    }
}
