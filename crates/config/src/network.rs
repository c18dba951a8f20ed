//! Network configuration for the token client.
//!
//! Provides the chain a session must be connected to and the ERC20 token it
//! talks to, for each supported network.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

/// Complete network configuration for a token session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Chain ID the wallet must report before any contract call is made
    pub chain_id: u64,
    /// ERC20 token contract address
    pub token: Address,
}

impl NetworkConfig {
    /// Ethereum mainnet configuration (LINK token).
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            chain_id: 1,
            // https://etherscan.io/address/0x514910771AF9Ca656af840dff83E8264EcF986CA
            token: address!("0x514910771AF9Ca656af840dff83E8264EcF986CA"),
        }
    }

    /// Ethereum Sepolia testnet configuration (LINK token).
    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            chain_id: 11155111,
            // https://sepolia.etherscan.io/address/0x779877A7B0D9E8603169DdbD7836e478b4624789
            token: address!("0x779877A7B0D9E8603169DdbD7836e478b4624789"),
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::sepolia(),
        }
    }

    /// Human readable network name.
    pub const fn name(&self) -> &'static str {
        match self.network_type {
            NetworkType::Mainnet => "Ethereum",
            NetworkType::Testnet => "Sepolia",
        }
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    /// Start with mainnet defaults.
    pub const fn mainnet() -> Self {
        Self {
            config: NetworkConfig::mainnet(),
        }
    }

    /// Start with testnet defaults.
    pub const fn testnet() -> Self {
        Self {
            config: NetworkConfig::sepolia(),
        }
    }

    /// Start with the defaults of the given network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        Self {
            config: NetworkConfig::from_network_type(network_type),
        }
    }

    /// Override the expected chain id.
    pub const fn chain_id(mut self, chain_id: u64) -> Self {
        self.config.chain_id = chain_id;
        self
    }

    /// Override the token contract address.
    pub const fn token(mut self, address: Address) -> Self {
        self.config.token = address;
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> NetworkConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_config() {
        let config = NetworkConfig::mainnet();
        assert_eq!(config.chain_id, 1);
        assert_eq!(config.network_type, NetworkType::Mainnet);
        assert_eq!(config.name(), "Ethereum");
    }

    #[test]
    fn test_sepolia_config() {
        let config = NetworkConfig::sepolia();
        assert_eq!(config.chain_id, 0xaa36a7);
        assert_eq!(config.network_type, NetworkType::Testnet);
        assert_eq!(config.name(), "Sepolia");
        assert_eq!(
            config.token,
            address!("0x779877A7B0D9E8603169DdbD7836e478b4624789")
        );
    }

    #[test]
    fn test_from_network_type() {
        assert_eq!(
            NetworkConfig::from_network_type(NetworkType::Testnet),
            NetworkConfig::sepolia()
        );
    }

    #[test]
    fn test_custom_config_builder() {
        let custom_token = address!("1111111111111111111111111111111111111111");

        let config = NetworkConfigBuilder::testnet()
            .token(custom_token)
            .chain_id(31337)
            .build();

        assert_eq!(config.token, custom_token);
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.network_type, NetworkType::Testnet);
    }
}
