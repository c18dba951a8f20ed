//! Configuration types for the token client.
//!
//! This crate provides:
//! - Network configurations (mainnet, testnet)
//! - The expected chain id and token contract address for each network

pub mod network;

pub use network::{NetworkConfig, NetworkConfigBuilder, NetworkType};
