use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
}

/// Convenience function to create an ethereum rpc provider from url.
///
/// Without a signer the node's own accounts (`eth_accounts`) are the only
/// accounts a session can be authorized with.
pub fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Create a provider with wallet signing capability from a private key.
///
/// Returns the provider together with the address of the signer, which is the
/// only account the resulting wallet can authorize.
pub fn create_wallet_provider(
    rpc_url: &str,
    private_key: &str,
) -> Result<(impl Provider + Clone, Address), ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;

    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))?;
    let address = signer.address();

    let wallet = EthereumWallet::from(signer);

    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

    Ok((provider, address))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's first default account.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_invalid_url() {
        let result = create_provider("not a url");
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_private_key() {
        let result = create_wallet_provider("http://localhost:8545", "not a key");
        assert!(matches!(result, Err(ClientError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_wallet_provider_signer_address() {
        let (_provider, address) = create_wallet_provider("http://localhost:8545", TEST_KEY)
            .expect("valid url and key");
        assert_eq!(
            address.to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }
}
