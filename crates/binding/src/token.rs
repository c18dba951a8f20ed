//! ERC20 token contract bindings.

use alloy_sol_types::sol;

sol! {
    /// The subset of the ERC20 interface read and written by the token client
    #[sol(rpc)]
    interface IERC20 {
        /// Emitted when tokens are transferred
        event Transfer(
            address indexed from,
            address indexed to,
            uint256 value
        );

        /// Get token name
        function name() external view returns (string memory);

        /// Get token symbol
        function symbol() external view returns (string memory);

        /// Get token decimals
        function decimals() external view returns (uint8);

        /// Get total supply
        function totalSupply() external view returns (uint256);

        /// Get token balance of an account
        function balanceOf(address account) external view returns (uint256);

        /// Transfer tokens to recipient
        function transfer(address recipient, uint256 amount) external returns (bool);
    }
}
