//! Contract bindings for external contracts.
//!
//! Currently only the ERC20 token interface is needed. Bindings are
//! generated using alloy's `sol!` macro.

pub mod token;
