//! Conversion between human readable decimal amounts and integer base units.
//!
//! Scaling is exact: parsing never rounds or truncates, and formatting
//! prints the shortest decimal string that parses back to the same value.

use alloy_primitives::U256;
use thiserror::Error;

/// Largest decimals value whose scale factor `10^decimals` fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    /// The amount is not a plain unsigned decimal number
    #[error("invalid amount {0:?}: expected an unsigned decimal number")]
    InvalidAmount(String),

    /// The amount has more fractional digits than the token supports
    #[error("amount has {found} fractional digits but the token only supports {decimals}")]
    TooManyDecimals { decimals: u8, found: usize },

    /// The scaled amount does not fit in 256 bits
    #[error("amount {0:?} overflows 256 bits")]
    Overflow(String),

    /// The token declares more decimals than base units can represent
    #[error("{0} decimals is more than the supported {MAX_DECIMALS}")]
    UnsupportedDecimals(u8),
}

/// Scale `amount` (human units) to base units using `decimals`.
///
/// Accepts `123`, `123.45`, `.5` and `5.`. Signs, exponents, separators and
/// surrounding whitespace are rejected.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::UnsupportedDecimals(decimals));
    }
    let invalid = || UnitsError::InvalidAmount(amount.to_string());

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    // A second '.' ends up in `fraction` and fails the digit check.
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let decimals_len = usize::from(decimals);
    if fraction.len() > decimals_len {
        return Err(UnitsError::TooManyDecimals {
            decimals,
            found: fraction.len(),
        });
    }

    let mut digits = String::with_capacity(whole.len() + decimals_len);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat_n('0', decimals_len - fraction.len()));

    U256::from_str_radix(&digits, 10).map_err(|_| UnitsError::Overflow(amount.to_string()))
}

/// Format `value` (base units) as a decimal string scaled by `decimals`.
///
/// Trailing fractional zeros are dropped, so whole amounts have no decimal
/// point at all.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}
