//! Exact decimal conversion between wei and display units.

use alloy_primitives::U256;

use crate::error::EthError;

pub const ETHER_DECIMALS: u8 = 18;
pub const GWEI_DECIMALS: u8 = 9;

/// Parses a decimal ether amount such as `"0.25"` into wei.
pub fn parse_ether(amount: &str) -> Result<U256, EthError> {
    parse_units(amount, ETHER_DECIMALS)
}

/// Parses a non-negative decimal string scaled by `10^decimals`.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, EthError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(EthError::InvalidAmount("amount is empty".into()));
    }
    if amount.starts_with('-') {
        return Err(EthError::InvalidAmount(format!("{amount} is negative")));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(EthError::InvalidAmount(format!("{amount} has no digits")));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(EthError::InvalidAmount(format!("{amount} is not a decimal number")));
    }
    if fraction.len() > usize::from(decimals) {
        return Err(EthError::InvalidAmount(format!(
            "{amount} has more than {decimals} decimal places"
        )));
    }

    let mut digits = String::with_capacity(whole.len() + usize::from(decimals));
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(usize::from(decimals) - fraction.len()));

    U256::from_str_radix(&digits, 10)
        .map_err(|_| EthError::InvalidAmount(format!("{amount} does not fit in 256 bits")))
}

/// Formats a wei amount in ether, trimming trailing zeros.
pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

pub fn format_gwei(wei: U256) -> String {
    format_units(wei, GWEI_DECIMALS)
}

pub fn format_units(amount: U256, decimals: u8) -> String {
    let decimals = usize::from(decimals);
    let digits = amount.to_string();
    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals + 1 - digits.len()))
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
