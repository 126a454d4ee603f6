use std::time::Duration;

use alloy_primitives::{Address, U256};
use chain_eth::transaction::TRANSFER_GAS;
use chain_eth::{address, units, KeyPair};
use crypto_utils::zeroizing::ZeroizingString;

use crate::cli::Cli;
use crate::error::WalletError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection and key settings shared by all commands.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub rpc_url: Option<String>,
    pub private_key: Option<ZeroizingString>,
    pub request_timeout: Duration,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            private_key: None,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl WalletConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            rpc_url: non_empty(cli.rpc_url.as_deref()).map(str::to_owned),
            private_key: non_empty(cli.private_key.as_deref()).map(ZeroizingString::from),
            request_timeout: Duration::from_secs(cli.timeout.max(1)),
        }
    }

    pub fn rpc_url(&self) -> Result<&str, WalletError> {
        self.rpc_url.as_deref().ok_or_else(|| {
            WalletError::Config("no node URL; pass --rpc-url or set NET_URL".into())
        })
    }

    pub fn key_pair(&self) -> Result<KeyPair, WalletError> {
        let key = self.private_key.as_ref().ok_or_else(|| {
            WalletError::Config("no private key; pass --private-key or set PRIVATE_KEY".into())
        })?;
        Ok(KeyPair::from_private_key_hex(key)?)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A validated `send-tx` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: Address,
    /// Amount in wei.
    pub amount: U256,
    pub gas_limit: u64,
    pub dry_run: bool,
}

impl TransferRequest {
    pub fn parse(to: &str, amount: &str, gas_limit: u64, dry_run: bool) -> Result<Self, WalletError> {
        Ok(Self {
            to: address::parse_address(to)?,
            amount: units::parse_ether(amount)?,
            gas_limit,
            dry_run,
        })
    }

    pub fn transfer(to: Address, amount: U256) -> Self {
        Self {
            to,
            amount,
            gas_limit: TRANSFER_GAS,
            dry_run: false,
        }
    }
}
