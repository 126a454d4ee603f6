//! Command results and their terminal rendering.

use std::fmt;

use alloy_primitives::{Address, B256, U256};
use chain_eth::address::checksum_address;
use chain_eth::units::{format_ether, format_gwei};
use crypto_utils::zeroizing::ZeroizingString;

use crate::rpc::{RpcReceipt, RpcTransaction};

#[derive(Debug)]
pub struct AccountReport {
    pub address: Address,
    pub private_key: ZeroizingString,
}

impl fmt::Display for AccountReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "New account created")?;
        writeln!(f, "Address:     {}", checksum_address(&self.address))?;
        writeln!(f, "Private key: {}", &*self.private_key)?;
        write!(f, "Save your private key securely! Anyone holding it controls the funds.")
    }
}

#[derive(Debug, Clone)]
pub struct BalanceReport {
    pub address: Address,
    pub wei: U256,
    pub symbol: &'static str,
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Balance of {}: {} {}",
            checksum_address(&self.address),
            format_ether(self.wei),
            self.symbol
        )
    }
}

#[derive(Debug, Clone)]
pub struct SignedMessageReport {
    pub message: String,
    pub signature: String,
    pub signer: Address,
    /// Result of verifying the fresh signature against the signer's key.
    pub verified: bool,
}

impl fmt::Display for SignedMessageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Message:   {}", self.message)?;
        writeln!(f, "Signature: {}", self.signature)?;
        writeln!(f, "Signer:    {}", checksum_address(&self.signer))?;
        write!(f, "Verification: {}", validity(self.verified))
    }
}

#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub expected: Address,
    pub recovered: Address,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.expected == self.recovered
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Expected signer:  {}", checksum_address(&self.expected))?;
        writeln!(f, "Recovered signer: {}", checksum_address(&self.recovered))?;
        write!(f, "Signature: {}", validity(self.is_valid()))
    }
}

#[derive(Debug, Clone)]
pub struct SendReport {
    pub tx_hash: B256,
    pub chain: String,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    /// Native currency of the network the transfer was signed for.
    pub symbol: &'static str,
    pub nonce: u64,
    pub explorer_url: Option<String>,
    /// Raw signed transaction; set only for dry runs.
    pub raw: Option<String>,
}

impl fmt::Display for SendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hash = format!("{:#x}", self.tx_hash);
        if self.raw.is_some() {
            writeln!(f, "Transaction signed (dry run, not broadcast)")?;
        } else {
            writeln!(f, "Transaction sent")?;
        }
        writeln!(f, "Network: {}", self.chain)?;
        writeln!(f, "From:    {}", checksum_address(&self.from))?;
        writeln!(f, "To:      {}", checksum_address(&self.to))?;
        writeln!(f, "Value:   {} {}", format_ether(self.value), self.symbol)?;
        writeln!(f, "Nonce:   {}", self.nonce)?;
        write!(f, "Hash:    {hash}")?;
        if let Some(raw) = &self.raw {
            write!(f, "\nRaw:     {raw}")?;
            return Ok(());
        }
        if let Some(url) = &self.explorer_url {
            write!(f, "\nExplorer: {url}")?;
        }
        write!(f, "\nCheck its status with: ethwallet check-tx --tx {hash}")
    }
}

#[derive(Debug, Clone)]
pub struct TxStatusReport {
    pub transaction: RpcTransaction,
    /// `None` when the node has no receipt yet or the lookup failed.
    pub receipt: Option<RpcReceipt>,
    pub symbol: &'static str,
}

impl TxStatusReport {
    pub fn is_pending(&self) -> bool {
        self.transaction.block_number.is_none()
    }
}

impl fmt::Display for TxStatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tx = &self.transaction;
        writeln!(f, "Transaction {:#x}", tx.hash)?;
        writeln!(
            f,
            "Status:    {}",
            if self.is_pending() { "PENDING" } else { "CONFIRMED" }
        )?;
        writeln!(f, "From:      {}", checksum_address(&tx.from))?;
        match &tx.to {
            Some(to) => writeln!(f, "To:        {}", checksum_address(to))?,
            None => writeln!(f, "To:        (contract creation)")?,
        }
        writeln!(f, "Value:     {} {}", format_ether(tx.value), self.symbol)?;
        if let Some(price) = tx.gas_price {
            writeln!(f, "Gas price: {} gwei", format_gwei(price))?;
        }
        write!(f, "Gas limit: {}", tx.gas)?;

        match &self.receipt {
            Some(receipt) => {
                write!(f, "\nBlock:     {}", receipt.block_number)?;
                write!(f, "\nGas used:  {}", receipt.gas_used)?;
                write!(
                    f,
                    "\nResult:    {}",
                    if receipt.succeeded() { "SUCCESS" } else { "FAILED" }
                )
            }
            None => write!(f, "\nReceipt not yet available (transaction may be pending)"),
        }
    }
}

fn validity(valid: bool) -> &'static str {
    if valid {
        "VALID"
    } else {
        "INVALID"
    }
}
