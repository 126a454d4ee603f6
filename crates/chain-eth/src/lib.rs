//! Ethereum key, message and transaction primitives for the wallet.
//!
//! This crate provides:
//! - secp256k1 key generation, parsing and address derivation (EIP-55 display)
//! - EIP-191 personal message hashing, signing and verification
//! - recoverable ECDSA signatures with low-s enforcement
//! - legacy value-transfer transactions signed with EIP-155 replay protection
//! - exact wei/ether/gwei conversion and known-network metadata
//!
//! Nothing here performs I/O; nonce, gas price and chain id come from the
//! caller.

pub mod address;
pub mod chains;
pub mod error;
pub mod keys;
pub mod message;
pub mod signature;
pub mod transaction;
pub mod units;

pub use alloy_primitives::{Address, B256, U256};
pub use error::EthError;
pub use keys::KeyPair;
pub use signature::Signature;
pub use transaction::{LegacyTransaction, SignedTransaction};
