//! # crypto-utils
//!
//! Secure random generation and memory-safe secret containers shared by the
//! wallet crates.

pub mod error;
pub mod random;
pub mod zeroizing;

pub use error::CryptoError;
