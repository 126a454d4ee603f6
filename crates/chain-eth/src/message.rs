use alloy_primitives::{Address, B256};
use k256::ecdsa::VerifyingKey;
use sha3::{Digest, Keccak256};

use crate::address::public_key_to_address;
use crate::error::EthError;
use crate::keys::KeyPair;
use crate::signature::{self, Signature};

/// EIP-191 version 0x45 prefix.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Hashes a message the way `personal_sign` does:
/// `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`,
/// with the length written in ASCII decimal.
pub fn hash_personal_message(message: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    B256::from_slice(&hasher.finalize())
}

pub fn sign_message(message: &[u8], key: &KeyPair) -> Result<Signature, EthError> {
    let hash = hash_personal_message(message);
    signature::sign_hash(hash.as_slice(), key.signing_key())
}

pub fn verify_message(
    message: &[u8],
    signature: &Signature,
    expected: &VerifyingKey,
) -> Result<bool, EthError> {
    let hash = hash_personal_message(message);
    signature::verify(hash.as_slice(), signature, expected)
}

/// Recovers the address that signed `message`.
pub fn recover_message_signer(message: &[u8], signature: &Signature) -> Result<Address, EthError> {
    let hash = hash_personal_message(message);
    let key = signature::recover_public_key(hash.as_slice(), signature)?;
    Ok(public_key_to_address(&key))
}
