use alloy_primitives::Address;
use k256::ecdsa::VerifyingKey;
use k256::PublicKey;
use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// Derives the account address from an uncompressed secp256k1 public key
/// (65 bytes, `0x04 || x || y`).
///
/// The address is the low 20 bytes of Keccak-256 over the 64-byte `x || y`
/// encoding. Points that are not on the curve are rejected.
pub fn derive_address(uncompressed_pubkey: &[u8; 65]) -> Result<Address, EthError> {
    if uncompressed_pubkey[0] != 0x04 {
        return Err(EthError::InvalidPublicKey(format!(
            "uncompressed key must start with 0x04, got 0x{:02x}",
            uncompressed_pubkey[0]
        )));
    }

    PublicKey::from_sec1_bytes(uncompressed_pubkey).map_err(|_| {
        EthError::InvalidPublicKey("point is not on the secp256k1 curve".into())
    })?;

    Ok(address_from_xy(&uncompressed_pubkey[1..]))
}

/// Address of an already-validated verifying key.
pub fn public_key_to_address(key: &VerifyingKey) -> Address {
    let encoded = key.to_encoded_point(false);
    address_from_xy(&encoded.as_bytes()[1..])
}

fn address_from_xy(xy: &[u8]) -> Address {
    let hash = Keccak256::digest(xy);
    Address::from_slice(&hash[12..])
}

/// Parses a `0x`-prefixed address string.
///
/// All-lowercase and all-uppercase forms are accepted as-is. Mixed case is
/// treated as EIP-55 and must carry a correct checksum.
pub fn parse_address(address: &str) -> Result<Address, EthError> {
    let address = address.trim();
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(hex_part, &mut bytes)
        .map_err(|_| EthError::InvalidAddress("address contains non-hex characters".into()))?;
    let parsed = Address::from(bytes);

    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(parsed);
    }

    let expected = checksum_address(&parsed);
    if expected[2..] != *hex_part {
        return Err(EthError::InvalidAddress(format!(
            "checksum mismatch, expected {expected}"
        )));
    }

    Ok(parsed)
}

/// Renders an address with the EIP-55 mixed-case checksum.
pub fn checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_slice());

    // EIP-55: nibble i of keccak(lowercase hex) decides the case of char i.
    let hash = Keccak256::digest(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    checksummed
}
