//! Recoverable secp256k1 ECDSA over 32-byte prehashes.
//!
//! Signatures are always produced in low-s form (RFC 6979 nonces, so the
//! same key and hash give the same signature). Recovery rejects high-s
//! signatures, which keeps every (hash, signer) pair to a single valid
//! encoding.

use alloy_primitives::U256;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use k256::elliptic_curve::scalar::IsHigh;

use crate::error::EthError;

/// Length of the `r || s || v` wire encoding.
pub const SIGNATURE_LENGTH: usize = 65;

/// A recoverable ECDSA signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: U256,
    pub s: U256,
    /// Parity of the ephemeral point's y coordinate; 0 or 1 when valid.
    pub recovery_id: u8,
}

impl Signature {
    /// `r || s || v` with `v` as the raw recovery id (0 or 1).
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        out[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        out[64] = self.recovery_id;
        out
    }

    /// Parses the 65-byte `r || s || v` form.
    ///
    /// A trailing 27/28 (the personal_sign convention used by many wallets)
    /// is folded back to 0/1. Other `v` values are kept as-is and fail at
    /// recovery time.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EthError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(EthError::RecoveryFailure(format!(
                "signature must be {SIGNATURE_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }

        let v = bytes[64];
        let recovery_id = match v {
            27 | 28 => v - 27,
            other => other,
        };

        Ok(Self {
            r: U256::from_be_slice(&bytes[..32]),
            s: U256::from_be_slice(&bytes[32..64]),
            recovery_id,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    pub fn from_hex(input: &str) -> Result<Self, EthError> {
        let trimmed = input.trim();
        let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(hex_part)
            .map_err(|e| EthError::RecoveryFailure(format!("invalid signature hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    fn to_ecdsa(&self) -> Result<(EcdsaSignature, RecoveryId), EthError> {
        if self.recovery_id > 1 {
            return Err(EthError::RecoveryFailure(format!(
                "recovery id {} is not 0 or 1",
                self.recovery_id
            )));
        }

        let signature = EcdsaSignature::from_scalars(
            self.r.to_be_bytes::<32>(),
            self.s.to_be_bytes::<32>(),
        )
        .map_err(|_| EthError::RecoveryFailure("r or s outside [1, n-1]".into()))?;

        if bool::from(signature.s().is_high()) {
            return Err(EthError::RecoveryFailure(
                "s is in the upper half of the curve order".into(),
            ));
        }

        let recovery_id = RecoveryId::from_byte(self.recovery_id)
            .ok_or_else(|| EthError::RecoveryFailure("invalid recovery id".into()))?;

        Ok((signature, recovery_id))
    }
}

fn prehash(hash: &[u8]) -> Option<&[u8; 32]> {
    hash.try_into().ok()
}

/// Signs a 32-byte prehash with RFC 6979 deterministic nonces.
pub fn sign_hash(hash: &[u8], key: &SigningKey) -> Result<Signature, EthError> {
    let hash = prehash(hash).ok_or_else(|| {
        EthError::SigningFailure(format!("hash must be 32 bytes, got {}", hash.len()))
    })?;

    let (signature, recovery_id): (EcdsaSignature, RecoveryId) = key
        .sign_prehash(hash)
        .map_err(|e| EthError::SigningFailure(e.to_string()))?;

    Ok(Signature {
        r: U256::from_be_slice(&signature.r().to_bytes()),
        s: U256::from_be_slice(&signature.s().to_bytes()),
        recovery_id: recovery_id.to_byte(),
    })
}

/// Recovers the signer's public key from a prehash and signature.
pub fn recover_public_key(hash: &[u8], signature: &Signature) -> Result<VerifyingKey, EthError> {
    let hash = prehash(hash).ok_or_else(|| {
        EthError::RecoveryFailure(format!("hash must be 32 bytes, got {}", hash.len()))
    })?;

    let (signature, recovery_id) = signature.to_ecdsa()?;

    VerifyingKey::recover_from_prehash(hash, &signature, recovery_id)
        .map_err(|e| EthError::RecoveryFailure(e.to_string()))
}

/// Checks that `signature` over `hash` was made by `expected`.
///
/// A well-formed signature from another key yields `Ok(false)`.
pub fn verify(
    hash: &[u8],
    signature: &Signature,
    expected: &VerifyingKey,
) -> Result<bool, EthError> {
    let recovered = recover_public_key(hash, signature)?;
    Ok(recovered == *expected)
}
