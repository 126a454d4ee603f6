use std::fmt;

use alloy_primitives::Address;
use crypto_utils::random::random_bytes_fixed_from;
use crypto_utils::zeroizing::ZeroizingString;
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::Zeroizing;

use crate::address::public_key_to_address;
use crate::error::EthError;

/// Redraws allowed before giving up on a source that keeps yielding
/// out-of-range scalars. An honest source fails once per ~2^128 draws.
const MAX_SCALAR_DRAWS: usize = 8;

/// A secp256k1 key pair with its public point cached.
///
/// The private scalar lives inside [`SigningKey`], which zeroizes on drop.
/// `Debug` output shows only the address.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generates a fresh key pair from the operating system CSPRNG.
    pub fn generate() -> Result<Self, EthError> {
        Self::generate_with(&mut OsRng)
    }

    /// Generates a key pair from the given source.
    ///
    /// Candidates equal to zero or not below the curve order are discarded
    /// and redrawn.
    pub fn generate_with<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Self, EthError> {
        for _ in 0..MAX_SCALAR_DRAWS {
            let candidate = Zeroizing::new(random_bytes_fixed_from::<R, 32>(rng)?);
            if let Ok(signing_key) = SigningKey::from_bytes((&*candidate).into()) {
                let pair = Self::from_signing_key(signing_key);
                tracing::debug!(address = %pair.checksum_address(), "generated key pair");
                return Ok(pair);
            }
        }

        Err(EthError::RandomnessFailure(format!(
            "no valid scalar after {MAX_SCALAR_DRAWS} draws"
        )))
    }

    /// Parses a hex-encoded 32-byte private key (optional `0x` prefix).
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, EthError> {
        let trimmed = hex_key.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex_part.len() != 64 {
            return Err(EthError::MalformedKey(format!(
                "expected 64 hex characters, got {}",
                hex_part.len()
            )));
        }

        let mut bytes = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(hex_part, &mut *bytes)
            .map_err(|_| EthError::MalformedKey("key contains non-hex characters".into()))?;

        Self::from_bytes(&bytes)
    }

    /// Builds a key pair from a raw big-endian scalar.
    pub fn from_bytes(scalar: &[u8; 32]) -> Result<Self, EthError> {
        let signing_key = SigningKey::from_bytes(scalar.into()).map_err(|_| {
            EthError::MalformedKey("scalar must be in the range [1, n-1]".into())
        })?;
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = *signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Uncompressed public key, `0x04 || x || y`.
    pub fn public_key_bytes(&self) -> [u8; 65] {
        let encoded = self.verifying_key.to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    pub fn address(&self) -> Address {
        public_key_to_address(&self.verifying_key)
    }

    pub fn checksum_address(&self) -> String {
        crate::address::checksum_address(&self.address())
    }

    /// Exports the private scalar as `0x`-prefixed hex.
    ///
    /// Only call this for an explicit user-requested export.
    pub fn private_key_hex(&self) -> ZeroizingString {
        let mut scalar = Zeroizing::new([0u8; 32]);
        scalar.copy_from_slice(&self.signing_key.to_bytes());
        let hex = Zeroizing::new(hex::encode(*scalar));
        ZeroizingString::new(format!("0x{}", hex.as_str()))
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.verifying_key == other.verifying_key
    }
}

impl Eq for KeyPair {}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.checksum_address())
            .finish_non_exhaustive()
    }
}
