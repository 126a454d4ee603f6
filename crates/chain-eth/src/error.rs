use thiserror::Error;

/// Ethereum key, signature and transaction errors.
///
/// Every variant is terminal for the operation that raised it; nothing in
/// this crate retries or swallows them.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("randomness failure: {0}")]
    RandomnessFailure(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("malformed private key: {0}")]
    MalformedKey(String),

    #[error("signing failure: {0}")]
    SigningFailure(String),

    #[error("signature recovery failure: {0}")]
    RecoveryFailure(String),

    #[error("insufficient gas: limit {gas_limit} is below the {minimum} required for a transfer")]
    InsufficientGas { gas_limit: u64, minimum: u64 },

    #[error("invalid chain id: {0}")]
    InvalidChain(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

impl From<crypto_utils::CryptoError> for EthError {
    fn from(e: crypto_utils::CryptoError) -> Self {
        EthError::RandomnessFailure(e.to_string())
    }
}
