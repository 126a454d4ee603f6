use thiserror::Error;

/// Errors raised by the shared crypto helpers.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("randomness source unavailable: {0}")]
    RandomnessUnavailable(String),
}
