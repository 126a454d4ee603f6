use chain_eth::EthError;
use thiserror::Error;

use crate::rpc::RpcError;

/// Process exit codes.
pub const EXIT_SUCCESS: u8 = 0;
/// Bad input, missing configuration, or a key/signature/transaction error.
pub const EXIT_ERROR: u8 = 1;
/// The node could not be reached or rejected a request.
pub const EXIT_NODE_ERROR: u8 = 2;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Eth(EthError),

    #[error("node error: {0}")]
    Node(RpcError),

    #[error("transaction not found: {0}")]
    TransactionNotFound(String),
}

impl WalletError {
    pub fn exit_code(&self) -> u8 {
        match self {
            WalletError::Node(_) => EXIT_NODE_ERROR,
            _ => EXIT_ERROR,
        }
    }
}

impl From<EthError> for WalletError {
    fn from(e: EthError) -> Self {
        WalletError::Eth(e)
    }
}

impl From<RpcError> for WalletError {
    fn from(e: RpcError) -> Self {
        WalletError::Node(e)
    }
}
