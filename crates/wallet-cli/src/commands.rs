//! Command logic, independent of argument parsing and output.
//!
//! Everything that touches the network goes through [`NodeApi`] so the
//! commands can run against an in-memory node in tests.

use std::str::FromStr;

use alloy_primitives::B256;
use chain_eth::{address, chains, message, transaction, units, EthError, KeyPair, Signature};

use crate::config::{TransferRequest, WalletConfig};
use crate::error::WalletError;
use crate::rpc::NodeApi;
use crate::types::{
    AccountReport, BalanceReport, SendReport, SignedMessageReport, TxStatusReport,
    VerificationReport,
};

pub fn create_account() -> Result<AccountReport, WalletError> {
    let key = KeyPair::generate()?;
    tracing::info!(address = %key.checksum_address(), "created account");
    Ok(AccountReport {
        address: key.address(),
        private_key: key.private_key_hex(),
    })
}

pub async fn balance<N: NodeApi>(node: &N, address: &str) -> Result<BalanceReport, WalletError> {
    let address = address::parse_address(address)?;
    let (wei, chain_id) = tokio::try_join!(node.balance(address), node.chain_id())?;
    Ok(BalanceReport {
        address,
        wei,
        symbol: chains::native_symbol(chain_id),
    })
}

pub fn sign_message(config: &WalletConfig, text: &str) -> Result<SignedMessageReport, WalletError> {
    let key = config.key_pair()?;
    let signature = message::sign_message(text.as_bytes(), &key)?;
    let verified = message::verify_message(text.as_bytes(), &signature, key.verifying_key())?;
    if !verified {
        tracing::warn!("fresh signature failed self-verification");
    }

    Ok(SignedMessageReport {
        message: text.to_owned(),
        signature: signature.to_hex(),
        signer: key.address(),
        verified,
    })
}

/// Recovers the signer of `text` and compares it with `expected`.
///
/// A signature that parses but recovers a different key is reported as
/// invalid rather than returned as an error.
pub fn verify_message(
    text: &str,
    signature: &str,
    expected: &str,
) -> Result<VerificationReport, WalletError> {
    let expected = address::parse_address(expected)?;
    let signature = Signature::from_hex(signature)?;
    let recovered = message::recover_message_signer(text.as_bytes(), &signature)?;
    tracing::debug!(%recovered, %expected, "recovered message signer");
    Ok(VerificationReport {
        expected,
        recovered,
    })
}

pub async fn send_transaction<N: NodeApi>(
    node: &N,
    config: &WalletConfig,
    request: &TransferRequest,
) -> Result<SendReport, WalletError> {
    let key = config.key_pair()?;
    let from = key.address();

    let (nonce, gas_price, chain_id) = tokio::try_join!(
        node.pending_nonce(from),
        node.gas_price(),
        node.chain_id()
    )?;
    tracing::info!(
        nonce,
        gas_price = %units::format_gwei(gas_price),
        chain_id,
        "fetched transaction parameters"
    );

    let tx = transaction::build_transfer(
        nonce,
        gas_price,
        request.gas_limit,
        request.to,
        request.amount,
    )?;
    let signed = transaction::sign_transaction(&tx, chain_id, &key)?;

    let sender = signed.recover_sender()?;
    if sender != from {
        return Err(EthError::SigningFailure(format!(
            "signature recovers {sender}, expected {from}"
        ))
        .into());
    }

    let mut report = SendReport {
        tx_hash: signed.hash,
        chain: chains::describe_chain(chain_id),
        from,
        to: request.to,
        value: request.amount,
        symbol: chains::native_symbol(chain_id),
        nonce,
        explorer_url: None,
        raw: None,
    };

    if request.dry_run {
        report.raw = Some(signed.raw_hex());
        return Ok(report);
    }

    let node_hash = node.send_raw_transaction(&signed.raw).await?;
    if node_hash != signed.hash {
        tracing::warn!(
            local = %signed.hash,
            node = %node_hash,
            "node returned a different transaction hash"
        );
    }
    tracing::info!(tx_hash = %node_hash, "transaction broadcast");

    report.tx_hash = node_hash;
    report.explorer_url = chains::explorer_tx_url(chain_id, &format!("{node_hash:#x}"));
    Ok(report)
}

/// Looks up a transaction and, when available, its receipt.
///
/// Only a failed transaction lookup fails the command. A receipt or chain id
/// lookup error is logged and the report falls back to "receipt not yet
/// available" and the default currency symbol.
pub async fn check_transaction<N: NodeApi>(
    node: &N,
    tx_hash: &str,
) -> Result<TxStatusReport, WalletError> {
    let hash = B256::from_str(tx_hash.trim())
        .map_err(|e| WalletError::InvalidInput(format!("transaction hash {tx_hash:?}: {e}")))?;

    let transaction = node
        .transaction_by_hash(hash)
        .await?
        .ok_or_else(|| WalletError::TransactionNotFound(format!("{hash:#x}")))?;

    let receipt = match node.transaction_receipt(hash).await {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::warn!(error = %e, tx_hash = %hash, "receipt lookup failed");
            None
        }
    };

    let symbol = match node.chain_id().await {
        Ok(chain_id) => chains::native_symbol(chain_id),
        Err(e) => {
            tracing::warn!(error = %e, "chain id lookup failed");
            chains::native_symbol(0)
        }
    };

    Ok(TxStatusReport {
        transaction,
        receipt,
        symbol,
    })
}
