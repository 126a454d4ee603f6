use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{Encodable, RlpEncodable};
use sha3::{Digest, Keccak256};

use crate::address::public_key_to_address;
use crate::error::EthError;
use crate::keys::KeyPair;
use crate::signature::{self, Signature};

/// Intrinsic gas of a plain value transfer.
pub const TRANSFER_GAS: u64 = 21_000;

/// An unsigned legacy (pre-EIP-2718) value transfer.
///
/// Calldata is always empty; contract calls are not built here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: U256,
    pub gas_limit: u64,
    pub to: Address,
    /// Transfer value in wei.
    pub value: U256,
}

/// A signed legacy transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: LegacyTransaction,
    pub chain_id: u64,
    pub signature: Signature,
    /// EIP-155 `v`: `recovery_id + chain_id * 2 + 35`.
    pub v: u64,
    /// RLP-encoded signed transaction.
    pub raw: Vec<u8>,
    /// Keccak-256 of `raw`; the identifier nodes index the transaction by.
    pub hash: B256,
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }

    /// Recovers the sending address from the embedded signature.
    pub fn recover_sender(&self) -> Result<Address, EthError> {
        let recovery_id = recovery_id_from_v(self.v, self.chain_id)?;
        let signature = Signature {
            recovery_id,
            ..self.signature
        };
        let hash = signing_hash(&self.transaction, self.chain_id);
        let key = signature::recover_public_key(hash.as_slice(), &signature)?;
        Ok(public_key_to_address(&key))
    }
}

/// Builds an unsigned transfer of `value` wei to `to`.
///
/// Fails with [`EthError::InsufficientGas`] when `gas_limit` cannot cover the
/// intrinsic cost of a transfer.
pub fn build_transfer(
    nonce: u64,
    gas_price: U256,
    gas_limit: u64,
    to: Address,
    value: U256,
) -> Result<LegacyTransaction, EthError> {
    if gas_limit < TRANSFER_GAS {
        return Err(EthError::InsufficientGas {
            gas_limit,
            minimum: TRANSFER_GAS,
        });
    }

    Ok(LegacyTransaction {
        nonce,
        gas_price,
        gas_limit,
        to,
        value,
    })
}

/// EIP-155 signing payload:
/// `rlp([nonce, gasPrice, gasLimit, to, value, "", chainId, 0, 0])`.
pub fn encode_for_signing(tx: &LegacyTransaction, chain_id: u64) -> Vec<u8> {
    let fields = Eip155SigningFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: tx.to,
        value: tx.value,
        data: Bytes::new(),
        chain_id,
        r: 0,
        s: 0,
    };

    let mut buf = Vec::with_capacity(fields.length());
    fields.encode(&mut buf);
    buf
}

/// Keccak-256 of [`encode_for_signing`].
pub fn signing_hash(tx: &LegacyTransaction, chain_id: u64) -> B256 {
    B256::from_slice(&Keccak256::digest(encode_for_signing(tx, chain_id)))
}

/// Signs `tx` for `chain_id` and serializes the result.
///
/// The signing process:
/// 1. RLP-encode the fields with the `(chainId, 0, 0)` EIP-155 tail.
/// 2. Keccak-256 the payload and sign the hash.
/// 3. Fold the chain id into `v`.
/// 4. RLP-encode `[nonce, gasPrice, gasLimit, to, value, "", v, r, s]`.
/// 5. Hash the encoding to get the transaction hash.
pub fn sign_transaction(
    tx: &LegacyTransaction,
    chain_id: u64,
    key: &KeyPair,
) -> Result<SignedTransaction, EthError> {
    if chain_id == 0 {
        return Err(EthError::InvalidChain(
            "chain id must be positive for replay-protected signing".into(),
        ));
    }

    let hash = signing_hash(tx, chain_id);
    let signature = signature::sign_hash(hash.as_slice(), key.signing_key())?;
    let v = eip155_v(signature.recovery_id, chain_id)?;

    let fields = SignedLegacyFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: tx.to,
        value: tx.value,
        data: Bytes::new(),
        v,
        r: signature.r,
        s: signature.s,
    };

    let mut raw = Vec::with_capacity(fields.length());
    fields.encode(&mut raw);

    let tx_hash = B256::from_slice(&Keccak256::digest(&raw));

    tracing::debug!(
        nonce = tx.nonce,
        chain_id,
        v,
        tx_hash = %tx_hash,
        "signed legacy transaction"
    );

    Ok(SignedTransaction {
        transaction: tx.clone(),
        chain_id,
        signature,
        v,
        raw,
        hash: tx_hash,
    })
}

/// `recovery_id + chain_id * 2 + 35`, rejecting chain ids that overflow.
pub fn eip155_v(recovery_id: u8, chain_id: u64) -> Result<u64, EthError> {
    if recovery_id > 1 {
        return Err(EthError::SigningFailure(format!(
            "recovery id {recovery_id} is not 0 or 1"
        )));
    }

    chain_id
        .checked_mul(2)
        .and_then(|x| x.checked_add(35))
        .and_then(|x| x.checked_add(u64::from(recovery_id)))
        .ok_or_else(|| EthError::InvalidChain(format!("chain id {chain_id} is too large")))
}

/// Inverse of [`eip155_v`].
pub fn recovery_id_from_v(v: u64, chain_id: u64) -> Result<u8, EthError> {
    let base = eip155_v(0, chain_id)?;
    match v.checked_sub(base) {
        Some(0) => Ok(0),
        Some(1) => Ok(1),
        _ => Err(EthError::RecoveryFailure(format!(
            "v = {v} does not belong to chain {chain_id}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// RLP-encodable structures
// ---------------------------------------------------------------------------

#[derive(RlpEncodable)]
struct Eip155SigningFields {
    nonce: u64,
    gas_price: U256,
    gas_limit: u64,
    to: Address,
    value: U256,
    data: Bytes,
    chain_id: u64,
    r: u8,
    s: u8,
}

#[derive(RlpEncodable)]
struct SignedLegacyFields {
    nonce: u64,
    gas_price: U256,
    gas_limit: u64,
    to: Address,
    value: U256,
    data: Bytes,
    v: u64,
    r: U256,
    s: U256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    /// Key from the EIP-155 worked example (DO NOT use on mainnet).
    const EIP155_KEY: [u8; 32] = [0x46; 32];

    const EIP155_RAW: &str = "0xf86c098504a817c800825208943535353535353535353535353535353535353535\
                              880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c\
                              71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc\
                              64214b297fb1966a3b6d83";

    fn eip155_tx() -> LegacyTransaction {
        build_transfer(
            9,
            U256::from(20_000_000_000u64),
            21_000,
            address!("3535353535353535353535353535353535353535"),
            U256::from(1_000_000_000_000_000_000u64),
        )
        .unwrap()
    }

    fn dead_tx(nonce: u64) -> LegacyTransaction {
        build_transfer(
            nonce,
            U256::from(1_000_000_000u64),
            TRANSFER_GAS,
            address!("000000000000000000000000000000000000dEaD"),
            U256::from(12_345u64),
        )
        .unwrap()
    }

    #[test]
    fn gas_below_transfer_cost_is_rejected() {
        let to = address!("000000000000000000000000000000000000dEaD");
        let err = build_transfer(0, U256::ZERO, 20_999, to, U256::ZERO).unwrap_err();
        assert!(matches!(
            err,
            EthError::InsufficientGas {
                gas_limit: 20_999,
                minimum: 21_000
            }
        ));
        assert!(build_transfer(0, U256::ZERO, 21_000, to, U256::ZERO).is_ok());
        assert!(build_transfer(0, U256::ZERO, 100_000, to, U256::ZERO).is_ok());
    }

    #[test]
    fn eip155_signing_payload_matches_reference() {
        let encoded = encode_for_signing(&eip155_tx(), 1);
        assert_eq!(
            hex::encode(encoded),
            "ec098504a817c800825208943535353535353535353535353535353535353535\
             880de0b6b3a764000080018080"
        );
    }

    #[test]
    fn eip155_signing_hash_matches_reference() {
        assert_eq!(
            signing_hash(&eip155_tx(), 1),
            b256!("daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53")
        );
    }

    #[test]
    fn eip155_signed_transaction_matches_reference() {
        let key = KeyPair::from_bytes(&EIP155_KEY).unwrap();
        let signed = sign_transaction(&eip155_tx(), 1, &key).unwrap();

        assert_eq!(signed.v, 37);
        assert_eq!(signed.signature.recovery_id, 0);
        assert_eq!(signed.raw_hex(), EIP155_RAW);
        assert_eq!(
            signed.hash_hex(),
            "0x33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788"
        );
    }

    #[test]
    fn transaction_hash_differs_from_signing_hash() {
        let key = KeyPair::from_bytes(&EIP155_KEY).unwrap();
        let signed = sign_transaction(&eip155_tx(), 1, &key).unwrap();
        assert_ne!(signed.hash, signing_hash(&eip155_tx(), 1));
        assert_eq!(signed.hash, B256::from_slice(&Keccak256::digest(&signed.raw)));
    }

    #[test]
    fn chain_id_zero_is_invalid() {
        let key = KeyPair::from_bytes(&EIP155_KEY).unwrap();
        assert!(matches!(
            sign_transaction(&eip155_tx(), 0, &key),
            Err(EthError::InvalidChain(_))
        ));
    }

    #[test]
    fn oversized_chain_id_is_invalid() {
        let key = KeyPair::from_bytes(&EIP155_KEY).unwrap();
        assert!(matches!(
            sign_transaction(&eip155_tx(), u64::MAX / 2, &key),
            Err(EthError::InvalidChain(_))
        ));
    }

    #[test]
    fn v_encodes_chain_and_recovery_id() {
        let key = KeyPair::from_bytes(&EIP155_KEY).unwrap();
        for chain_id in [1u64, 5, 56, 137, 1337, 31_337, 11_155_111] {
            for nonce in 0..4 {
                let signed = sign_transaction(&dead_tx(nonce), chain_id, &key).unwrap();
                let recovery_id = u64::from(signed.signature.recovery_id);
                assert!(recovery_id <= 1);
                assert_eq!(signed.v, recovery_id + chain_id * 2 + 35);
            }
        }
    }

    #[test]
    fn sender_recovers_to_signer() {
        let key = KeyPair::generate().unwrap();
        let signed = sign_transaction(&dead_tx(3), 11_155_111, &key).unwrap();
        assert_eq!(signed.recover_sender().unwrap(), key.address());
    }

    #[test]
    fn tampered_v_does_not_recover() {
        let key = KeyPair::from_bytes(&EIP155_KEY).unwrap();
        let mut signed = sign_transaction(&dead_tx(0), 1, &key).unwrap();
        signed.v = 27;
        assert!(matches!(
            signed.recover_sender(),
            Err(EthError::RecoveryFailure(_))
        ));
    }

    #[test]
    fn signing_is_deterministic_and_nonce_sensitive() {
        let key = KeyPair::from_bytes(&EIP155_KEY).unwrap();
        let a = sign_transaction(&dead_tx(0), 1, &key).unwrap();
        let b = sign_transaction(&dead_tx(0), 1, &key).unwrap();
        let c = sign_transaction(&dead_tx(1), 1, &key).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.raw, c.raw);
        assert_ne!(a.hash, c.hash);
    }

    #[test]
    fn chain_id_changes_signature() {
        let key = KeyPair::from_bytes(&EIP155_KEY).unwrap();
        let mainnet = sign_transaction(&dead_tx(0), 1, &key).unwrap();
        let polygon = sign_transaction(&dead_tx(0), 137, &key).unwrap();
        assert_ne!(mainnet.raw, polygon.raw);
        assert_ne!(mainnet.signature, polygon.signature);
    }

    #[test]
    fn v_round_trips_through_recovery_id() {
        assert_eq!(eip155_v(1, 1).unwrap(), 38);
        assert_eq!(recovery_id_from_v(37, 1).unwrap(), 0);
        assert_eq!(recovery_id_from_v(38, 1).unwrap(), 1);
        assert!(recovery_id_from_v(39, 1).is_err());
        assert!(recovery_id_from_v(28, 1).is_err());
    }

    #[test]
    fn signing_hash_agrees_with_alloy_consensus() {
        use alloy_consensus::{SignableTransaction, TxLegacy};
        use alloy_primitives::TxKind;

        let tx = dead_tx(42);
        let reference = TxLegacy {
            chain_id: Some(5),
            nonce: tx.nonce,
            gas_price: 1_000_000_000,
            gas_limit: tx.gas_limit,
            to: TxKind::Call(tx.to),
            value: tx.value,
            input: Bytes::new(),
        };

        assert_eq!(signing_hash(&tx, 5), reference.signature_hash());
    }
}
