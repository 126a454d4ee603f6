//! JSON-RPC client for the Ethereum node the wallet talks to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, B256, U256, U64};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the node.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot connect to {0}")]
    Connection(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),
}

/// Transaction as returned by `eth_getTransactionByHash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: B256,
    pub from: Address,
    /// `None` for contract creations.
    #[serde(default)]
    pub to: Option<Address>,
    pub value: U256,
    #[serde(default)]
    pub gas_price: Option<U256>,
    pub gas: U64,
    pub nonce: U64,
    /// `None` while the transaction is still in the mempool.
    #[serde(default)]
    pub block_number: Option<U64>,
}

/// Receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: B256,
    pub block_number: U64,
    pub gas_used: U64,
    /// 1 on success, 0 on revert.
    #[serde(default)]
    pub status: Option<U64>,
}

impl RpcReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == Some(U64::from(1))
    }
}

/// The node operations the wallet commands depend on.
#[allow(async_fn_in_trait)]
pub trait NodeApi {
    async fn chain_id(&self) -> Result<u64, RpcError>;

    /// Next nonce for `address`, counting pending transactions.
    async fn pending_nonce(&self, address: Address) -> Result<u64, RpcError>;

    async fn gas_price(&self) -> Result<U256, RpcError>;

    async fn balance(&self, address: Address) -> Result<U256, RpcError>;

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, RpcError>;

    async fn transaction_by_hash(&self, hash: B256) -> Result<Option<RpcTransaction>, RpcError>;

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<RpcReceipt>, RpcError>;
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, P> {
    jsonrpc: &'static str,
    method: &'a str,
    params: P,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// Parameter list for methods that take none; serializes as `[]`.
const NO_PARAMS: [u8; 0] = [];

/// HTTP JSON-RPC 2.0 client.
pub struct NodeClient {
    client: Client,
    url: String,
    request_id: AtomicU64,
}

impl NodeClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            request_id: AtomicU64::new(1),
        })
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Calls `method`; a JSON `null` result comes back as `None`.
    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<Option<R>, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id(),
        };

        tracing::debug!(method, id = request.id, url = %self.url, "rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RpcError::Connection(self.url.clone())
                } else {
                    RpcError::Http(e)
                }
            })?
            .error_for_status()?;

        let body = response.bytes().await?;
        decode_response(&body)
    }

    async fn call_required<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        self.call(method, params)
            .await?
            .ok_or_else(|| RpcError::Parse(format!("{method} returned no result")))
    }
}

fn decode_response<R: DeserializeOwned>(body: &[u8]) -> Result<Option<R>, RpcError> {
    let response: JsonRpcResponse<R> =
        serde_json::from_slice(body).map_err(|e| RpcError::Parse(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(RpcError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    Ok(response.result)
}

fn quantity_to_u64(method: &str, value: U256) -> Result<u64, RpcError> {
    u64::try_from(value)
        .map_err(|_| RpcError::Parse(format!("{method} value {value} overflows u64")))
}

impl NodeApi for NodeClient {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        let id: U256 = self.call_required("eth_chainId", NO_PARAMS).await?;
        quantity_to_u64("eth_chainId", id)
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64, RpcError> {
        let nonce: U256 = self
            .call_required("eth_getTransactionCount", (address, "pending"))
            .await?;
        quantity_to_u64("eth_getTransactionCount", nonce)
    }

    async fn gas_price(&self) -> Result<U256, RpcError> {
        self.call_required("eth_gasPrice", NO_PARAMS).await
    }

    async fn balance(&self, address: Address) -> Result<U256, RpcError> {
        self.call_required("eth_getBalance", (address, "latest")).await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, RpcError> {
        let raw_hex = format!("0x{}", hex::encode(raw));
        self.call_required("eth_sendRawTransaction", [raw_hex]).await
    }

    async fn transaction_by_hash(&self, hash: B256) -> Result<Option<RpcTransaction>, RpcError> {
        self.call("eth_getTransactionByHash", [hash]).await
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<RpcReceipt>, RpcError> {
        self.call("eth_getTransactionReceipt", [hash]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    #[test]
    fn request_serializes_as_json_rpc() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "eth_getBalance",
            params: (
                address!("7e5f4552091a69125d5dfcb7b8c2659029395bdf"),
                "latest",
            ),
            id: 7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "eth_getBalance");
        assert_eq!(json["id"], 7);
        let params = json["params"].as_array().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(
            params[0].as_str().unwrap().to_lowercase(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
        assert_eq!(params[1], "latest");
    }

    #[test]
    fn unit_params_serialize_as_empty_array() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "eth_chainId",
            params: NO_PARAMS,
            id: 1,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["params"], serde_json::json!([]));
    }

    #[test]
    fn decodes_hex_quantity_result() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":"0xaa36a7"}"#;
        let value: Option<U256> = decode_response(body).unwrap();
        assert_eq!(value, Some(U256::from(11_155_111u64)));
    }

    #[test]
    fn null_result_is_none() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        let value: Option<RpcTransaction> = decode_response(body).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn error_object_becomes_rpc_error() {
        let body = br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"nonce too low"}}"#;
        let err = decode_response::<B256>(body).unwrap_err();
        match err {
            RpcError::Rpc { code, message } => {
                assert_eq!(code, -32000);
                assert_eq!(message, "nonce too low");
            }
            other => panic!("expected Rpc error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_body_is_parse_error() {
        assert!(matches!(
            decode_response::<U256>(b"<html>502</html>"),
            Err(RpcError::Parse(_))
        ));
    }

    #[test]
    fn decodes_transaction_object() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":{
            "hash":"0x33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788",
            "from":"0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f",
            "to":"0x3535353535353535353535353535353535353535",
            "value":"0xde0b6b3a7640000",
            "gasPrice":"0x4a817c800",
            "gas":"0x5208",
            "nonce":"0x9",
            "blockNumber":null,
            "input":"0x",
            "v":"0x25"
        }}"#;
        let tx: RpcTransaction = decode_response(body).unwrap().unwrap();
        assert_eq!(
            tx.hash,
            b256!("33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788")
        );
        assert_eq!(tx.value, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(tx.gas_price, Some(U256::from(20_000_000_000u64)));
        assert_eq!(tx.gas, U64::from(21_000));
        assert_eq!(tx.nonce, U64::from(9));
        assert!(tx.block_number.is_none());
    }

    #[test]
    fn decodes_receipt_status() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":{
            "transactionHash":"0x33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788",
            "blockNumber":"0x10",
            "gasUsed":"0x5208",
            "status":"0x1",
            "logs":[]
        }}"#;
        let receipt: RpcReceipt = decode_response(body).unwrap().unwrap();
        assert!(receipt.succeeded());
        assert_eq!(receipt.block_number, U64::from(16));

        let failed = RpcReceipt {
            status: Some(U64::ZERO),
            ..receipt
        };
        assert!(!failed.succeeded());
    }

    #[test]
    fn quantity_overflow_is_reported() {
        assert!(quantity_to_u64("eth_chainId", U256::MAX).is_err());
        assert_eq!(quantity_to_u64("eth_chainId", U256::from(5u64)).unwrap(), 5);
    }
}
