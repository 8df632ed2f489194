use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::{Display, EnumString, IntoStaticStr};

use crate::client::TonRpcError;
use crate::types::StackEntry;

pub const MAINNET_ENDPOINT: &str = "https://toncenter.com/api/v2/jsonRPC";
pub const TESTNET_ENDPOINT: &str = "https://testnet.toncenter.com/api/v2/jsonRPC";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct RetryStrategy {
    pub interval_ms: u64,
    pub max_retries: usize,
}

impl Default for RetryStrategy {
    fn default() -> Self {
        RetryStrategy {
            interval_ms: 1000,
            max_retries: 3,
        }
    }
}

/// State of an account as reported by `getAddressState`.
#[derive(Debug, Display, EnumString, IntoStaticStr, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Uninitialized,
    Frozen,
}

/// Toncenter JSON-RPC methods used by the deployer.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum TonFunction {
    #[strum(serialize = "getAddressBalance")]
    GetAddressBalance { address: String },
    #[strum(serialize = "getAddressState")]
    GetAddressState { address: String },
    #[strum(serialize = "runGetMethod")]
    RunGetMethod {
        address: String,
        method: String,
        stack: Vec<StackEntry>,
    },
    #[strum(serialize = "sendBocReturnHash")]
    SendBocReturnHash { boc: String },
}

impl TonFunction {
    pub fn method(&self) -> &'static str {
        self.into()
    }

    pub fn params(&self) -> Value {
        match self {
            TonFunction::GetAddressBalance { address } | TonFunction::GetAddressState { address } => {
                json!({ "address": address })
            }
            TonFunction::RunGetMethod {
                address,
                method,
                stack,
            } => {
                let stack: Vec<Value> = stack.iter().map(StackEntry::to_json).collect();
                json!({ "address": address, "method": method, "stack": stack })
            }
            TonFunction::SendBocReturnHash { boc } => json!({ "boc": boc }),
        }
    }

    /// Submissions are never repeated: a retried external message may be applied twice.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, TonFunction::SendBocReturnHash { .. })
    }
}

/// JSON-RPC 2.0 request envelope.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub id: u64,
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: u64, function: &TonFunction) -> Self {
        JsonRpcRequest {
            id,
            jsonrpc: "2.0",
            method: function.method(),
            params: function.params(),
        }
    }
}

/// Toncenter response: `{ok, result}` on success, `{ok, error, code}` otherwise.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TonCenterResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<i32>,
}

/// Turns a raw HTTP response into the `result` payload.
pub fn decode_response(method: &'static str, status: u16, body: &str) -> Result<Value, TonRpcError> {
    let response: TonCenterResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(_) if !(200..300).contains(&status) => {
            return Err(TonRpcError::HttpStatus { method, status })
        }
        Err(e) => return Err(TonRpcError::invalid_response(method, e)),
    };
    if !response.ok {
        return Err(TonRpcError::ApiError {
            method,
            code: response.code.unwrap_or(status as i32),
            message: response.error.unwrap_or_default(),
        });
    }
    if !(200..300).contains(&status) {
        return Err(TonRpcError::HttpStatus { method, status });
    }
    response
        .result
        .ok_or_else(|| TonRpcError::invalid_response(method, "missing result"))
}

/// Transport failures, rate limiting and server-side errors are worth another attempt.
pub(crate) fn retry_condition(error: &TonRpcError) -> bool {
    match error {
        TonRpcError::Transport { .. } => true,
        e => e.code().is_some_and(|code| code == 429 || (500..600).contains(&code)),
    }
}
