use std::str::FromStr;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jetton_core::TonAddress;
use num_bigint::BigUint;
use serde_json::Value;

use crate::client::{AccountStatus, TonFunction, TonRpcError};
use crate::types::{RunGetMethodResult, StackEntry};

/// Toncenter API surface used by contracts and the deployer.
///
/// Implementors provide [`invoke`](TonRpcInterface::invoke); the typed calls decode its result.
#[async_trait]
pub trait TonRpcInterface: Send + Sync {
    async fn invoke(&self, function: &TonFunction) -> Result<Value, TonRpcError>;

    async fn get_balance(&self, address: &TonAddress) -> Result<BigUint, TonRpcError> {
        let func = TonFunction::GetAddressBalance {
            address: address.to_base64_url(),
        };
        let method = func.method();
        let result = self.invoke(&func).await?;
        let balance = match &result {
            Value::String(s) => BigUint::from_str(s).ok(),
            Value::Number(n) => n.as_u64().map(BigUint::from),
            _ => None,
        };
        balance.ok_or_else(|| TonRpcError::invalid_response(method, format!("balance: {result}")))
    }

    async fn get_account_status(&self, address: &TonAddress) -> Result<AccountStatus, TonRpcError> {
        let func = TonFunction::GetAddressState {
            address: address.to_base64_url(),
        };
        let method = func.method();
        let result = self.invoke(&func).await?;
        result
            .as_str()
            .and_then(|s| AccountStatus::from_str(s).ok())
            .ok_or_else(|| TonRpcError::invalid_response(method, format!("state: {result}")))
    }

    async fn run_get_method(
        &self,
        address: &TonAddress,
        method: &str,
        stack: Vec<StackEntry>,
    ) -> Result<RunGetMethodResult, TonRpcError> {
        let func = TonFunction::RunGetMethod {
            address: address.to_base64_url(),
            method: method.to_string(),
            stack,
        };
        let result = self.invoke(&func).await?;
        RunGetMethodResult::from_json(result)
            .map_err(|e| TonRpcError::invalid_response(func.method(), e))
    }

    /// Submits a serialized external message, returning its hash.
    async fn send_boc_return_hash(&self, boc: &[u8]) -> Result<String, TonRpcError> {
        let func = TonFunction::SendBocReturnHash {
            boc: STANDARD.encode(boc),
        };
        let method = func.method();
        let result = self.invoke(&func).await?;
        result
            .get("hash")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| TonRpcError::invalid_response(method, format!("no hash in {result}")))
    }
}
