use async_trait::async_trait;
use jetton_core::TonAddress;
use num_bigint::BigUint;

use super::TonContractError;
use crate::client::{AccountStatus, TonRpcInterface};
use crate::types::{RunGetMethodResult, StackEntry};

#[async_trait]
pub trait TonContractInterface: Send + Sync {
    fn client(&self) -> &dyn TonRpcInterface;

    fn address(&self) -> &TonAddress;

    async fn get_balance(&self) -> Result<BigUint, TonContractError> {
        Ok(self.client().get_balance(self.address()).await?)
    }

    async fn get_account_status(&self) -> Result<AccountStatus, TonContractError> {
        Ok(self.client().get_account_status(self.address()).await?)
    }

    /// Runs a get-method; exit codes other than 0 and 1 are errors.
    async fn run_get_method(
        &self,
        method: &str,
        stack: Vec<StackEntry>,
    ) -> Result<RunGetMethodResult, TonContractError> {
        let result = self
            .client()
            .run_get_method(self.address(), method, stack)
            .await?;
        if result.exit_code == 0 || result.exit_code == 1 {
            Ok(result)
        } else {
            Err(TonContractError::TvmRunError {
                method: method.to_string(),
                address: self.address().clone(),
                exit_code: result.exit_code,
                gas_used: result.gas_used,
            })
        }
    }
}
