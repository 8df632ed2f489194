use async_trait::async_trait;
use jetton_core::cell::Cell;
use strum::IntoStaticStr;

use crate::contract::{MapCellError, MapStackError, TonContractError, TonContractInterface};

#[derive(IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum WalletContractMethods {
    Seqno,
}

#[async_trait]
pub trait TonWalletContract: TonContractInterface {
    async fn seqno(&self) -> Result<u32, TonContractError> {
        let method: &str = WalletContractMethods::Seqno.into();
        let res = self.run_get_method(method, Vec::new()).await?;
        let stack = res.stack;
        if stack.len() != 1 {
            Err(TonContractError::InvalidMethodResultStackSize {
                method: method.to_string(),
                address: self.address().clone(),
                actual: stack.len(),
                expected: 1,
            })
        } else {
            let seqno = stack[0].get_i64().map_stack_error(method, self.address())?;
            u32::try_from(seqno).map_err(|_| TonContractError::UnexpectedValue {
                method: method.to_string(),
                address: self.address().clone(),
                message: format!("seqno {seqno} is out of range"),
            })
        }
    }

    /// Broadcasts a signed external message addressed to this wallet and returns its hash.
    async fn send_external_message(&self, message: &Cell) -> Result<String, TonContractError> {
        let boc = message
            .to_boc(true)
            .map_cell_error("sendBocReturnHash", self.address())?;
        Ok(self.client().send_boc_return_hash(&boc).await?)
    }
}

impl<T> TonWalletContract for T where T: TonContractInterface {}
