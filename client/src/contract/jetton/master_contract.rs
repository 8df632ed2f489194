use async_trait::async_trait;
use jetton_core::cell::ArcCell;
use jetton_core::jetton::{JettonContent, JettonError};
use jetton_core::TonAddress;
use num_bigint::BigUint;

use crate::contract::{MapStackError, TonContractError, TonContractInterface};

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct JettonData {
    pub total_supply: BigUint,
    pub mintable: bool,
    pub admin_address: TonAddress,
    pub content: ArcCell,
    pub wallet_code: ArcCell,
}

impl JettonData {
    pub fn parse_content(&self) -> Result<JettonContent, JettonError> {
        JettonContent::from_cell(&self.content)
    }
}

#[async_trait]
pub trait JettonMasterContract: TonContractInterface {
    async fn get_jetton_data(&self) -> Result<JettonData, TonContractError> {
        const JETTON_DATA_STACK_ELEMENTS: usize = 5;
        let method_name = "get_jetton_data";
        let address = self.address().clone();

        let res = self.run_get_method(method_name, Vec::new()).await?;

        let stack = res.stack;
        if stack.len() == JETTON_DATA_STACK_ELEMENTS {
            let total_supply = stack[0].get_biguint().map_stack_error(method_name, &address)?;
            let mintable = stack[1].get_bool().map_stack_error(method_name, &address)?;
            let admin_address = stack[2].get_address().map_stack_error(method_name, &address)?;
            let content = stack[3].get_cell().map_stack_error(method_name, &address)?;
            let wallet_code = stack[4].get_cell().map_stack_error(method_name, &address)?;

            Ok(JettonData {
                total_supply,
                mintable,
                admin_address,
                content,
                wallet_code,
            })
        } else {
            Err(TonContractError::InvalidMethodResultStackSize {
                method: method_name.to_string(),
                address,
                actual: stack.len(),
                expected: JETTON_DATA_STACK_ELEMENTS,
            })
        }
    }
}

impl<T> JettonMasterContract for T where T: TonContractInterface {}
