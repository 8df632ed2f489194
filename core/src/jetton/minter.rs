use num_bigint::BigUint;

use crate::cell::{ArcCell, Cell, CellBuilder, StateInit};
use crate::jetton::{JettonContent, JettonError};
use crate::message::{HasOpcode, JettonInternalTransferMessage, JettonMintMessage, TonMessage};
use crate::TonAddress;

/// Compiled code of the jetton minter and of the per-holder jetton wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct JettonMinterCode {
    pub minter: ArcCell,
    pub wallet: ArcCell,
}

/// Jettons minted to the owner in the deployment message itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Premint {
    /// Jetton amount in the smallest units.
    pub amount: BigUint,
    /// TON forwarded to deploy the owner's jetton wallet.
    pub forward_value: BigUint,
    pub query_id: u64,
}

/// Deployment descriptor of a TEP-74 reference jetton minter.
///
/// The address is the hash of `StateInit{code, data}` and is known before deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct JettonMinter {
    pub owner: TonAddress,
    pub admin: TonAddress,
    pub content: JettonContent,
    pub code: JettonMinterCode,
    pub state_init: StateInit,
    pub address: TonAddress,
}

impl JettonMinter {
    pub fn new(
        owner: &TonAddress,
        content: JettonContent,
        admin: &TonAddress,
        code: &JettonMinterCode,
    ) -> Result<Self, JettonError> {
        Self::new_with_workchain(owner, content, admin, code, owner.workchain)
    }

    pub fn new_with_workchain(
        owner: &TonAddress,
        content: JettonContent,
        admin: &TonAddress,
        code: &JettonMinterCode,
        workchain: i32,
    ) -> Result<Self, JettonError> {
        let data = build_minter_data(admin, &content, &code.wallet)?.to_arc();
        let state_init = StateInit::new(code.minter.clone(), data);
        let address = state_init.address(workchain)?;
        Ok(JettonMinter {
            owner: owner.clone(),
            admin: admin.clone(),
            content,
            code: code.clone(),
            state_init,
            address,
        })
    }

    pub fn state_init_cell(&self) -> Result<Cell, JettonError> {
        Ok(self.state_init.to_cell()?)
    }

    /// Body of the deployment message: empty, or a `mint` to the owner when `premint` is set.
    pub fn build_deploy_body(&self, premint: Option<&Premint>) -> Result<Cell, JettonError> {
        match premint {
            None => Ok(CellBuilder::new().build()?),
            Some(premint) => {
                let mut master_msg =
                    JettonInternalTransferMessage::new(&premint.amount, &self.address);
                master_msg
                    .with_response_address(&self.owner)
                    .with_query_id(premint.query_id);
                let mut mint =
                    JettonMintMessage::new(&self.owner, &premint.forward_value, master_msg);
                mint.with_query_id(premint.query_id);
                Ok(mint.build()?)
            }
        }
    }
}

/// `total_supply:Coins admin_address:MsgAddress content:^Cell jetton_wallet_code:^Cell`
fn build_minter_data(
    admin: &TonAddress,
    content: &JettonContent,
    wallet_code: &ArcCell,
) -> Result<Cell, JettonError> {
    let mut builder = CellBuilder::new();
    builder
        .store_coins(&BigUint::default())?
        .store_address(admin)?
        .store_child(content.to_cell()?)?
        .store_reference(wallet_code)?;
    Ok(builder.build()?)
}
