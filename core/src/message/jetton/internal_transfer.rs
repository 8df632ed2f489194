use num_bigint::BigUint;

use super::JETTON_INTERNAL_TRANSFER;
use crate::cell::{ArcCell, Cell, CellBuilder};
use crate::message::{HasOpcode, TonMessage, TonMessageError};
use crate::TonAddress;

/// Creates a body for jetton internal transfer according to TL-B schema:
///
/// ```raw
/// internal_transfer#178d4519 query_id:uint64 amount:(VarUInteger 16) from:MsgAddress
///                            response_address:MsgAddress forward_ton_amount:(VarUInteger 16)
///                            forward_payload:(Either Cell ^Cell)
///                            = InternalMsgBody;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct JettonInternalTransferMessage {
    pub query_id: u64,
    /// amount of jettons credited to the receiving jetton wallet.
    pub amount: BigUint,
    pub from_address: TonAddress,
    /// receives the excess TON once the transfer settles.
    pub response_address: TonAddress,
    pub forward_ton_amount: BigUint,
    pub forward_payload: Option<ArcCell>,
}

impl JettonInternalTransferMessage {
    pub fn new(amount: &BigUint, from_address: &TonAddress) -> Self {
        JettonInternalTransferMessage {
            query_id: 0,
            amount: amount.clone(),
            from_address: from_address.clone(),
            response_address: TonAddress::null(),
            forward_ton_amount: BigUint::default(),
            forward_payload: None,
        }
    }

    pub fn with_response_address(&mut self, response_address: &TonAddress) -> &mut Self {
        self.response_address = response_address.clone();
        self
    }
}

impl TonMessage for JettonInternalTransferMessage {
    fn build(&self) -> Result<Cell, TonMessageError> {
        let mut message = CellBuilder::new();
        message.store_u32(32, Self::opcode())?;
        message.store_u64(64, self.query_id)?;
        message.store_coins(&self.amount)?;
        message.store_address(&self.from_address)?;
        message.store_address(&self.response_address)?;
        message.store_coins(&self.forward_ton_amount)?;
        message.store_maybe_cell_ref(&self.forward_payload)?;
        Ok(message.build()?)
    }

    fn parse(cell: &Cell) -> Result<Self, TonMessageError> {
        let mut parser = cell.parser();

        let opcode: u32 = parser.load_u32(32)?;
        let query_id = parser.load_u64(64)?;
        let amount = parser.load_coins()?;
        let from_address = parser.load_address()?;
        let response_address = parser.load_address()?;
        let forward_ton_amount = parser.load_coins()?;
        let forward_payload = parser.load_maybe_cell_ref()?;
        parser.ensure_empty()?;

        let result = JettonInternalTransferMessage {
            query_id,
            amount,
            from_address,
            response_address,
            forward_ton_amount,
            forward_payload,
        };
        result.verify_opcode(opcode)?;
        Ok(result)
    }
}

impl HasOpcode for JettonInternalTransferMessage {
    fn opcode() -> u32 {
        JETTON_INTERNAL_TRANSFER
    }

    fn set_query_id(&mut self, query_id: u64) {
        self.query_id = query_id;
    }

    fn query_id(&self) -> u64 {
        self.query_id
    }
}
