use num_bigint::BigUint;

use super::{JettonInternalTransferMessage, JETTON_MINT};
use crate::cell::{Cell, CellBuilder};
use crate::message::{HasOpcode, TonMessage, TonMessageError};
use crate::TonAddress;

/// Body of a `mint` request to the reference jetton minter:
///
/// ```raw
/// mint#00000015 query_id:uint64 to_address:MsgAddress amount:Coins
///               master_msg:^InternalTransfer = InternalMsgBody;
/// ```
///
/// `amount` is the TON forwarded to the receiver's jetton wallet; the jetton amount
/// lives in `master_msg`.
#[derive(Clone, Debug, PartialEq)]
pub struct JettonMintMessage {
    pub query_id: u64,
    pub to_address: TonAddress,
    pub amount: BigUint,
    pub master_msg: JettonInternalTransferMessage,
}

impl JettonMintMessage {
    pub fn new(
        to_address: &TonAddress,
        amount: &BigUint,
        master_msg: JettonInternalTransferMessage,
    ) -> Self {
        JettonMintMessage {
            query_id: 0,
            to_address: to_address.clone(),
            amount: amount.clone(),
            master_msg,
        }
    }
}

impl TonMessage for JettonMintMessage {
    fn build(&self) -> Result<Cell, TonMessageError> {
        let mut message = CellBuilder::new();
        message.store_u32(32, Self::opcode())?;
        message.store_u64(64, self.query_id)?;
        message.store_address(&self.to_address)?;
        message.store_coins(&self.amount)?;
        message.store_child(self.master_msg.build()?)?;
        Ok(message.build()?)
    }

    fn parse(cell: &Cell) -> Result<Self, TonMessageError> {
        let mut parser = cell.parser();

        let opcode: u32 = parser.load_u32(32)?;
        let query_id = parser.load_u64(64)?;
        let to_address = parser.load_address()?;
        let amount = parser.load_coins()?;
        let master_msg = JettonInternalTransferMessage::parse(parser.next_reference()?.as_ref())?;
        parser.ensure_empty()?;

        let result = JettonMintMessage {
            query_id,
            to_address,
            amount,
            master_msg,
        };
        result.verify_opcode(opcode)?;
        Ok(result)
    }
}

impl HasOpcode for JettonMintMessage {
    fn opcode() -> u32 {
        JETTON_MINT
    }

    fn set_query_id(&mut self, query_id: u64) {
        self.query_id = query_id;
    }

    fn query_id(&self) -> u64 {
        self.query_id
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use num_bigint::BigUint;

    use crate::message::{
        HasOpcode, JettonInternalTransferMessage, JettonMintMessage, TonMessage,
        JETTON_INTERNAL_TRANSFER,
    };
    use crate::TonAddress;

    #[test]
    fn mint_layout() -> anyhow::Result<()> {
        let owner = TonAddress::from_str("EQCDM_QGggZ3qMa_f3lRPk4_qLDnLTqdi6OkMAV2NB9r5TG3")?;
        let mut transfer =
            JettonInternalTransferMessage::new(&BigUint::from(1_000_000_000_000u64), &owner);
        transfer.with_response_address(&owner).with_query_id(5);
        let mint = JettonMintMessage::new(&owner, &BigUint::from(20_000_000u64), transfer)
            .with_query_id(5)
            .clone();

        let cell = mint.build()?;
        // op + query_id + addr_std + coins(4 bytes)
        assert_eq!(cell.bit_len(), 32 + 64 + 267 + 4 + 32);
        assert_eq!(cell.references().len(), 1);

        let mut parser = cell.parser();
        assert_eq!(parser.load_u32(32)?, 21);
        let master = cell.reference(0)?;
        assert_eq!(master.parser().load_u32(32)?, JETTON_INTERNAL_TRANSFER);

        assert_eq!(JettonMintMessage::parse(&cell)?, mint);
        Ok(())
    }
}
