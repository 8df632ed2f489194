use std::sync::Arc;

use super::{
    CommonMsgInfo, ExternalIncomingMessage, InternalMessage, TonMessage, TonMessageError,
};
use crate::cell::{ArcCell, Cell, CellBuilder, TonCellError};

/// Internal or inbound external message with optional `StateInit` and body.
///
/// Both `StateInit` and body are always stored as references.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferMessage {
    pub common_msg_info: CommonMsgInfo,
    pub state_init: Option<ArcCell>,
    pub data: Option<ArcCell>,
}

impl TransferMessage {
    pub fn new(common_msg_info: CommonMsgInfo) -> Self {
        TransferMessage {
            common_msg_info,
            state_init: None,
            data: None,
        }
    }

    pub fn with_state_init(&mut self, state_init: Cell) -> &mut Self {
        self.with_state_init_ref(&Arc::new(state_init))
    }

    pub fn with_state_init_ref(&mut self, state_init: &ArcCell) -> &mut Self {
        self.state_init = Some(state_init.clone());
        self
    }

    pub fn with_data(&mut self, data: ArcCell) -> &mut Self {
        self.data = Some(data);
        self
    }
}

impl TonMessage for TransferMessage {
    fn build(&self) -> Result<Cell, TonMessageError> {
        let mut builder = CellBuilder::new();

        match &self.common_msg_info {
            CommonMsgInfo::InternalMessage(m) => {
                builder.store_bit(false)?; // int_msg_info$0
                builder.store_bit(m.ihr_disabled)?;
                builder.store_bit(m.bounce)?;
                builder.store_bit(m.bounced)?;
                builder.store_address(&m.src)?;
                builder.store_address(&m.dest)?;
                builder.store_coins(&m.value)?;
                builder.store_bit(false)?; // extra currencies
                builder.store_coins(&m.ihr_fee)?;
                builder.store_coins(&m.fwd_fee)?;
                builder.store_u64(64, m.created_lt)?;
                builder.store_u32(32, m.created_at)?;
            }
            CommonMsgInfo::ExternalIncomingMessage(m) => {
                builder.store_u8(2, 0b10)?; // ext_in_msg_info$10
                builder.store_address(&m.src)?;
                builder.store_address(&m.dest)?;
                builder.store_coins(&m.import_fee)?;
            }
        }

        // init:(Maybe (Either StateInit ^StateInit))
        match &self.state_init {
            Some(state_init) => {
                builder.store_bit(true)?;
                builder.store_bit(true)?;
                builder.store_reference(state_init)?;
            }
            None => {
                builder.store_bit(false)?;
            }
        }

        // body:(Either X ^X), an absent body is an empty inline one
        builder.store_maybe_cell_ref(&self.data)?;

        Ok(builder.build()?)
    }

    fn parse(cell: &Cell) -> Result<Self, TonMessageError> {
        let mut parser = cell.parser();
        let is_external = parser.load_bit()?;

        let common_msg_info = if !is_external {
            let ihr_disabled = parser.load_bit()?;
            let bounce = parser.load_bit()?;
            let bounced = parser.load_bit()?;
            let src = parser.load_address()?;
            let dest = parser.load_address()?;
            let value = parser.load_coins()?;
            if parser.load_bit()? {
                return Err(TonCellError::cell_parser_error(
                    "Extra currencies are not supported",
                ).into());
            }
            let ihr_fee = parser.load_coins()?;
            let fwd_fee = parser.load_coins()?;
            let created_lt = parser.load_u64(64)?;
            let created_at = parser.load_u32(32)?;

            CommonMsgInfo::InternalMessage(InternalMessage {
                ihr_disabled,
                bounce,
                bounced,
                src,
                dest,
                value,
                ihr_fee,
                fwd_fee,
                created_lt,
                created_at,
            })
        } else {
            if parser.load_bit()? {
                return Err(TonCellError::cell_parser_error(
                    "Outbound external messages are not supported",
                ).into());
            }
            let src = parser.load_address()?;
            let dest = parser.load_address()?;
            let import_fee = parser.load_coins()?;

            CommonMsgInfo::ExternalIncomingMessage(ExternalIncomingMessage {
                src,
                dest,
                import_fee,
            })
        };

        let state_init = if parser.load_bit()? {
            if !parser.load_bit()? {
                return Err(TonCellError::cell_parser_error(
                    "Inline StateInit is not supported",
                ).into());
            }
            Some(parser.next_reference()?)
        } else {
            None
        };
        let data = parser.load_maybe_cell_ref()?;

        parser.ensure_empty()?;

        Ok(TransferMessage {
            common_msg_info,
            state_init,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use num_bigint::BigUint;

    use crate::cell::{BagOfCells, CellBuilder};
    use crate::message::{CommonMsgInfo, TonMessage, TransferMessage};
    use crate::TonAddress;

    // wallet v4 external body carrying one plain 0.02 TON transfer
    const SIGNED_BODY_HEX: &str = "b5ee9c7201010201008700019c9dcd3a68926ad6fb9d094c5b72901bfc359ada50f22b648c6c2223c767135d397c7489c121071e45a5316a94a533d80c41450049ebeed406c419fea99117f40629a9a31767ad328900000013000301006842007847b4630eb08d9f486fe846d5496878556dfd5a084f82a9a3fb01224e67c84c200989680000000000000000000000000000";

    #[test]
    fn internal_message_matches_chain_data() -> anyhow::Result<()> {
        let body = BagOfCells::parse_hex(SIGNED_BODY_HEX)?.single_root()?;
        let expected = body.reference(0)?;

        let dest = TonAddress::from_str(
            "0:f08f68c61d611b3e90dfd08daa92d0f0aadbfab4109f055347f602449ccf9098",
        )?;
        let msg = TransferMessage::new(CommonMsgInfo::new_internal(
            &dest,
            &BigUint::from(20_000_000u64),
            false,
        ))
        .build()?;
        assert_eq!(&msg, expected.as_ref());

        let parsed = TransferMessage::parse(expected)?;
        assert_eq!(parsed.common_msg_info.dest(), dest);
        assert_eq!(parsed.state_init, None);
        assert_eq!(parsed.data, None);
        Ok(())
    }

    #[test]
    fn state_init_and_body_are_references() -> anyhow::Result<()> {
        let dest = TonAddress::from_str(
            "0:f08f68c61d611b3e90dfd08daa92d0f0aadbfab4109f055347f602449ccf9098",
        )?;
        let state_init = CellBuilder::new().store_u8(5, 0b00110)?.build()?;
        let body = CellBuilder::new().store_u32(32, 21)?.build()?.to_arc();

        let cell = TransferMessage::new(CommonMsgInfo::new_external_in(&dest))
            .with_state_init(state_init.clone())
            .with_data(body.clone())
            .build()?;
        assert_eq!(cell.references().len(), 2);

        let parsed = TransferMessage::parse(&cell)?;
        assert_eq!(parsed.common_msg_info, CommonMsgInfo::new_external_in(&dest));
        assert_eq!(parsed.common_msg_info.src(), TonAddress::NULL);
        assert_eq!(parsed.state_init.as_deref(), Some(&state_init));
        assert_eq!(parsed.data, Some(body));
        Ok(())
    }
}
