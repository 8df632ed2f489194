use crate::cell::{ArcCell, Cell, CellBuilder, CellParser, TonCellError};
use crate::types::{TonHash, ZERO_HASH};

/// Persistent data of a v4r2 wallet.
#[derive(Debug, PartialEq, Clone)]
pub struct WalletDataV4 {
    pub seqno: u32,
    pub wallet_id: i32,
    pub public_key: TonHash,
    pub plugins: Option<ArcCell>,
}

/// https://docs.ton.org/participate/wallets/contracts#wallet-v4
/// signature is not considered as part of msg body
#[derive(Debug, PartialEq, Clone)]
pub struct WalletExtMsgBodyV4 {
    pub subwallet_id: i32,
    pub valid_until: u32,
    pub msg_seqno: u32,
    pub opcode: u8,
    pub msgs_modes: Vec<u8>,
    pub msgs: Vec<ArcCell>,
}

impl WalletDataV4 {
    pub fn new(wallet_id: i32, public_key: TonHash) -> Self {
        Self {
            seqno: 0,
            wallet_id,
            public_key,
            plugins: None,
        }
    }

    pub fn to_cell(&self) -> Result<Cell, TonCellError> {
        CellBuilder::new()
            .store_u32(32, self.seqno)?
            .store_i32(32, self.wallet_id)?
            .store_slice(&self.public_key)?
            .store_maybe_cell_ref(&self.plugins)?
            .build()
    }

    pub fn from_cell(cell: &Cell) -> Result<Self, TonCellError> {
        cell.parse_fully(|parser| {
            let seqno = parser.load_u32(32)?;
            let wallet_id = parser.load_i32(32)?;
            let mut public_key = ZERO_HASH;
            parser.load_slice(&mut public_key)?;
            let plugins = parser.load_maybe_cell_ref()?;
            Ok(Self {
                seqno,
                wallet_id,
                public_key,
                plugins,
            })
        })
    }
}

impl WalletExtMsgBodyV4 {
    pub fn to_cell(&self) -> Result<Cell, TonCellError> {
        if self.opcode != 0 {
            return Err(TonCellError::cell_builder_error(format!(
                "Unsupported opcode: {}",
                self.opcode
            )));
        }
        if self.msgs.len() != self.msgs_modes.len() || self.msgs.len() > 4 {
            return Err(TonCellError::cell_builder_error(format!(
                "Expected up to 4 messages with a mode each, got {} messages and {} modes",
                self.msgs.len(),
                self.msgs_modes.len()
            )));
        }
        let mut builder = CellBuilder::new();
        builder
            .store_i32(32, self.subwallet_id)?
            .store_u32(32, self.valid_until)?
            .store_u32(32, self.msg_seqno)?
            .store_u8(8, self.opcode)?;
        for (msg, mode) in self.msgs.iter().zip(self.msgs_modes.iter()) {
            builder.store_u8(8, *mode)?;
            builder.store_reference(msg)?;
        }
        builder.build()
    }

    pub fn from_cell(cell: &Cell) -> Result<Self, TonCellError> {
        cell.parse_fully(Self::read)
    }

    fn read(parser: &mut CellParser) -> Result<Self, TonCellError> {
        let subwallet_id = parser.load_i32(32)?;
        let valid_until = parser.load_u32(32)?;
        let msg_seqno = parser.load_u32(32)?;
        let opcode = parser.load_u8(8)?;
        if opcode != 0 {
            return Err(TonCellError::cell_parser_error(format!(
                "Unsupported opcode: {opcode}"
            )));
        }

        let msgs_cnt = parser.remaining_refs();
        let mut msgs_modes = Vec::with_capacity(msgs_cnt);
        let mut msgs = Vec::with_capacity(msgs_cnt);
        for _ in 0..msgs_cnt {
            msgs_modes.push(parser.load_u8(8)?);
            msgs.push(parser.next_reference()?);
        }
        Ok(Self {
            subwallet_id,
            valid_until,
            msg_seqno,
            opcode,
            msgs_modes,
            msgs,
        })
    }
}
