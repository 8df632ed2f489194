use crate::cell::{ArcCell, Cell, CellBuilder, CellParser, TonCellError};
use crate::TonAddress;

/// `StateInit` with code and data only: no split depth, no tick-tock, no libraries.
// https://github.com/ton-blockchain/ton/blob/59a8cf0ae5c3062d14ec4c89a04fee80b5fd05c1/crypto/block/block.tlb#L281
#[derive(Debug, Clone, PartialEq)]
pub struct StateInit {
    pub code: ArcCell,
    pub data: ArcCell,
}

impl StateInit {
    pub fn new(code: ArcCell, data: ArcCell) -> Self {
        StateInit { code, data }
    }

    pub fn to_cell(&self) -> Result<Cell, TonCellError> {
        CellBuilder::new()
            .store_bit(false)? // split_depth
            .store_bit(false)? // special
            .store_maybe_cell_ref(&Some(self.code.clone()))?
            .store_maybe_cell_ref(&Some(self.data.clone()))?
            .store_bit(false)? // library
            .build()
    }

    pub fn from_cell(cell: &Cell) -> Result<Self, TonCellError> {
        cell.parse_fully(Self::read)
    }

    /// Address of the contract deployed with this state in `workchain`.
    pub fn address(&self, workchain: i32) -> Result<TonAddress, TonCellError> {
        Ok(TonAddress::new(workchain, &self.to_cell()?.cell_hash()))
    }

    fn read(parser: &mut CellParser) -> Result<Self, TonCellError> {
        if parser.load_bit()? || parser.load_bit()? {
            return Err(TonCellError::cell_parser_error(
                "StateInit with split_depth or special is not supported",
            ));
        }
        let code = parser
            .load_maybe_cell_ref()?
            .ok_or_else(|| TonCellError::cell_parser_error("StateInit without code"))?;
        let data = parser
            .load_maybe_cell_ref()?
            .ok_or_else(|| TonCellError::cell_parser_error("StateInit without data"))?;
        if parser.load_bit()? {
            return Err(TonCellError::cell_parser_error(
                "StateInit with libraries is not supported",
            ));
        }
        Ok(StateInit { code, data })
    }
}

#[cfg(test)]
mod tests {
    use super::StateInit;
    use crate::cell::{BagOfCells, CellBuilder, TonCellError};

    // state_init of a v4r2 wallet with seqno 2095
    const WALLET_STATE_INIT_HEX: &str = "b5ee9c720102160100030400020134020100510000082f29a9a31738dd3a33f904d35e2f4f6f9af2d2f9c563c05faa6bb0b12648d5632083ea3f89400114ff00f4a413f4bcf2c80b03020120090404f8f28308d71820d31fd31fd31f02f823bbf264ed44d0d31fd31fd3fff404d15143baf2a15151baf2a205f901541064f910f2a3f80024a4c8cb1f5240cb1f5230cbff5210f400c9ed54f80f01d30721c0009f6c519320d74a96d307d402fb00e830e021c001e30021c002e30001c0039130e30d03a4c8cb1f12cb1fcbff08070605000af400c9ed54006c810108d718fa00d33f305224810108f459f2a782106473747270748018c8cb05cb025005cf165003fa0213cb6acb1f12cb3fc973fb000070810108d718fa00d33fc8542047810108f451f2a782106e6f746570748018c8cb05cb025006cf165004fa0214cb6a12cb1fcb3fc973fb0002006ed207fa00d4d422f90005c8ca0715cbffc9d077748018c8cb05cb0222cf165005fa0214cb6b12ccccc973fb00c84014810108f451f2a702020148130a0201200c0b0059bd242b6f6a2684080a06b90fa0218470d4080847a4937d29910ce6903e9ff9837812801b7810148987159f31840201200e0d0011b8c97ed44d0d70b1f8020158120f02012011100019af1df6a26840106b90eb858fc00019adce76a26840206b90eb85ffc0003db29dfb513420405035c87d010c00b23281f2fff274006040423d029be84c6002e6d001d0d3032171b0925f04e022d749c120925f04e002d31f218210706c7567bd22821064737472bdb0925f05e003fa403020fa4401c8ca07cbffc9d0ed44d0810140d721f404305c810108f40a6fa131b3925f07e005d33fc8258210706c7567ba923830e30d03821064737472ba925f06e30d1514008a5004810108f45930ed44d0810140d720c801cf16f400c9ed540172b08e23821064737472831eb17080185005cb055003cf1623fa0213cb6acb1fcb3fc98040fb00925f03e2007801fa00f40430f8276f2230500aa121bef2e0508210706c7567831eb17080185004cb0526cf1658fa0219f400cb6917cb1f5260cb3f20c98040fb0006";

    #[test]
    fn state_init_of_regular_wallet() -> Result<(), TonCellError> {
        let source_cell = BagOfCells::parse_hex(WALLET_STATE_INIT_HEX)?.single_root()?;
        assert_eq!(source_cell.bit_len(), 5);
        assert_eq!(
            hex::encode(source_cell.cell_hash()),
            "c4cf8686ee441630c13c2540b1da4bc140ce69d0b32c15d05b1ae2ed947d7f74"
        );

        let state_init = StateInit::from_cell(&source_cell)?;
        assert_eq!(
            hex::encode(state_init.code.cell_hash()),
            "feb5ff6820e2ff0d9483e7e0d62c817d846789fb4ae580c878866d959dabd5c0"
        );
        assert_eq!(state_init.data.bit_len(), 321);

        let rebuilt = StateInit::new(state_init.code.clone(), state_init.data.clone()).to_cell()?;
        assert_eq!(rebuilt.cell_hash(), source_cell.cell_hash());
        assert_eq!(
            hex::encode(state_init.address(0)?.hash_part),
            "c4cf8686ee441630c13c2540b1da4bc140ce69d0b32c15d05b1ae2ed947d7f74"
        );
        Ok(())
    }

    #[test]
    fn state_init_without_code_is_rejected() -> Result<(), TonCellError> {
        let cell = CellBuilder::new().store_u8(5, 0b00010)?.build()?;
        assert!(StateInit::from_cell(&cell).is_err());
        Ok(())
    }
}
