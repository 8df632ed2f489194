use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::cell::raw::RawBagOfCells;
use crate::cell::raw_boc_from_boc::convert_to_raw_boc;
use crate::cell::{ArcCell, Cell, MapTonCellError, TonCellError};

#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub struct BagOfCells {
    pub roots: Vec<ArcCell>,
}

impl BagOfCells {
    pub fn new(roots: &[ArcCell]) -> BagOfCells {
        BagOfCells {
            roots: roots.to_vec(),
        }
    }

    pub fn from_root(root: Cell) -> BagOfCells {
        let arc = Arc::new(root);
        BagOfCells { roots: vec![arc] }
    }

    pub fn num_roots(&self) -> usize {
        self.roots.len()
    }

    pub fn single_root(mut self) -> Result<ArcCell, TonCellError> {
        let roots_count = self.roots.len();
        match self.roots.pop() {
            Some(root) if roots_count == 1 => Ok(root),
            _ => Err(TonCellError::CellParserError(format!(
                "Single root expected, got {roots_count}"
            ))),
        }
    }

    pub fn parse(serial: &[u8]) -> Result<BagOfCells, TonCellError> {
        let raw = RawBagOfCells::parse(serial)?;
        let num_cells = raw.cells.len();
        let mut cells: Vec<ArcCell> = Vec::with_capacity(num_cells);

        // references always point forward, so build from the tail
        for raw_cell in raw.cells.into_iter().rev() {
            let references = raw_cell
                .references
                .iter()
                .map(|ref_index| cells[num_cells - 1 - ref_index].clone())
                .collect();
            let cell = Cell::new(raw_cell.data, raw_cell.bit_len, references)
                .map_boc_deserialization_error()?;
            cells.push(cell.to_arc());
        }

        let roots = raw
            .roots
            .into_iter()
            .map(|r| &cells[num_cells - 1 - r])
            .map(Arc::clone)
            .collect();

        Ok(BagOfCells { roots })
    }

    pub fn parse_hex(hex: &str) -> Result<BagOfCells, TonCellError> {
        let str: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
        let bin = hex::decode(str.as_str()).map_boc_deserialization_error()?;
        Self::parse(&bin)
    }

    pub fn parse_base64(base64: &str) -> Result<BagOfCells, TonCellError> {
        let str: String = base64.chars().filter(|c| !c.is_whitespace()).collect();
        let bin = STANDARD.decode(str.as_str()).map_boc_deserialization_error()?;
        Self::parse(&bin)
    }

    pub fn serialize(&self, has_crc32: bool) -> Result<Vec<u8>, TonCellError> {
        let raw = convert_to_raw_boc(self)?;
        raw.serialize(has_crc32)
    }

    pub fn to_base64(&self, has_crc32: bool) -> Result<String, TonCellError> {
        Ok(STANDARD.encode(self.serialize(has_crc32)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::{BagOfCells, Cell, CellBuilder, TonCellError};

    #[test]
    fn serialize_empty_cell_with_crc() -> Result<(), TonCellError> {
        let boc = BagOfCells::from_root(Cell::default());
        assert_eq!(
            hex::encode(boc.serialize(true)?),
            "b5ee9c724101010100020000004cacb9cd"
        );
        assert_eq!(boc.to_base64(true)?, "te6cckEBAQEAAgAAAEysuc0=");
        Ok(())
    }

    #[test]
    fn serialize_single_cell() -> Result<(), TonCellError> {
        let cell = CellBuilder::new().store_u32(32, 0xdeadbeef)?.build()?;
        let serial = cell.to_boc(false)?;
        assert_eq!(hex::encode(&serial), "b5ee9c72010101010006000008deadbeef");
        let parsed = BagOfCells::parse(&serial)?.single_root()?;
        assert_eq!(parsed.as_ref(), &cell);
        Ok(())
    }

    #[test]
    fn shared_cells_are_stored_once() -> Result<(), TonCellError> {
        let shared = CellBuilder::new().store_u8(8, 0xAA)?.build()?.to_arc();
        let left = CellBuilder::new().store_reference(&shared)?.store_bit(true)?.build()?;
        let root = CellBuilder::new()
            .store_child(left)?
            .store_reference(&shared)?
            .build()?;

        let serial = root.to_boc(true)?;
        // header: magic, flags, off_bytes, then cell count
        assert_eq!(serial[6], 3);
        let parsed = BagOfCells::parse(&serial)?.single_root()?;
        assert_eq!(parsed.cell_hash(), root.cell_hash());
        Ok(())
    }

    #[test]
    fn crc_mismatch_is_rejected() -> Result<(), TonCellError> {
        let mut serial = Cell::default().to_boc(true)?;
        let last = serial.len() - 1;
        serial[last] ^= 0xff;
        assert!(BagOfCells::parse(&serial).is_err());
        Ok(())
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(BagOfCells::parse(&[0xde, 0xad]).is_err());
        assert!(BagOfCells::parse_hex("b5ee9c7201").is_err());
        assert!(BagOfCells::parse_base64("not base64!").is_err());
    }

    #[test]
    fn multiple_roots_are_not_a_single_root() -> Result<(), TonCellError> {
        let a = CellBuilder::new().store_bit(true)?.build()?.to_arc();
        let b = CellBuilder::new().store_bit(false)?.build()?.to_arc();
        assert!(BagOfCells::new(&[a, b]).single_root().is_err());
        Ok(())
    }
}
