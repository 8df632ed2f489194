use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

pub use bag_of_cells::*;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
pub use builder::*;
pub use error::*;
use lazy_static::lazy_static;
pub use parser::*;
use sha2::{Digest, Sha256};
pub use state_init::*;

use crate::TonHash;

mod bag_of_cells;
mod builder;
mod error;
mod parser;
mod raw;
mod raw_boc_from_boc;
mod state_init;

pub type ArcCell = Arc<Cell>;

lazy_static! {
    pub static ref EMPTY_ARC_CELL: ArcCell = Arc::new(Cell::default());
}

/// Ordinary (non-exotic) cell: up to 1023 data bits and up to 4 references.
///
/// Representation hash and depth are computed once on construction.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<ArcCell>,
    hash: TonHash,
    depth: u16,
}

impl Cell {
    pub fn new(
        data: Vec<u8>,
        bit_len: usize,
        references: Vec<ArcCell>,
    ) -> Result<Self, TonCellError> {
        if bit_len > MAX_CELL_BITS {
            return Err(TonCellError::InvalidCellData(format!(
                "Cell data length should not contain more than {MAX_CELL_BITS} bits, got {bit_len}"
            )));
        }
        if references.len() > MAX_CELL_REFERENCES {
            return Err(TonCellError::InvalidCellData(format!(
                "Cell should not contain more than {MAX_CELL_REFERENCES} references, got {}",
                references.len()
            )));
        }
        if data.len() != bit_len.div_ceil(8) {
            return Err(TonCellError::InvalidCellData(format!(
                "Data length {} doesn't match bit length {bit_len}",
                data.len()
            )));
        }

        let (hash, depth) = calculate_hash_and_depth(&data, bit_len, &references);
        Ok(Self {
            data,
            bit_len,
            references,
            hash,
            depth,
        })
    }

    pub fn parser(&self) -> CellParser {
        CellParser::new(self.bit_len, &self.data, &self.references)
    }

    pub fn parse_fully<F, T>(&self, parse: F) -> Result<T, TonCellError>
    where
        F: FnOnce(&mut CellParser) -> Result<T, TonCellError>,
    {
        let mut parser = self.parser();
        let res = parse(&mut parser)?;
        parser.ensure_empty()?;
        Ok(res)
    }

    pub fn reference(&self, idx: usize) -> Result<&ArcCell, TonCellError> {
        self.references.get(idx).ok_or(TonCellError::InvalidIndex {
            idx,
            ref_count: self.references.len(),
        })
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn references(&self) -> &[ArcCell] {
        self.references.as_slice()
    }

    pub fn cell_depth(&self) -> u16 {
        self.depth
    }

    pub fn cell_hash(&self) -> TonHash {
        self.hash
    }

    pub fn cell_hash_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.hash)
    }

    pub fn to_arc(self) -> ArcCell {
        Arc::new(self)
    }

    pub fn to_boc(&self, has_crc32: bool) -> Result<Vec<u8>, TonCellError> {
        BagOfCells::from_root(self.clone()).serialize(has_crc32)
    }

    pub fn to_boc_b64(&self, has_crc32: bool) -> Result<String, TonCellError> {
        BagOfCells::from_root(self.clone()).to_base64(has_crc32)
    }
}

impl Debug for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // trailing underscore marks an incomplete last byte
        let completion_tag = if self.bit_len % 8 != 0 { "_" } else { "" };
        writeln!(
            f,
            "Cell {{ data: [{}{}], bit_len: {}, references: [",
            hex::encode_upper(&self.data),
            completion_tag,
            self.bit_len,
        )?;
        for reference in &self.references {
            writeln!(
                f,
                "    {}",
                format!("{:?}", reference).replace('\n', "\n    ")
            )?;
        }
        write!(f, "] }}")
    }
}

impl Default for Cell {
    fn default() -> Self {
        let (hash, depth) = calculate_hash_and_depth(&[], 0, &[]);
        Self {
            data: Vec::new(),
            bit_len: 0,
            references: Vec::new(),
            hash,
            depth,
        }
    }
}

/// Hash of the standard cell representation.
/// See https://docs.ton.org/tvm.pdf 3.1.4 - 3.1.5 for details
fn calculate_hash_and_depth(data: &[u8], bit_len: usize, references: &[ArcCell]) -> (TonHash, u16) {
    let depth = references
        .iter()
        .map(|r| r.cell_depth() + 1)
        .max()
        .unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update([get_refs_descriptor(references), get_bits_descriptor(bit_len)]);
    hasher.update(with_completion_tag(data, bit_len));
    for reference in references {
        hasher.update(reference.cell_depth().to_be_bytes());
    }
    for reference in references {
        hasher.update(reference.cell_hash());
    }
    (hasher.finalize().into(), depth)
}

/// d1 descriptor of an ordinary level-0 cell
pub(crate) fn get_refs_descriptor(references: &[ArcCell]) -> u8 {
    references.len() as u8
}

/// d2 descriptor: floor(bits / 8) + ceil(bits / 8)
pub(crate) fn get_bits_descriptor(bit_len: usize) -> u8 {
    (bit_len / 8 + bit_len.div_ceil(8)) as u8
}

/// Appends the `1` completion bit when the last byte is not full.
pub(crate) fn with_completion_tag(data: &[u8], bit_len: usize) -> Vec<u8> {
    let mut result = data.to_vec();
    let rest_bits = bit_len % 8;
    if rest_bits != 0 {
        if let Some(last) = result.last_mut() {
            *last |= 1 << (8 - rest_bits - 1);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{get_bits_descriptor, Cell, CellBuilder};

    #[test]
    fn default_cell() -> anyhow::Result<()> {
        let expected = Cell::new(vec![], 0, vec![])?;
        assert_eq!(Cell::default(), expected);
        assert_eq!(
            hex::encode(expected.cell_hash()),
            "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
        );
        Ok(())
    }

    #[test]
    fn d2_descriptor_test() {
        assert_eq!(get_bits_descriptor(0), 0);
        assert_eq!(get_bits_descriptor(4), 1);
        assert_eq!(get_bits_descriptor(8), 2);
        assert_eq!(get_bits_descriptor(1023), 255);
    }

    #[test]
    fn invalid_cells_are_rejected() {
        assert!(Cell::new(vec![0; 128], 1024, vec![]).is_err());
        assert!(Cell::new(vec![0; 2], 8, vec![]).is_err());
        let child = Cell::default().to_arc();
        assert!(Cell::new(vec![], 0, vec![child; 5]).is_err());
    }

    #[test]
    fn depth_follows_references() -> anyhow::Result<()> {
        let leaf = CellBuilder::new().store_u8(8, 1)?.build()?.to_arc();
        let middle = CellBuilder::new().store_reference(&leaf)?.build()?.to_arc();
        let root = CellBuilder::new()
            .store_reference(&middle)?
            .store_reference(&leaf)?
            .build()?;
        assert_eq!(leaf.cell_depth(), 0);
        assert_eq!(middle.cell_depth(), 1);
        assert_eq!(root.cell_depth(), 2);
        Ok(())
    }
}
