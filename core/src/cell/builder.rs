use std::sync::Arc;

use bitstream_io::{BigEndian, BitWrite, BitWriter};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::cell::error::{MapTonCellError, TonCellError};
use crate::cell::{ArcCell, Cell};
use crate::TonAddress;

pub const MAX_CELL_BITS: usize = 1023;
pub const MAX_CELL_REFERENCES: usize = 4;

pub struct CellBuilder {
    bit_writer: BitWriter<Vec<u8>, BigEndian>,
    bits_to_write: usize,
    references: Vec<ArcCell>,
}

impl CellBuilder {
    pub fn new() -> CellBuilder {
        let bit_writer = BitWriter::endian(Vec::new(), BigEndian);
        CellBuilder {
            bit_writer,
            bits_to_write: 0,
            references: Vec::new(),
        }
    }

    pub fn store_bit(&mut self, val: bool) -> Result<&mut Self, TonCellError> {
        self.ensure_capacity(1)?;
        self.bit_writer.write_bit(val).map_cell_builder_error()?;
        self.bits_to_write += 1;
        Ok(self)
    }

    pub fn store_u8(&mut self, bit_len: usize, val: u8) -> Result<&mut Self, TonCellError> {
        self.ensure_capacity(bit_len)?;
        self.bit_writer
            .write(bit_len as u32, val)
            .map_cell_builder_error()?;
        self.bits_to_write += bit_len;
        Ok(self)
    }

    pub fn store_u32(&mut self, bit_len: usize, val: u32) -> Result<&mut Self, TonCellError> {
        self.ensure_capacity(bit_len)?;
        self.bit_writer
            .write(bit_len as u32, val)
            .map_cell_builder_error()?;
        self.bits_to_write += bit_len;
        Ok(self)
    }

    pub fn store_i32(&mut self, bit_len: usize, val: i32) -> Result<&mut Self, TonCellError> {
        self.ensure_capacity(bit_len)?;
        self.bit_writer
            .write(bit_len as u32, val)
            .map_cell_builder_error()?;
        self.bits_to_write += bit_len;
        Ok(self)
    }

    pub fn store_u64(&mut self, bit_len: usize, val: u64) -> Result<&mut Self, TonCellError> {
        self.ensure_capacity(bit_len)?;
        self.bit_writer
            .write(bit_len as u32, val)
            .map_cell_builder_error()?;
        self.bits_to_write += bit_len;
        Ok(self)
    }

    pub fn store_uint(&mut self, bit_len: usize, val: &BigUint) -> Result<&mut Self, TonCellError> {
        let minimum_bits_needed = if val.is_zero() { 1 } else { val.bits() } as usize;
        if minimum_bits_needed > bit_len {
            return Err(TonCellError::cell_builder_error(format!(
                "Value {} doesn't fit in {} bits (takes {} bits)",
                val, bit_len, minimum_bits_needed
            )));
        }

        let value_bytes = val.to_bytes_be();
        let first_byte_bit_size = bit_len - (value_bytes.len() - 1) * 8;

        for _ in 0..(first_byte_bit_size - 1) / 32 {
            // leading zero words
            self.store_u32(32, 0u32)?;
        }

        if first_byte_bit_size % 32 == 0 {
            self.store_u32(32, value_bytes[0] as u32)?;
        } else {
            self.store_u32(first_byte_bit_size % 32, value_bytes[0] as u32)?;
        }

        for byte in value_bytes.iter().skip(1) {
            self.store_u8(8, *byte)?;
        }
        Ok(self)
    }

    pub fn store_byte(&mut self, val: u8) -> Result<&mut Self, TonCellError> {
        self.store_u8(8, val)
    }

    pub fn store_slice(&mut self, slice: &[u8]) -> Result<&mut Self, TonCellError> {
        for val in slice {
            self.store_byte(*val)?;
        }
        Ok(self)
    }

    /// Stores the first `bit_len` bits of `slice`, most significant bit first.
    pub fn store_bits(&mut self, bit_len: usize, slice: &[u8]) -> Result<&mut Self, TonCellError> {
        let full_bytes = bit_len / 8;
        let needed_bytes = bit_len.div_ceil(8);
        if slice.len() < needed_bytes {
            return Err(TonCellError::cell_builder_error(format!(
                "Can't store {bit_len} bits from a slice of {} bytes",
                slice.len()
            )));
        }
        self.store_slice(&slice[0..full_bytes])?;
        let last_byte_len = bit_len % 8;
        if last_byte_len != 0 {
            let last_byte = slice[full_bytes] >> (8 - last_byte_len);
            self.store_u8(last_byte_len, last_byte)?;
        }
        Ok(self)
    }

    pub fn store_string(&mut self, val: &str) -> Result<&mut Self, TonCellError> {
        self.store_slice(val.as_bytes())
    }

    /// Stores `VarUInteger 16`: 4-bit byte length followed by the big-endian value.
    pub fn store_coins(&mut self, val: &BigUint) -> Result<&mut Self, TonCellError> {
        if val.is_zero() {
            self.store_u8(4, 0)
        } else {
            let num_bytes = (val.bits() as usize).div_ceil(8);
            if num_bytes > 15 {
                return Err(TonCellError::cell_builder_error(format!(
                    "Coins value {val} doesn't fit in 15 bytes"
                )));
            }
            self.store_u8(4, num_bytes as u8)?;
            self.store_uint(num_bytes * 8, val)
        }
    }

    /// Stores `addr_std$10 anycast:(Maybe Anycast) workchain_id:int8 address:bits256`.
    pub fn store_raw_address(&mut self, val: &TonAddress) -> Result<&mut Self, TonCellError> {
        self.store_u8(2, 0b10u8)?;
        self.store_bit(false)?;
        let wc = (val.workchain & 0xff) as u8;
        self.store_u8(8, wc)?;
        self.store_slice(&val.hash_part)?;
        Ok(self)
    }

    /// Stores `addr_none$00` for the null address, `addr_std` otherwise.
    pub fn store_address(&mut self, val: &TonAddress) -> Result<&mut Self, TonCellError> {
        if val == &TonAddress::NULL {
            self.store_u8(2, 0)?;
        } else {
            self.store_raw_address(val)?;
        }
        Ok(self)
    }

    /// Adds reference to an existing `Cell`.
    ///
    /// The reference is passed as `ArcCell` so it might be shared with other cells.
    pub fn store_reference(&mut self, cell: &ArcCell) -> Result<&mut Self, TonCellError> {
        let ref_count = self.references.len() + 1;
        if ref_count > MAX_CELL_REFERENCES {
            return Err(TonCellError::cell_builder_error(format!(
                "Cell must contain at most {MAX_CELL_REFERENCES} references, got {ref_count}"
            )));
        }
        self.references.push(cell.clone());
        Ok(self)
    }

    pub fn store_references(&mut self, refs: &[ArcCell]) -> Result<&mut Self, TonCellError> {
        for r in refs {
            self.store_reference(r)?;
        }
        Ok(self)
    }

    /// Adds a reference to a newly constructed `Cell`.
    pub fn store_child(&mut self, cell: Cell) -> Result<&mut Self, TonCellError> {
        self.store_reference(&Arc::new(cell))
    }

    /// Copies data bits and references of `cell` into this builder.
    pub fn store_cell(&mut self, cell: &Cell) -> Result<&mut Self, TonCellError> {
        self.store_bits(cell.bit_len(), cell.data())?;
        self.store_references(cell.references())?;
        Ok(self)
    }

    // https://docs.ton.org/develop/data-formats/tl-b-types#maybe
    pub fn store_maybe_cell_ref(
        &mut self,
        maybe_cell: &Option<ArcCell>,
    ) -> Result<&mut Self, TonCellError> {
        if let Some(cell) = maybe_cell {
            self.store_bit(true)?;
            self.store_reference(cell)?;
        } else {
            self.store_bit(false)?;
        }

        Ok(self)
    }

    pub fn remaining_bits(&self) -> usize {
        MAX_CELL_BITS - self.bits_to_write
    }

    pub fn build(&mut self) -> Result<Cell, TonCellError> {
        let mut trailing_zeros = 0;
        while !self.bit_writer.byte_aligned() {
            self.bit_writer.write_bit(false).map_cell_builder_error()?;
            trailing_zeros += 1;
        }

        if let Some(vec) = self.bit_writer.writer() {
            let bit_len = vec.len() * 8 - trailing_zeros;
            Cell::new(vec.clone(), bit_len, self.references.clone())
        } else {
            Err(TonCellError::CellBuilderError(
                "Stream is not byte-aligned".to_string(),
            ))
        }
    }

    fn ensure_capacity(&self, bit_len: usize) -> Result<(), TonCellError> {
        if self.bits_to_write + bit_len > MAX_CELL_BITS {
            return Err(TonCellError::cell_builder_error(format!(
                "Cell must contain at most {MAX_CELL_BITS} bits, got {}",
                self.bits_to_write + bit_len
            )));
        }
        Ok(())
    }
}

impl Default for CellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use num_bigint::BigUint;
    use num_traits::Zero;

    use crate::cell::{CellBuilder, TonCellError, MAX_CELL_BITS};
    use crate::types::TonAddress;

    #[test]
    fn write_bit() -> Result<(), TonCellError> {
        let cell = CellBuilder::new().store_bit(true)?.build()?;
        assert_eq!(cell.data(), [0b1000_0000]);
        assert_eq!(cell.bit_len(), 1);
        assert!(cell.parser().load_bit()?);
        Ok(())
    }

    #[test]
    fn write_numbers() -> Result<(), TonCellError> {
        let cell = CellBuilder::new()
            .store_u8(8, 234)?
            .store_u32(32, 0xFAD45AAD)?
            .store_i32(32, -1)?
            .store_u64(64, 0xFAD45AADAA12FF45)?
            .build()?;
        assert_eq!(cell.bit_len(), 136);
        assert_eq!(&cell.data()[..5], [0xEA, 0xFA, 0xD4, 0x5A, 0xAD]);

        let mut parser = cell.parser();
        assert_eq!(parser.load_u8(8)?, 234);
        assert_eq!(parser.load_u32(32)?, 0xFAD45AAD);
        assert_eq!(parser.load_i32(32)?, -1);
        assert_eq!(parser.load_u64(64)?, 0xFAD45AADAA12FF45);
        parser.ensure_empty()?;
        Ok(())
    }

    #[test]
    fn write_str() -> Result<(), TonCellError> {
        let texts = ["hello", "Русский текст", "\u{263A}😃"];
        for text in texts {
            let cell = CellBuilder::new().store_string(text)?.build()?;
            let text_bytes = text.as_bytes();
            assert_eq!(cell.data(), text_bytes);
            assert_eq!(cell.bit_len(), text_bytes.len() * 8);
            let mut reader = cell.parser();
            let remaining_bytes = reader.remaining_bytes();
            assert_eq!(reader.load_utf8(remaining_bytes)?, text);
        }
        Ok(())
    }

    #[test]
    fn write_address() -> anyhow::Result<()> {
        let addr = TonAddress::from_base64_url("EQDk2VTvn04SUKJrW7rXahzdF8_Qi6utb0wj43InCu9vdjrR")?;

        let cell = CellBuilder::new().store_address(&addr)?.build()?;
        assert_eq!(
            cell.data(),
            [
                128, 28, 155, 42, 157, 243, 233, 194, 74, 20, 77, 107, 119, 90, 237, 67, 155, 162,
                249, 250, 17, 117, 117, 173, 233, 132, 124, 110, 68, 225, 93, 237, 238, 192
            ]
        );
        assert_eq!(cell.bit_len(), 2 + 1 + 8 + 32 * 8);
        assert_eq!(cell.parser().load_address()?, addr);

        let null = CellBuilder::new().store_address(&TonAddress::NULL)?.build()?;
        assert_eq!(null.bit_len(), 2);
        assert_eq!(null.parser().load_address()?, TonAddress::NULL);
        Ok(())
    }

    #[test]
    fn write_masterchain_address() -> anyhow::Result<()> {
        let addr = TonAddress::from_str(
            "-1:3333333333333333333333333333333333333333333333333333333333333333",
        )?;
        let cell = CellBuilder::new().store_address(&addr)?.build()?;
        assert_eq!(cell.parser().load_address()?, addr);
        Ok(())
    }

    #[test]
    fn write_coins() -> Result<(), TonCellError> {
        let cell = CellBuilder::new()
            .store_coins(&BigUint::zero())?
            .store_coins(&BigUint::from(50_000_000u64))?
            .build()?;
        // 0000 | 0100 0x02FAF080
        assert_eq!(cell.bit_len(), 4 + 4 + 32);
        assert_eq!(cell.data(), [0x04, 0x02, 0xFA, 0xF0, 0x80]);
        let mut parser = cell.parser();
        assert_eq!(parser.load_coins()?, BigUint::zero());
        assert_eq!(parser.load_coins()?, BigUint::from(50_000_000u64));
        Ok(())
    }

    #[test]
    fn write_load_big_uint() -> Result<(), TonCellError> {
        let value = BigUint::from(3u8);
        let mut writer = CellBuilder::new();
        assert!(writer.store_uint(1, &value).is_err());
        let bits_for_tests = [256, 128, 64, 8];

        for bits_num in bits_for_tests.iter() {
            writer.store_uint(*bits_num, &value)?;
        }
        let cell = writer.build()?;
        let mut cell_parser = cell.parser();
        for bits_num in bits_for_tests.iter() {
            assert_eq!(cell_parser.load_uint(*bits_num)?, value);
        }
        Ok(())
    }

    #[test]
    fn overflow_is_rejected() -> Result<(), TonCellError> {
        let mut writer = CellBuilder::new();
        for _ in 0..MAX_CELL_BITS {
            writer.store_bit(true)?;
        }
        assert_eq!(writer.remaining_bits(), 0);
        assert!(writer.store_bit(false).is_err());
        assert_eq!(writer.build()?.bit_len(), MAX_CELL_BITS);

        let child = CellBuilder::new().build()?.to_arc();
        let mut writer = CellBuilder::new();
        writer.store_references(&[child.clone(), child.clone(), child.clone(), child.clone()])?;
        assert!(writer.store_reference(&child).is_err());
        Ok(())
    }

    #[test]
    fn store_cell_copies_bits_and_refs() -> Result<(), TonCellError> {
        let child = CellBuilder::new().store_u8(8, 7)?.build()?;
        let source = CellBuilder::new()
            .store_u8(5, 0b10101)?
            .store_child(child)?
            .build()?;
        let copy = CellBuilder::new().store_cell(&source)?.build()?;
        assert_eq!(copy, source);
        Ok(())
    }
}
