use std::io::Cursor;

use bitstream_io::{BigEndian, BitWrite, BitWriter, ByteRead, ByteReader};
use crc::Crc;
use lazy_static::lazy_static;

use crate::cell::{MapTonCellError, TonCellError};

lazy_static! {
    pub static ref CRC_32_ISCSI: Crc<u32> = Crc::<u32>::new(&crc::CRC_32_ISCSI);
}

/// Raw representation of Cell.
///
/// References are stored as indices in BagOfCells.
#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub(crate) struct RawCell {
    pub(crate) data: Vec<u8>,
    pub(crate) bit_len: usize,
    pub(crate) references: Vec<usize>,
}

/// Raw representation of BagOfCells.
///
/// `cells` must be topologically sorted: every reference points to a later cell.
#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub(crate) struct RawBagOfCells {
    pub(crate) cells: Vec<RawCell>,
    pub(crate) roots: Vec<usize>,
}

const GENERIC_BOC_MAGIC: u32 = 0xb5ee9c72;

impl RawBagOfCells {
    pub(crate) fn parse(serial: &[u8]) -> Result<RawBagOfCells, TonCellError> {
        let cursor = Cursor::new(serial);

        let mut reader: ByteReader<Cursor<&[u8]>, BigEndian> =
            ByteReader::endian(cursor, BigEndian);
        // serialized_boc#b5ee9c72
        let magic = reader.read::<u32>().map_boc_deserialization_error()?;
        if magic != GENERIC_BOC_MAGIC {
            return Err(TonCellError::boc_deserialization_error(format!(
                "Unsupported cell magic number: {:#x}",
                magic
            )));
        }

        // has_idx:(## 1) has_crc32c:(## 1) has_cache_bits:(## 1) flags:(## 2) { flags = 0 }
        // size:(## 3) { size <= 4 }
        let header = reader.read::<u8>().map_boc_deserialization_error()?;
        let has_idx = (header >> 7) & 1 == 1;
        let has_crc32c = (header >> 6) & 1 == 1;
        let size = header & 0b0000_0111;
        if has_crc32c {
            verify_crc32c(serial)?;
        }
        if size == 0 || size > 4 {
            return Err(TonCellError::boc_deserialization_error(format!(
                "Invalid reference size: {size}"
            )));
        }

        //   off_bytes:(## 8) { off_bytes <= 8 }
        let off_bytes = reader.read::<u8>().map_boc_deserialization_error()?;
        if off_bytes == 0 || off_bytes > 8 {
            return Err(TonCellError::boc_deserialization_error(format!(
                "Invalid offset size: {off_bytes}"
            )));
        }
        let cells = read_var_size(&mut reader, size)?;
        let roots = read_var_size(&mut reader, size)?;
        let _absent = read_var_size(&mut reader, size)?;
        let _tot_cells_size = read_var_size(&mut reader, off_bytes)?;
        if roots == 0 || roots > cells {
            return Err(TonCellError::boc_deserialization_error(format!(
                "Invalid root count {roots} for {cells} cells"
            )));
        }

        let mut root_list = Vec::with_capacity(roots);
        for _ in 0..roots {
            let root = read_var_size(&mut reader, size)?;
            if root >= cells {
                return Err(TonCellError::boc_deserialization_error(format!(
                    "Root index {root} is out of range"
                )));
            }
            root_list.push(root)
        }
        if has_idx {
            for _ in 0..cells {
                read_var_size(&mut reader, off_bytes)?;
            }
        }

        let mut cell_vec = Vec::with_capacity(cells.min(serial.len()));
        for cell_index in 0..cells {
            let cell = read_cell(&mut reader, size)?;
            if let Some(bad) = cell.references.iter().find(|r| **r <= cell_index || **r >= cells) {
                return Err(TonCellError::boc_deserialization_error(format!(
                    "Cell {cell_index} has invalid reference {bad}"
                )));
            }
            cell_vec.push(cell);
        }

        Ok(RawBagOfCells {
            cells: cell_vec,
            roots: root_list,
        })
    }

    pub(crate) fn serialize(&self, has_crc32: bool) -> Result<Vec<u8>, TonCellError> {
        let root_count = self.roots.len();
        if root_count != 1 {
            return Err(TonCellError::boc_serialization_error(format!(
                "Single root expected, got {}",
                root_count
            )));
        }

        let num_ref_bits = 32 - (self.cells.len() as u32).leading_zeros();
        let num_ref_bytes = num_ref_bits.div_ceil(8).max(1);

        let mut full_size = 0u32;
        for cell in &self.cells {
            full_size += raw_cell_size(cell, num_ref_bytes);
        }

        let num_offset_bits = 32 - full_size.leading_zeros();
        let num_offset_bytes = num_offset_bits.div_ceil(8).max(1);

        let mut writer = BitWriter::endian(Vec::new(), BigEndian);

        writer
            .write(32, GENERIC_BOC_MAGIC)
            .map_boc_serialization_error()?;

        // has_idx, has_crc32c, has_cache_bits, flags, size
        writer.write_bit(false).map_boc_serialization_error()?;
        writer.write_bit(has_crc32).map_boc_serialization_error()?;
        writer.write_bit(false).map_boc_serialization_error()?;
        writer.write(2, 0u8).map_boc_serialization_error()?;
        writer
            .write(3, num_ref_bytes)
            .map_boc_serialization_error()?;
        writer
            .write(8, num_offset_bytes)
            .map_boc_serialization_error()?;
        writer
            .write(8 * num_ref_bytes, self.cells.len() as u32)
            .map_boc_serialization_error()?;
        writer
            .write(8 * num_ref_bytes, 1u32)
            .map_boc_serialization_error()?;
        // absent cells
        writer
            .write(8 * num_ref_bytes, 0u32)
            .map_boc_serialization_error()?;
        writer
            .write(8 * num_offset_bytes, full_size)
            .map_boc_serialization_error()?;
        writer
            .write(8 * num_ref_bytes, self.roots[0] as u32)
            .map_boc_serialization_error()?;

        for cell in &self.cells {
            write_raw_cell(&mut writer, cell, num_ref_bytes)?;
        }

        if has_crc32 {
            let bytes = writer.writer().ok_or_else(|| {
                TonCellError::boc_serialization_error("Stream is not byte-aligned")
            })?;
            let cs = CRC_32_ISCSI.checksum(bytes.as_slice());
            writer
                .write_bytes(cs.to_le_bytes().as_slice())
                .map_boc_serialization_error()?;
        }
        let res = writer
            .writer()
            .ok_or_else(|| TonCellError::boc_serialization_error("Stream is not byte-aligned"))?;
        Ok(res.clone())
    }
}

fn verify_crc32c(serial: &[u8]) -> Result<(), TonCellError> {
    if serial.len() < 4 {
        return Err(TonCellError::boc_deserialization_error(
            "Bag of cells is too short to contain CRC32C",
        ));
    }
    let (body, crc) = serial.split_at(serial.len() - 4);
    let expected = u32::from_le_bytes([crc[0], crc[1], crc[2], crc[3]]);
    let actual = CRC_32_ISCSI.checksum(body);
    if expected != actual {
        return Err(TonCellError::boc_deserialization_error(format!(
            "CRC32C mismatch: expected {expected:#010x}, got {actual:#010x}"
        )));
    }
    Ok(())
}

fn read_cell(
    reader: &mut ByteReader<Cursor<&[u8]>, BigEndian>,
    size: u8,
) -> Result<RawCell, TonCellError> {
    let d1 = reader.read::<u8>().map_boc_deserialization_error()?;
    let d2 = reader.read::<u8>().map_boc_deserialization_error()?;

    let level = d1 >> 5;
    let is_exotic = (d1 & 8) != 0;
    let ref_num = d1 & 0x07;
    if is_exotic || level != 0 {
        return Err(TonCellError::boc_deserialization_error(
            "Only ordinary level-0 cells are supported",
        ));
    }
    if ref_num > 4 {
        return Err(TonCellError::boc_deserialization_error(format!(
            "Cell has {ref_num} references"
        )));
    }
    let data_size = ((d2 >> 1) + (d2 & 1)).into();
    let full_bytes = (d2 & 0x01) == 0;

    let mut data = reader
        .read_to_vec(data_size)
        .map_boc_deserialization_error()?;

    let data_len = data.len();
    let padding_len = if data_len > 0 && !full_bytes {
        // strip the completion tag
        let num_zeros = data[data_len - 1].trailing_zeros();
        if num_zeros >= 8 {
            return Err(TonCellError::boc_deserialization_error(
                "Last byte of binary must not be zero if full_byte flag is not set",
            ));
        }
        data[data_len - 1] &= !(1 << num_zeros);
        num_zeros + 1
    } else {
        0
    };
    let bit_len = data.len() * 8 - padding_len as usize;
    let mut references: Vec<usize> = Vec::with_capacity(ref_num as usize);
    for _ in 0..ref_num {
        references.push(read_var_size(reader, size)?);
    }
    Ok(RawCell {
        data,
        bit_len,
        references,
    })
}

fn raw_cell_size(cell: &RawCell, ref_size_bytes: u32) -> u32 {
    let data_len = cell.bit_len.div_ceil(8);
    2 + data_len as u32 + cell.references.len() as u32 * ref_size_bytes
}

fn write_raw_cell(
    writer: &mut BitWriter<Vec<u8>, BigEndian>,
    cell: &RawCell,
    ref_size_bytes: u32,
) -> Result<(), TonCellError> {
    let d1 = cell.references.len() as u8;

    let padding_bits = cell.bit_len % 8;
    let full_bytes = padding_bits == 0;
    let data = cell.data.as_slice();
    let data_len = cell.bit_len.div_ceil(8);
    // subtract 1 if the last byte is not full
    let d2 = data_len as u8 * 2 - if full_bytes { 0 } else { 1 };

    writer.write(8, d1).map_boc_serialization_error()?;
    writer.write(8, d2).map_boc_serialization_error()?;
    if !full_bytes {
        writer
            .write_bytes(&data[..data_len - 1])
            .map_boc_serialization_error()?;
        let last_byte = data[data_len - 1];
        let l = last_byte | 1 << (8 - padding_bits - 1);
        writer.write(8, l).map_boc_serialization_error()?;
    } else {
        writer.write_bytes(data).map_boc_serialization_error()?;
    }

    for r in cell.references.as_slice() {
        writer
            .write(8 * ref_size_bytes, *r as u32)
            .map_boc_serialization_error()?;
    }

    Ok(())
}

fn read_var_size(
    reader: &mut ByteReader<Cursor<&[u8]>, BigEndian>,
    n: u8,
) -> Result<usize, TonCellError> {
    let bytes = reader
        .read_to_vec(n.into())
        .map_boc_deserialization_error()?;

    let mut result = 0;
    for &byte in &bytes {
        result <<= 8;
        result |= usize::from(byte);
    }
    Ok(result)
}
