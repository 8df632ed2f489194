use crate::cell::{Cell, CellBuilder, CellParser};
use crate::jetton::JettonError;

/// TEP-64 content layout prefix for off-chain metadata.
pub const OFFCHAIN_CONTENT_PREFIX: u8 = 0x01;
const SNAKE_CELL_BYTES: usize = 127;

/// Jetton metadata descriptor.
///
/// Only the off-chain layout is produced: the prefix byte followed by the URI as a
/// snake string, where bytes that don't fit spill into a chain of single-reference cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JettonContent {
    Offchain { uri: String },
}

impl JettonContent {
    pub fn offchain(uri: &str) -> Self {
        JettonContent::Offchain {
            uri: uri.to_string(),
        }
    }

    pub fn to_cell(&self) -> Result<Cell, JettonError> {
        match self {
            JettonContent::Offchain { uri } => {
                if uri.is_empty() {
                    return Err(JettonError::InvalidContent(
                        "metadata URI is empty".to_string(),
                    ));
                }
                let bytes = uri.as_bytes();
                let head_len = bytes.len().min(SNAKE_CELL_BYTES - 1);
                let (head, tail) = bytes.split_at(head_len);

                let mut builder = CellBuilder::new();
                builder.store_byte(OFFCHAIN_CONTENT_PREFIX)?;
                builder.store_slice(head)?;
                if let Some(tail_cell) = snake_tail(tail)? {
                    builder.store_child(tail_cell)?;
                }
                Ok(builder.build()?)
            }
        }
    }

    pub fn from_cell(cell: &Cell) -> Result<Self, JettonError> {
        let mut parser = cell.parser();
        let prefix = parser.load_byte()?;
        if prefix != OFFCHAIN_CONTENT_PREFIX {
            return Err(JettonError::InvalidContent(format!(
                "unsupported content layout {prefix:#04x}"
            )));
        }
        let mut bytes = Vec::new();
        read_snake(&mut parser, &mut bytes)?;
        let uri = String::from_utf8(bytes)
            .map_err(|e| JettonError::InvalidContent(format!("URI is not UTF-8: {e}")))?;
        Ok(JettonContent::Offchain { uri })
    }
}

fn snake_tail(bytes: &[u8]) -> Result<Option<Cell>, JettonError> {
    let mut tail: Option<Cell> = None;
    for chunk in bytes.chunks(SNAKE_CELL_BYTES).rev() {
        let mut builder = CellBuilder::new();
        builder.store_slice(chunk)?;
        if let Some(next) = tail.take() {
            builder.store_child(next)?;
        }
        tail = Some(builder.build()?);
    }
    Ok(tail)
}

fn read_snake(parser: &mut CellParser, bytes: &mut Vec<u8>) -> Result<(), JettonError> {
    let remaining = parser.remaining_bytes();
    bytes.extend(parser.load_bytes(remaining)?);
    if parser.remaining_refs() > 0 {
        let next = parser.next_reference()?;
        let mut next_parser = next.parser();
        read_snake(&mut next_parser, bytes)?;
    }
    parser.ensure_empty()?;
    Ok(())
}
