use thiserror::Error;
use jetton_core::cell::TonCellError;

use crate::types::StackEntry;

#[derive(Error, Debug)]
pub enum StackParseError {
    #[error("Invalid stack entry type{{expected: {expected}, found: {found}}}")]
    InvalidEntryType {
        expected: String,
        found: StackEntry,
    },

    #[error("Invalid stack entry({0})")]
    InvalidEntryValue(String),

    #[error("Cell error({0})")]
    CellError(#[from] TonCellError),
}
