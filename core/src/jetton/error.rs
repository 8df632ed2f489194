use thiserror::Error;

use crate::cell::TonCellError;
use crate::message::TonMessageError;

#[derive(Error, Debug)]
pub enum JettonError {
    #[error("Invalid jetton content ({0})")]
    InvalidContent(String),

    #[error("TonCellError ({0})")]
    TonCellError(#[from] TonCellError),

    #[error("TonMessageError ({0})")]
    TonMessageError(#[from] TonMessageError),
}
