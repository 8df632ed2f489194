use std::borrow::Cow;

use jetton_core::cell::TonCellError;
use jetton_core::TonAddress;
use thiserror::Error;

use crate::client::TonRpcError;
use crate::types::StackParseError;

#[derive(Error, Debug)]
pub enum TonContractError {
    #[error("Cell error (Method: {method}, address: {address}, error {error}")]
    CellError {
        method: String,
        address: TonAddress,
        error: TonCellError,
    },

    #[error("TonRpcError ({0})")]
    ClientError(#[from] TonRpcError),

    #[error("Invalid method result stack size  (Method: {method}, address: {address}, actual: {actual}, expected {expected})")]
    InvalidMethodResultStackSize {
        method: String,
        address: TonAddress,
        actual: usize,
        expected: usize,
    },

    #[error(
        "Method result stack error (Method: {method}, address: {address}, stack error: {error})"
    )]
    MethodResultStackError {
        method: String,
        address: TonAddress,
        error: StackParseError,
    },

    #[error("Tvm run error (Method: {method}, address: {address}, exit code: {exit_code}, gas used: {gas_used})")]
    TvmRunError {
        method: String,
        address: TonAddress,
        exit_code: i32,
        gas_used: i64,
    },

    #[error("Unexpected value (Method: {method}, address: {address}): {message}")]
    UnexpectedValue {
        method: String,
        address: TonAddress,
        message: String,
    },
}

pub trait MapStackError<R> {
    fn map_stack_error(
        self,
        method: impl Into<Cow<'static, str>>,
        address: &TonAddress,
    ) -> Result<R, TonContractError>;
}

pub trait MapCellError<R> {
    fn map_cell_error(
        self,
        method: impl Into<Cow<'static, str>>,
        address: &TonAddress,
    ) -> Result<R, TonContractError>;
}

impl<R> MapStackError<R> for Result<R, StackParseError> {
    fn map_stack_error(
        self,
        method: impl Into<Cow<'static, str>>,
        address: &TonAddress,
    ) -> Result<R, TonContractError> {
        self.map_err(|e| TonContractError::MethodResultStackError {
            method: method.into().into_owned(),
            address: address.clone(),
            error: e,
        })
    }
}

impl<R> MapCellError<R> for Result<R, TonCellError> {
    fn map_cell_error(
        self,
        method: impl Into<Cow<'static, str>>,
        address: &TonAddress,
    ) -> Result<R, TonContractError> {
        self.map_err(|e| TonContractError::CellError {
            method: method.into().into_owned(),
            address: address.clone(),
            error: e,
        })
    }
}
