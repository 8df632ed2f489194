use std::time::SystemTimeError;

use jetton_core::jetton::JettonError;
use jetton_core::mnemonic::MnemonicError;
use jetton_core::types::format_nano;
use jetton_core::TonAddress;
use num_bigint::BigUint;
use thiserror::Error;

use crate::config::ConfigError;
use crate::contract::TonContractError;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Invalid seed phrase: {0}")]
    Input(#[from] MnemonicError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[source] TonContractError),

    #[error("Deployment message rejected: {0}")]
    Submission(#[source] TonContractError),

    #[error("Insufficient balance: {} TON, at least {} TON required", format_nano(.balance), format_nano(.required))]
    InsufficientBalance { balance: BigUint, required: BigUint },

    #[error("Failed to build deployment message: {0}")]
    Build(#[from] JettonError),

    #[error("Unexpected contract state: {0}")]
    Contract(#[source] TonContractError),

    #[error("System clock is before the Unix epoch: {0}")]
    Clock(#[from] SystemTimeError),

    #[error("Jetton minter {address} is not active after {attempts} attempts")]
    ConfirmationTimeout { address: TonAddress, attempts: usize },
}
