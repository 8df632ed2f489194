pub mod cell;
pub mod jetton;
pub mod message;
pub mod mnemonic;
pub mod types;
pub mod wallet;

pub use crate::types::{TonAddress, TonAddressParseError, TonHash};
