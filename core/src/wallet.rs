mod ton_wallet;
mod transfer_request;
mod wallet_code;
mod wallet_data;

pub use ton_wallet::*;
pub use transfer_request::*;
pub use wallet_code::*;
pub use wallet_data::*;

/// Base subwallet id of v3/v4 wallets; the workchain is added on top.
pub const DEFAULT_WALLET_ID: i32 = 0x29a9a317;
/// Pay transfer fees separately and ignore errors.
pub const DEFAULT_SEND_MODE: u8 = 3;
