mod address;
mod coins;
mod error;

pub use address::*;
pub use coins::*;
pub use error::*;

pub const TON_HASH_BYTES: usize = 32;
pub const ZERO_HASH: TonHash = [0; 32];
pub type TonHash = [u8; TON_HASH_BYTES];
