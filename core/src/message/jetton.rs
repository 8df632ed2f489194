// Constants from jetton standard
// https://github.com/ton-blockchain/TEPs/blob/master/text/0074-jettons-standard.md

// crc32('internal_transfer query_id:uint64 amount:VarUInteger 16 from:MsgAddress response_address:MsgAddress forward_ton_amount:VarUInteger 16 forward_payload:Either Cell ^Cell = InternalMsgBody') = 0x978d4519 & 0x7fffffff = 0x178d4519

pub const JETTON_INTERNAL_TRANSFER: u32 = 0x178d4519;
/// `mint` of the reference jetton minter (`op == 21`).
pub const JETTON_MINT: u32 = 21;

mod internal_transfer;
mod mint;

pub use internal_transfer::*;
pub use mint::*;
