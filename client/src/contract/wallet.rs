mod wallet_contract;

pub use wallet_contract::*;
