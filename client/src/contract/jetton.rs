mod master_contract;

pub use master_contract::*;
