use thiserror::Error;

#[derive(Error, Debug)]
#[error("Invalid address (Address: {address}, message: {message})")]
pub struct TonAddressParseError {
    address: String,
    message: String,
}

impl TonAddressParseError {
    pub fn new<A: ToString, M: ToString>(address: A, message: M) -> TonAddressParseError {
        TonAddressParseError {
            address: address.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid coins amount (Amount: {amount}, message: {message})")]
pub struct CoinsParseError {
    amount: String,
    message: String,
}

impl CoinsParseError {
    pub fn new<A: ToString, M: ToString>(amount: A, message: M) -> CoinsParseError {
        CoinsParseError {
            amount: amount.to_string(),
            message: message.to_string(),
        }
    }
}
