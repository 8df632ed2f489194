use jetton_core::TonAddress;
use num_bigint::BigUint;
use strum::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum DeploymentStatus {
    /// The endpoint accepted the external message.
    Submitted,
    /// The minter is active on chain and reports the wallet as admin.
    Confirmed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeployReport {
    pub wallet_address: TonAddress,
    pub wallet_balance: BigUint,
    pub minter_address: TonAddress,
    pub seqno: u32,
    /// Hash of the external message as returned by the endpoint.
    pub message_hash: String,
    pub status: DeploymentStatus,
}
