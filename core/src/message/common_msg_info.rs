use num_bigint::BigUint;

use super::ZERO_COINS;
use crate::TonAddress;

#[derive(Clone, Debug, PartialEq)]
pub enum CommonMsgInfo {
    InternalMessage(InternalMessage),
    ExternalIncomingMessage(ExternalIncomingMessage),
}

#[derive(Clone, Debug, PartialEq)]
pub struct InternalMessage {
    /// Hyper cube routing flag.
    pub ihr_disabled: bool,
    /// Message should be bounced back to the sender if processing fails.
    pub bounce: bool,
    /// The message itself is a result of a bounce.
    pub bounced: bool,
    /// Sender; left empty (`addr_none`) for messages produced by a wallet.
    pub src: TonAddress,
    pub dest: TonAddress,
    /// Attached nanotons. Extra currencies are never attached.
    pub value: BigUint,
    pub ihr_fee: BigUint,
    pub fwd_fee: BigUint,
    pub created_lt: u64,
    pub created_at: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExternalIncomingMessage {
    /// Address of a external sender of the message.
    pub src: TonAddress,
    /// Address of smart contract destination of message.
    pub dest: TonAddress,
    /// Fee for executing and delivering of message.
    pub import_fee: BigUint,
}

impl CommonMsgInfo {
    /// Internal message header as a wallet emits it: no source, zero fees and timestamps.
    pub fn new_internal(dest: &TonAddress, value: &BigUint, bounce: bool) -> Self {
        CommonMsgInfo::InternalMessage(InternalMessage {
            ihr_disabled: true,
            bounce,
            bounced: false,
            src: TonAddress::null(),
            dest: dest.clone(),
            value: value.clone(),
            ihr_fee: ZERO_COINS.clone(),
            fwd_fee: ZERO_COINS.clone(),
            created_lt: 0,
            created_at: 0,
        })
    }

    pub fn new_external_in(dest: &TonAddress) -> Self {
        CommonMsgInfo::ExternalIncomingMessage(ExternalIncomingMessage {
            src: TonAddress::null(),
            dest: dest.clone(),
            import_fee: ZERO_COINS.clone(),
        })
    }

    pub fn src(&self) -> TonAddress {
        match self {
            CommonMsgInfo::InternalMessage(m) => m.src.clone(),
            CommonMsgInfo::ExternalIncomingMessage(m) => m.src.clone(),
        }
    }

    pub fn dest(&self) -> TonAddress {
        match self {
            CommonMsgInfo::InternalMessage(m) => m.dest.clone(),
            CommonMsgInfo::ExternalIncomingMessage(m) => m.dest.clone(),
        }
    }
}
