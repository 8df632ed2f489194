use num_bigint::BigUint;

use super::DEFAULT_SEND_MODE;
use crate::cell::{ArcCell, Cell, EMPTY_ARC_CELL};
use crate::message::{CommonMsgInfo, TonMessage, TonMessageError, TransferMessage};
use crate::TonAddress;

/// One internal message a wallet is asked to send.
#[derive(Debug, Clone, PartialEq)]
pub struct OutMessage {
    pub dest: TonAddress,
    pub value: BigUint,
    pub bounce: bool,
    pub state_init: Option<ArcCell>,
    pub body: ArcCell,
    pub send_mode: u8,
}

/// Everything signed in one external message of a wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub seqno: u32,
    pub valid_until: u32,
    pub messages: Vec<OutMessage>,
}

impl OutMessage {
    /// Bounceable message with an empty body and the default send mode.
    pub fn new(dest: &TonAddress, value: &BigUint) -> Self {
        OutMessage {
            dest: dest.clone(),
            value: value.clone(),
            bounce: true,
            state_init: None,
            body: EMPTY_ARC_CELL.clone(),
            send_mode: DEFAULT_SEND_MODE,
        }
    }

    pub fn with_bounce(mut self, bounce: bool) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_state_init(mut self, state_init: Cell) -> Self {
        self.state_init = Some(state_init.to_arc());
        self
    }

    pub fn with_body(mut self, body: Cell) -> Self {
        self.body = body.to_arc();
        self
    }

    pub fn with_send_mode(mut self, send_mode: u8) -> Self {
        self.send_mode = send_mode;
        self
    }

    pub fn build(&self) -> Result<Cell, TonMessageError> {
        let mut message =
            TransferMessage::new(CommonMsgInfo::new_internal(&self.dest, &self.value, self.bounce));
        message.with_data(self.body.clone());
        if let Some(state_init) = &self.state_init {
            message.with_state_init_ref(state_init);
        }
        message.build()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::cell::CellBuilder;
    use crate::message::CommonMsgInfo::InternalMessage;

    #[test]
    fn out_message_builds_internal_message() -> anyhow::Result<()> {
        let dest = TonAddress::from_str("EQDk2VTvn04SUKJrW7rXahzdF8_Qi6utb0wj43InCu9vdjrR")?;
        let state_init = CellBuilder::new().store_u8(5, 0b00110)?.build()?;
        let body = CellBuilder::new().store_u32(32, 21)?.build()?;
        let out = OutMessage::new(&dest, &BigUint::from(50_000_000u32))
            .with_bounce(false)
            .with_state_init(state_init.clone())
            .with_body(body.clone());
        assert_eq!(out.send_mode, DEFAULT_SEND_MODE);

        let parsed = TransferMessage::parse(&out.build()?)?;
        let InternalMessage(info) = parsed.common_msg_info else {
            anyhow::bail!("internal message expected");
        };
        assert!(!info.bounce);
        assert_eq!(info.dest, dest);
        assert_eq!(info.value, BigUint::from(50_000_000u32));
        assert_eq!(parsed.state_init.as_deref(), Some(&state_init));
        assert_eq!(parsed.data.as_deref(), Some(&body));
        Ok(())
    }
}
