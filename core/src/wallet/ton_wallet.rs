use std::sync::Arc;

use super::{
    TransferRequest, WalletDataV4, WalletExtMsgBodyV4, DEFAULT_SEND_MODE, DEFAULT_WALLET_ID,
    WALLET_V4R2_CODE,
};
use crate::cell::{ArcCell, Cell, CellBuilder, StateInit, TonCellError};
use crate::message::{CommonMsgInfo, TonMessage, TonMessageError, TransferMessage};
use crate::mnemonic::KeyPair;
use crate::types::TonHash;
use crate::TonAddress;

/// v4r2 wallet owned by a key pair.
#[derive(Debug, PartialEq, Clone)]
pub struct TonWallet {
    pub key_pair: KeyPair,
    pub address: TonAddress,
    pub workchain: i32,
    pub wallet_id: i32,
}

impl TonWallet {
    pub fn new(key_pair: KeyPair) -> Result<TonWallet, TonCellError> {
        Self::new_with_params(key_pair, 0)
    }

    pub fn new_with_params(key_pair: KeyPair, workchain: i32) -> Result<TonWallet, TonCellError> {
        let wallet_id = DEFAULT_WALLET_ID.wrapping_add(workchain);
        let state_init = build_state_init(&key_pair, wallet_id)?;
        let address = state_init.address(workchain)?;
        Ok(TonWallet {
            key_pair,
            address,
            workchain,
            wallet_id,
        })
    }

    pub fn state_init(&self) -> Result<StateInit, TonCellError> {
        build_state_init(&self.key_pair, self.wallet_id)
    }

    /// Unsigned body carrying `msgs`, each sent with mode 3.
    pub fn create_external_body(
        &self,
        valid_until: u32,
        seqno: u32,
        msgs: &[ArcCell],
    ) -> Result<Cell, TonCellError> {
        self.build_external_body(valid_until, seqno, vec![DEFAULT_SEND_MODE; msgs.len()], msgs.to_vec())
    }

    /// Prepends the signature of the body hash to the body.
    pub fn sign_external_body(&self, external_body: &Cell) -> Result<Cell, TonMessageError> {
        let signature = self.key_pair.sign(&external_body.cell_hash())?;
        let mut builder = CellBuilder::new();
        builder.store_slice(&signature)?;
        builder.store_cell(external_body)?;
        Ok(builder.build()?)
    }

    /// Wraps a signed body into an inbound external message to this wallet.
    ///
    /// `add_state_init` must be set while the wallet is not deployed yet.
    pub fn wrap_signed_body(
        &self,
        signed_body: Cell,
        add_state_init: bool,
    ) -> Result<Cell, TonMessageError> {
        let mut message = TransferMessage::new(CommonMsgInfo::new_external_in(&self.address));
        message.with_data(Arc::new(signed_body));
        if add_state_init {
            message.with_state_init(self.state_init()?.to_cell()?);
        }
        message.build()
    }

    pub fn create_external_msg(
        &self,
        valid_until: u32,
        seqno: u32,
        add_state_init: bool,
        msgs: &[ArcCell],
    ) -> Result<Cell, TonMessageError> {
        let body = self.create_external_body(valid_until, seqno, msgs)?;
        let signed = self.sign_external_body(&body)?;
        self.wrap_signed_body(signed, add_state_init)
    }

    /// Signed external message carrying every message of `request` with its own send mode.
    pub fn create_transfer(
        &self,
        request: &TransferRequest,
        add_state_init: bool,
    ) -> Result<Cell, TonMessageError> {
        let mut modes = Vec::with_capacity(request.messages.len());
        let mut msgs = Vec::with_capacity(request.messages.len());
        for out in &request.messages {
            modes.push(out.send_mode);
            msgs.push(out.build()?.to_arc());
        }
        let body = self.build_external_body(request.valid_until, request.seqno, modes, msgs)?;
        let signed = self.sign_external_body(&body)?;
        self.wrap_signed_body(signed, add_state_init)
    }

    fn build_external_body(
        &self,
        valid_until: u32,
        seqno: u32,
        msgs_modes: Vec<u8>,
        msgs: Vec<ArcCell>,
    ) -> Result<Cell, TonCellError> {
        WalletExtMsgBodyV4 {
            subwallet_id: self.wallet_id,
            valid_until,
            msg_seqno: seqno,
            opcode: 0,
            msgs_modes,
            msgs,
        }
        .to_cell()
    }
}

/// Expiration time of an external message sent at `now`.
///
/// The very first message of a wallet never expires.
pub fn valid_until(seqno: u32, now: u32, ttl: u32) -> u32 {
    if seqno == 0 {
        u32::MAX
    } else {
        now.saturating_add(ttl)
    }
}

fn build_state_init(key_pair: &KeyPair, wallet_id: i32) -> Result<StateInit, TonCellError> {
    let public_key: TonHash = key_pair.public_key.as_slice().try_into().map_err(|_| {
        TonCellError::InvalidCellData(format!(
            "Public key must be 32 bytes, got {}",
            key_pair.public_key.len()
        ))
    })?;
    let data = WalletDataV4::new(wallet_id, public_key).to_cell()?;
    Ok(StateInit::new(WALLET_V4R2_CODE.clone(), data.to_arc()))
}
