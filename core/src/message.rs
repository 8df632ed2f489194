mod error;
pub use error::*;
use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::Zero;

mod common_msg_info;
pub use common_msg_info::*;

use crate::cell::Cell;

mod jetton;
mod transfer;
pub use jetton::*;
pub use transfer::*;

lazy_static! {
    pub(crate) static ref ZERO_COINS: BigUint = BigUint::zero();
}

pub trait TonMessage: Sized {
    fn build(&self) -> Result<Cell, TonMessageError>;

    fn parse(cell: &Cell) -> Result<Self, TonMessageError>;
}

pub trait HasOpcode: TonMessage {
    fn verify_opcode(&self, opcode: u32) -> Result<(), TonMessageError> {
        let expected_opcode = Self::opcode();
        if opcode != expected_opcode {
            let invalid = InvalidMessage {
                opcode: Some(opcode),
                query_id: Some(self.query_id()),
                message: format!("Unexpected opcode.  {0:08x} expected", expected_opcode),
            };
            Err(TonMessageError::InvalidMessage(invalid))
        } else {
            Ok(())
        }
    }

    fn opcode() -> u32;

    fn with_query_id(&mut self, query_id: u64) -> &mut Self {
        self.set_query_id(query_id);
        self
    }

    fn set_query_id(&mut self, query_id: u64);

    fn query_id(&self) -> u64;
}
