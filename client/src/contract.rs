use std::sync::Arc;

use async_trait::async_trait;
pub use error::*;
pub use interface::*;
pub use jetton::*;
use jetton_core::TonAddress;
pub use wallet::*;

use crate::client::TonRpcInterface;

mod error;
mod interface;
mod jetton;
mod wallet;

/// Handle of an account at a known address.
#[derive(Clone)]
pub struct TonContract {
    client: Arc<dyn TonRpcInterface>,
    address: TonAddress,
}

impl TonContract {
    pub fn new(client: &Arc<dyn TonRpcInterface>, address: &TonAddress) -> TonContract {
        TonContract {
            client: client.clone(),
            address: address.clone(),
        }
    }
}

#[async_trait]
impl TonContractInterface for TonContract {
    fn client(&self) -> &dyn TonRpcInterface {
        self.client.as_ref()
    }

    fn address(&self) -> &TonAddress {
        &self.address
    }
}
