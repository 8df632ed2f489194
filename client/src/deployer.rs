use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub use error::*;
use jetton_core::jetton::{JettonContent, JettonError, JettonMinter, JettonMinterCode, Premint};
use jetton_core::mnemonic::Mnemonic;
use jetton_core::types::format_nano;
use jetton_core::wallet::{valid_until, OutMessage, TonWallet, TransferRequest};
use jetton_core::TonAddress;
use num_bigint::BigUint;
pub use report::*;

use crate::client::{AccountStatus, TonRpcInterface};
use crate::config::ConfirmationConfig;
use crate::contract::{
    JettonMasterContract, TonContract, TonContractError, TonContractInterface, TonWalletContract,
};

mod error;
mod report;

/// Everything needed for one deployment.
#[derive(Clone, PartialEq)]
pub struct DeployRequest {
    pub mnemonic: String,
    pub mnemonic_password: Option<String>,
    pub metadata_uri: String,
    pub code: JettonMinterCode,
    /// Nanotons attached to the deployment message.
    pub deploy_value: BigUint,
    pub message_ttl_secs: u32,
    pub premint: Option<Premint>,
    pub confirmation: Option<ConfirmationConfig>,
    /// Addresses are logged in the testnet form.
    pub testnet: bool,
}

impl Debug for DeployRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployRequest")
            .field("mnemonic", &"***REDACTED***")
            .field(
                "mnemonic_password",
                &self.mnemonic_password.as_ref().map(|_| "***REDACTED***"),
            )
            .field("metadata_uri", &self.metadata_uri)
            .field("deploy_value", &self.deploy_value)
            .field("message_ttl_secs", &self.message_ttl_secs)
            .field("premint", &self.premint)
            .field("confirmation", &self.confirmation)
            .field("testnet", &self.testnet)
            .finish()
    }
}

/// Deploys a jetton minter owned and administered by the wallet of a seed phrase.
pub struct JettonDeployer {
    client: Arc<dyn TonRpcInterface>,
}

impl JettonDeployer {
    pub fn new(client: Arc<dyn TonRpcInterface>) -> JettonDeployer {
        JettonDeployer { client }
    }

    pub async fn deploy(&self, request: &DeployRequest) -> Result<DeployReport, DeployError> {
        let key_pair =
            Mnemonic::from_str(&request.mnemonic, &request.mnemonic_password)?.to_key_pair()?;
        let wallet = TonWallet::new(key_pair).map_err(JettonError::from)?;
        let wallet_contract = TonContract::new(&self.client, &wallet.address);
        log::info!(
            "Wallet address: {}",
            display_address(&wallet.address, request.testnet)
        );

        let balance = wallet_contract
            .get_balance()
            .await
            .map_err(DeployError::Network)?;
        log::info!("Wallet balance: {} TON", format_nano(&balance));

        let content = JettonContent::offchain(&request.metadata_uri);
        let minter = JettonMinter::new(&wallet.address, content, &wallet.address, &request.code)?;
        log::info!(
            "Jetton address will be: {}",
            display_address(&minter.address, request.testnet)
        );

        if balance < request.deploy_value {
            return Err(DeployError::InsufficientBalance {
                balance,
                required: request.deploy_value.clone(),
            });
        }

        let wallet_status = wallet_contract
            .get_account_status()
            .await
            .map_err(DeployError::Network)?;
        let seqno = match wallet_status {
            AccountStatus::Active => wallet_contract.seqno().await.map_err(DeployError::Network)?,
            _ => 0,
        };
        log::debug!("Wallet status: {}, seqno: {}", wallet_status, seqno);

        let body = minter.build_deploy_body(request.premint.as_ref())?;
        let deploy_message = OutMessage::new(&minter.address, &request.deploy_value)
            .with_bounce(false)
            .with_state_init(minter.state_init_cell()?)
            .with_body(body);
        let now = unix_time(SystemTime::now())?;
        let transfer = TransferRequest {
            seqno,
            valid_until: valid_until(seqno, now, request.message_ttl_secs),
            messages: vec![deploy_message],
        };
        let external_message = wallet
            .create_transfer(&transfer, wallet_status != AccountStatus::Active)
            .map_err(JettonError::from)?;

        let message_hash = wallet_contract
            .send_external_message(&external_message)
            .await
            .map_err(DeployError::Submission)?;
        log::info!("Deployment message sent!");

        let status = match &request.confirmation {
            Some(confirmation) => {
                self.wait_for_minter(&minter, &wallet.address, confirmation, request.testnet)
                    .await?;
                DeploymentStatus::Confirmed
            }
            None => DeploymentStatus::Submitted,
        };

        Ok(DeployReport {
            wallet_address: wallet.address.clone(),
            wallet_balance: balance,
            minter_address: minter.address.clone(),
            seqno,
            message_hash,
            status,
        })
    }

    async fn wait_for_minter(
        &self,
        minter: &JettonMinter,
        admin: &TonAddress,
        confirmation: &ConfirmationConfig,
        testnet: bool,
    ) -> Result<(), DeployError> {
        let contract = TonContract::new(&self.client, &minter.address);
        for attempt in 1..=confirmation.max_attempts {
            tokio::time::sleep(Duration::from_millis(confirmation.poll_interval_ms)).await;
            let status = contract
                .get_account_status()
                .await
                .map_err(DeployError::Network)?;
            log::debug!("Minter status: {} (attempt {})", status, attempt);
            if status != AccountStatus::Active {
                continue;
            }

            let data = contract
                .get_jetton_data()
                .await
                .map_err(DeployError::Contract)?;
            if &data.admin_address != admin {
                return Err(DeployError::Contract(TonContractError::UnexpectedValue {
                    method: "get_jetton_data".to_string(),
                    address: minter.address.clone(),
                    message: format!("admin is {}, expected {}", data.admin_address, admin),
                }));
            }
            log::info!(
                "Jetton minter is active: {}",
                display_address(&minter.address, testnet)
            );
            return Ok(());
        }
        Err(DeployError::ConfirmationTimeout {
            address: minter.address.clone(),
            attempts: confirmation.max_attempts,
        })
    }
}

/// Bounceable user-friendly form, flagged as testnet when deploying there.
fn display_address(address: &TonAddress, testnet: bool) -> String {
    address.to_base64_url_flags(false, testnet)
}

fn unix_time(now: SystemTime) -> Result<u32, DeployError> {
    let secs = now.duration_since(UNIX_EPOCH)?.as_secs();
    Ok(secs.min(u32::MAX as u64) as u32)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::time::{Duration, UNIX_EPOCH};

    use jetton_core::TonAddress;

    use super::{display_address, unix_time, DeployError};

    #[test]
    fn clock_before_epoch_is_an_error() -> anyhow::Result<()> {
        assert_eq!(unix_time(UNIX_EPOCH + Duration::from_secs(1_739_403_913))?, 1_739_403_913);
        assert_eq!(unix_time(UNIX_EPOCH + Duration::from_secs(1 << 33))?, u32::MAX);
        let before_epoch = UNIX_EPOCH - Duration::from_secs(1);
        assert!(matches!(unix_time(before_epoch), Err(DeployError::Clock(_))));
        Ok(())
    }

    #[test]
    fn testnet_addresses_are_flagged() -> anyhow::Result<()> {
        let address = TonAddress::from_str("EQCDM_QGggZ3qMa_f3lRPk4_qLDnLTqdi6OkMAV2NB9r5TG3")?;
        assert_eq!(
            display_address(&address, false),
            "EQCDM_QGggZ3qMa_f3lRPk4_qLDnLTqdi6OkMAV2NB9r5TG3"
        );
        assert_eq!(
            display_address(&address, true),
            "kQCDM_QGggZ3qMa_f3lRPk4_qLDnLTqdi6OkMAV2NB9r5Yo9"
        );
        Ok(())
    }
}
