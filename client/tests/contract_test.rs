use std::str::FromStr;
use std::sync::Arc;

use jetton_core::TonAddress;
use jetton_deployer::client::{AccountStatus, TonRpcInterface};
use jetton_deployer::contract::{
    JettonMasterContract, TonContract, TonContractError, TonContractInterface, TonWalletContract,
};
use num_bigint::BigUint;
use tokio_test::{assert_err, assert_ok};

mod common;

use common::MockRpc;

const MINTER: &str = "EQDk2VTvn04SUKJrW7rXahzdF8_Qi6utb0wj43InCu9vdjrR";

#[tokio::test]
async fn wallet_contract_reads_state() -> anyhow::Result<()> {
    common::init_logging();
    let address = TonAddress::from_str(common::WALLET_ADDRESS)?;
    let client: Arc<dyn TonRpcInterface> = Arc::new(
        MockRpc::new()
            .with_balance(&address, 1_500_000_000)
            .with_statuses(&address, &[AccountStatus::Active])
            .with_seqno(&address, 19),
    );
    let contract = TonContract::new(&client, &address);

    assert_eq!(contract.address(), &address);
    assert_eq!(assert_ok!(contract.get_balance().await), BigUint::from(1_500_000_000u64));
    assert_eq!(assert_ok!(contract.get_account_status().await), AccountStatus::Active);
    assert_eq!(assert_ok!(contract.seqno().await), 19);
    Ok(())
}

#[tokio::test]
async fn seqno_of_missing_wallet_fails() -> anyhow::Result<()> {
    let address = TonAddress::from_str(common::WALLET_ADDRESS)?;
    let client: Arc<dyn TonRpcInterface> = Arc::new(MockRpc::new());
    let contract = TonContract::new(&client, &address);

    assert_eq!(assert_ok!(contract.get_balance().await), BigUint::default());
    let error = assert_err!(contract.seqno().await);
    assert!(matches!(error, TonContractError::TvmRunError { exit_code: -13, .. }));
    Ok(())
}

#[tokio::test]
async fn jetton_master_reads_jetton_data() -> anyhow::Result<()> {
    let minter = TonAddress::from_str(MINTER)?;
    let admin = TonAddress::from_str(common::WALLET_ADDRESS)?;
    let client: Arc<dyn TonRpcInterface> =
        Arc::new(MockRpc::new().with_jetton_admin(&minter, &admin));
    let contract = TonContract::new(&client, &minter);

    let data = assert_ok!(contract.get_jetton_data().await);
    assert_eq!(data.total_supply, BigUint::default());
    assert!(data.mintable);
    assert_eq!(data.admin_address, admin);
    assert_eq!(data.wallet_code, common::test_code()?.wallet);
    assert!(data.parse_content().is_err());
    Ok(())
}

#[tokio::test]
async fn rpc_errors_are_client_errors() -> anyhow::Result<()> {
    let address = TonAddress::from_str(common::WALLET_ADDRESS)?;
    let client: Arc<dyn TonRpcInterface> = Arc::new(MockRpc::new().failing("getAddressState"));
    let contract = TonContract::new(&client, &address);

    let error = assert_err!(contract.get_account_status().await);
    assert!(matches!(error, TonContractError::ClientError(_)));
    Ok(())
}
