use std::str::FromStr;
use std::sync::{Arc, Mutex, Once};

use jetton_core::TonAddress;
use jetton_deployer::deployer::{DeployError, DeployRequest, JettonDeployer};
use log::{LevelFilter, Log, Metadata, Record};
use num_bigint::BigUint;
use tokio_test::assert_err;

mod common;

use common::MockRpc;

/// Keeps every formatted message so tests can inspect what an operator would see.
struct CapturingLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    lines: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

fn captured() -> Vec<String> {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Info);
    });
    LOGGER.lines.lock().unwrap().clone()
}

fn request(testnet: bool) -> anyhow::Result<DeployRequest> {
    Ok(DeployRequest {
        mnemonic: common::MNEMONIC.to_string(),
        mnemonic_password: None,
        metadata_uri: common::METADATA_URI.to_string(),
        code: common::test_code()?,
        deploy_value: BigUint::from(50_000_000u32),
        message_ttl_secs: 60,
        premint: None,
        confirmation: None,
        testnet,
    })
}

#[tokio::test]
async fn wallet_address_is_logged_before_balance_query() -> anyhow::Result<()> {
    captured();
    let client = Arc::new(MockRpc::new().failing("getAddressBalance"));
    let deployer = JettonDeployer::new(client.clone());

    let error = assert_err!(deployer.deploy(&request(false)?).await);
    assert!(matches!(error, DeployError::Network(_)));
    assert_eq!(client.calls(), vec!["getAddressBalance"]);

    let expected = format!("Wallet address: {}", common::WALLET_ADDRESS);
    assert!(captured().contains(&expected));
    Ok(())
}

#[tokio::test]
async fn testnet_deploy_logs_testnet_addresses() -> anyhow::Result<()> {
    captured();
    let wallet = TonAddress::from_str(common::WALLET_ADDRESS)?;
    let client = Arc::new(MockRpc::new().with_balance(&wallet, 10));
    let deployer = JettonDeployer::new(client);

    let error = assert_err!(deployer.deploy(&request(true)?).await);
    assert!(matches!(error, DeployError::InsufficientBalance { .. }));

    let lines = captured();
    let expected = format!("Wallet address: {}", wallet.to_base64_url_flags(false, true));
    assert!(lines.contains(&expected));
    let minter_line = lines
        .iter()
        .find(|l| l.starts_with("Jetton address will be: "))
        .cloned()
        .unwrap_or_default();
    let minter = minter_line.trim_start_matches("Jetton address will be: ");
    assert!(TonAddress::from_base64_url_flags(minter)?.2);
    Ok(())
}
