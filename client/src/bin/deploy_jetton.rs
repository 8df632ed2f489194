use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use jetton_deployer::config::{DeploySecrets, DeployerConfig, ENV_LOG};
use jetton_deployer::deployer::JettonDeployer;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.6f)} {h({l:>5.5})} {t} - {m}{n}";

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn init_logging() -> anyhow::Result<()> {
    let level = env_var(ENV_LOG)
        .and_then(|l| LevelFilter::from_str(l.trim()).ok())
        .unwrap_or(LevelFilter::Info);
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = DeployerConfig::load(env_var).context("Failed to load configuration")?;
    let secrets = DeploySecrets::from_env(env_var)?;
    let request = config.to_request(secrets)?;
    let client = config
        .client_builder()
        .build()
        .context("Failed to create RPC client")?;
    log::debug!("Using endpoint {}", client.endpoint());

    let deployer = JettonDeployer::new(Arc::new(client));
    let report = deployer.deploy(&request).await?;
    log::info!(
        "Deployment {}: minter {}, message hash {}",
        report.status,
        report.minter_address.to_base64_url_flags(false, config.testnet),
        report.message_hash
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {e:#}");
        std::process::exit(1);
    }
    if let Err(e) = run().await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
