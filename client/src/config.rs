use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub use error::*;
use jetton_core::cell::{ArcCell, BagOfCells, TonCellError};
use jetton_core::jetton::{JettonMinterCode, Premint};
use jetton_core::types::{format_nano, parse_nano};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::client::{
    RetryStrategy, TonCenterClientBuilder, DEFAULT_REQUEST_TIMEOUT_MS, MAINNET_ENDPOINT,
    TESTNET_ENDPOINT,
};
use crate::deployer::DeployRequest;

mod error;

pub const ENV_CONFIG: &str = "JETTON_DEPLOYER_CONFIG";
pub const ENV_MNEMONIC: &str = "JETTON_DEPLOYER_MNEMONIC";
pub const ENV_MNEMONIC_PASSWORD: &str = "JETTON_DEPLOYER_MNEMONIC_PASSWORD";
pub const ENV_METADATA_URI: &str = "JETTON_DEPLOYER_METADATA_URI";
pub const ENV_ENDPOINT: &str = "JETTON_DEPLOYER_ENDPOINT";
pub const ENV_API_KEY: &str = "JETTON_DEPLOYER_API_KEY";
pub const ENV_MINTER_CODE: &str = "JETTON_DEPLOYER_MINTER_CODE";
pub const ENV_WALLET_CODE: &str = "JETTON_DEPLOYER_WALLET_CODE";
pub const ENV_TESTNET: &str = "JETTON_DEPLOYER_TESTNET";
pub const ENV_LOG: &str = "JETTON_DEPLOYER_LOG";

pub const DEFAULT_DEPLOY_VALUE: &str = "0.05";
/// Must stay below the deploy value: the minter pays the mint fees from what remains.
pub const DEFAULT_PREMINT_FORWARD_VALUE: &str = "0.02";
pub const DEFAULT_MESSAGE_TTL_SECS: u32 = 60;

const BOC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];

/// Non-secret deployer settings: a JSON file overlaid with environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployerConfig {
    /// Explicit JSON-RPC endpoint; toncenter mainnet or testnet otherwise.
    pub endpoint: Option<String>,
    pub testnet: bool,
    pub api_key: Option<String>,
    pub metadata_uri: Option<String>,
    pub minter_code: Option<PathBuf>,
    pub wallet_code: Option<PathBuf>,
    /// TON attached to the deployment message, e.g. `"0.05"`.
    pub deploy_value: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub message_ttl_secs: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_ms: u64,
    pub retry: RetryStrategy,
    pub premint: Option<PremintConfig>,
    pub confirmation: Option<ConfirmationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PremintConfig {
    /// Jetton amount in the smallest units.
    pub amount: String,
    #[serde(default = "default_forward_value")]
    pub forward_value: String,
    #[serde(default, deserialize_with = "deserialize_number_from_string")]
    pub query_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfirmationConfig {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_interval_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_attempts: usize,
}

/// Secrets are read from the environment only.
#[derive(Clone, PartialEq)]
pub struct DeploySecrets {
    pub mnemonic: String,
    pub mnemonic_password: Option<String>,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        DeployerConfig {
            endpoint: None,
            testnet: false,
            api_key: None,
            metadata_uri: None,
            minter_code: None,
            wallet_code: None,
            deploy_value: DEFAULT_DEPLOY_VALUE.to_string(),
            message_ttl_secs: DEFAULT_MESSAGE_TTL_SECS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            retry: RetryStrategy::default(),
            premint: None,
            confirmation: None,
        }
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        ConfirmationConfig {
            poll_interval_ms: 3000,
            max_attempts: 20,
        }
    }
}

fn default_forward_value() -> String {
    DEFAULT_PREMINT_FORWARD_VALUE.to_string()
}

impl DeployerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reads the file named by `JETTON_DEPLOYER_CONFIG`, if any, and applies environment overrides.
    pub fn load<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Environment values take precedence over the file.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(uri) = lookup(ENV_METADATA_URI) {
            self.metadata_uri = Some(uri);
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = Some(endpoint);
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.api_key = Some(api_key);
        }
        if let Some(path) = lookup(ENV_MINTER_CODE) {
            self.minter_code = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(ENV_WALLET_CODE) {
            self.wallet_code = Some(PathBuf::from(path));
        }
        if let Some(testnet) = lookup(ENV_TESTNET) {
            self.testnet = bool::from_str(testnet.trim().to_lowercase().as_str())
                .map_err(|e| ConfigError::invalid_value("testnet", e))?;
        }
        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        match &self.endpoint {
            Some(endpoint) => endpoint,
            None if self.testnet => TESTNET_ENDPOINT,
            None => MAINNET_ENDPOINT,
        }
    }

    pub fn client_builder(&self) -> TonCenterClientBuilder {
        let mut builder = TonCenterClientBuilder::new();
        builder
            .with_endpoint(self.endpoint())
            .with_api_key(self.api_key.clone())
            .with_retry_strategy(&self.retry)
            .with_request_timeout(Duration::from_millis(self.request_timeout_ms));
        builder
    }

    /// Validates the settings and loads the contract code they point to.
    pub fn to_request(&self, secrets: DeploySecrets) -> Result<DeployRequest, ConfigError> {
        let metadata_uri = self
            .metadata_uri
            .clone()
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(ConfigError::MissingField("metadata_uri"))?;
        let deploy_value =
            parse_nano(&self.deploy_value).map_err(|e| ConfigError::invalid_value("deploy_value", e))?;
        let premint = self.premint.as_ref().map(PremintConfig::to_premint).transpose()?;
        if let Some(premint) = &premint {
            if premint.forward_value >= deploy_value {
                return Err(ConfigError::invalid_value(
                    "premint.forward_value",
                    format!(
                        "{} TON leaves nothing of the {} TON deploy value for mint fees",
                        format_nano(&premint.forward_value),
                        format_nano(&deploy_value)
                    ),
                ));
            }
        }
        let minter_code = self
            .minter_code
            .as_ref()
            .ok_or(ConfigError::MissingField("minter_code"))?;
        let wallet_code = self
            .wallet_code
            .as_ref()
            .ok_or(ConfigError::MissingField("wallet_code"))?;
        let code = JettonMinterCode {
            minter: load_code(minter_code)?,
            wallet: load_code(wallet_code)?,
        };

        Ok(DeployRequest {
            mnemonic: secrets.mnemonic,
            mnemonic_password: secrets.mnemonic_password,
            metadata_uri,
            code,
            deploy_value,
            message_ttl_secs: self.message_ttl_secs,
            premint,
            confirmation: self.confirmation.clone(),
            testnet: self.testnet,
        })
    }
}

impl PremintConfig {
    pub fn to_premint(&self) -> Result<Premint, ConfigError> {
        let amount = BigUint::from_str(self.amount.trim())
            .map_err(|e| ConfigError::invalid_value("premint.amount", e))?;
        let forward_value = parse_nano(&self.forward_value)
            .map_err(|e| ConfigError::invalid_value("premint.forward_value", e))?;
        Ok(Premint {
            amount,
            forward_value,
            query_id: self.query_id,
        })
    }
}

impl DeploySecrets {
    pub fn from_env<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mnemonic = lookup(ENV_MNEMONIC)
            .filter(|m| !m.trim().is_empty())
            .ok_or(ConfigError::MissingField(ENV_MNEMONIC))?;
        let mnemonic_password = lookup(ENV_MNEMONIC_PASSWORD).filter(|p| !p.is_empty());
        Ok(DeploySecrets {
            mnemonic,
            mnemonic_password,
        })
    }
}

impl Debug for DeploySecrets {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploySecrets")
            .field("mnemonic", &"***REDACTED***")
            .field(
                "mnemonic_password",
                &self.mnemonic_password.as_ref().map(|_| "***REDACTED***"),
            )
            .finish()
    }
}

/// Loads a single-root BoC stored as binary, hex or base64.
pub fn load_code<P: AsRef<Path>>(path: P) -> Result<ArcCell, ConfigError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_code(&bytes).map_err(|source| ConfigError::InvalidCode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_code(bytes: &[u8]) -> Result<ArcCell, TonCellError> {
    if bytes.starts_with(&BOC_MAGIC) {
        return BagOfCells::parse(bytes)?.single_root();
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|e| TonCellError::boc_deserialization_error(e.to_string()))?
        .trim();
    let boc = if text.chars().all(|c| c.is_ascii_hexdigit()) {
        BagOfCells::parse_hex(text)?
    } else {
        BagOfCells::parse_base64(text)?
    };
    boc.single_root()
}
