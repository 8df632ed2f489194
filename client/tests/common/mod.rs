use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jetton_core::cell::{ArcCell, BagOfCells, Cell, CellBuilder, TonCellError};
use jetton_core::jetton::JettonMinterCode;
use jetton_core::TonAddress;
use jetton_deployer::client::{AccountStatus, TonFunction, TonRpcError, TonRpcInterface};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use log4rs::Config;
use num_bigint::BigUint;
use serde_json::{json, Value};

#[allow(dead_code)]
pub const MNEMONIC: &str = "fancy carpet hello mandate penalty trial consider property top vicious exit rebuild tragic profit urban major total month holiday sudden rib gather media vicious";
#[allow(dead_code)]
pub const WALLET_ADDRESS: &str = "EQCDM_QGggZ3qMa_f3lRPk4_qLDnLTqdi6OkMAV2NB9r5TG3";
#[allow(dead_code)]
pub const METADATA_URI: &str = "https://yourdomain.com/metadata.json";

#[allow(dead_code)]
static LOG: Once = Once::new();

#[allow(dead_code)]
pub fn init_logging() {
    LOG.call_once(|| {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(log4rs::encode::pattern::PatternEncoder::new(
                "{d(%Y-%m-%d %H:%M:%S%.6f)} {T:>15.15} {h({l:>5.5})} {t}:{L} - {m}{n}",
            )))
            .build();

        let config = Config::builder()
            .appender(Appender::builder().build("stderr", Box::new(stderr)))
            .build(Root::builder().appender("stderr").build(LevelFilter::Info))
            .unwrap();

        log4rs::init_config(config).unwrap();
    })
}

#[allow(dead_code)]
pub fn test_code() -> Result<JettonMinterCode, TonCellError> {
    Ok(JettonMinterCode {
        minter: CellBuilder::new().store_u32(32, 0x4d494e54)?.build()?.to_arc(),
        wallet: CellBuilder::new().store_u32(32, 0x57414c4c)?.build()?.to_arc(),
    })
}

/// In-memory toncenter: canned account states, records submitted messages.
#[derive(Default)]
pub struct MockRpc {
    state: Mutex<MockState>,
}

#[derive(Default)]
pub struct MockState {
    pub balances: HashMap<TonAddress, BigUint>,
    /// Consumed front to back; the last status sticks.
    pub statuses: HashMap<TonAddress, Vec<AccountStatus>>,
    pub seqnos: HashMap<TonAddress, u32>,
    pub jetton_data: HashMap<TonAddress, Value>,
    pub failing: HashSet<&'static str>,
    pub calls: Vec<&'static str>,
    pub sent: Vec<ArcCell>,
}

#[allow(dead_code)]
impl MockRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(self, address: &TonAddress, balance: u64) -> Self {
        self.update(|s| {
            s.balances.insert(address.clone(), BigUint::from(balance));
        })
    }

    pub fn with_statuses(self, address: &TonAddress, statuses: &[AccountStatus]) -> Self {
        self.update(|s| {
            s.statuses.insert(address.clone(), statuses.to_vec());
        })
    }

    pub fn with_seqno(self, address: &TonAddress, seqno: u32) -> Self {
        self.update(|s| {
            s.seqnos.insert(address.clone(), seqno);
        })
    }

    pub fn with_jetton_admin(self, minter: &TonAddress, admin: &TonAddress) -> Self {
        let admin_slice = CellBuilder::new()
            .store_address(admin)
            .and_then(|b| b.build())
            .expect("address fits into a cell");
        let code = test_code().expect("test code builds");
        let data = json!({
            "@type": "smc.runResult",
            "gas_used": 0,
            "exit_code": 0,
            "stack": [
                ["num", "0x0"],
                ["num", "-0x1"],
                ["cell", {"bytes": boc(&admin_slice)}],
                ["cell", {"bytes": boc(&Cell::default())}],
                ["cell", {"bytes": boc(&code.wallet)}]
            ]
        });
        self.update(|s| {
            s.jetton_data.insert(minter.clone(), data);
        })
    }

    pub fn failing(self, method: &'static str) -> Self {
        self.update(|s| {
            s.failing.insert(method);
        })
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn sent(&self) -> Vec<ArcCell> {
        self.state.lock().unwrap().sent.clone()
    }

    fn update<F: FnOnce(&mut MockState)>(self, f: F) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }
}

fn boc(cell: &Cell) -> String {
    cell.to_boc_b64(true).expect("cell serializes")
}

fn parse_address(method: &'static str, address: &str) -> Result<TonAddress, TonRpcError> {
    TonAddress::from_str(address).map_err(|e| TonRpcError::ApiError {
        method,
        code: 416,
        message: e.to_string(),
    })
}

#[async_trait]
impl TonRpcInterface for MockRpc {
    async fn invoke(&self, function: &TonFunction) -> Result<Value, TonRpcError> {
        let method = function.method();
        let mut state = self.state.lock().unwrap();
        state.calls.push(method);
        if state.failing.contains(method) {
            return Err(TonRpcError::ApiError {
                method,
                code: 500,
                message: "LITE_SERVER_UNKNOWN".to_string(),
            });
        }

        match function {
            TonFunction::GetAddressBalance { address } => {
                let address = parse_address(method, address)?;
                let balance = state.balances.get(&address).cloned().unwrap_or_default();
                Ok(json!(balance.to_string()))
            }
            TonFunction::GetAddressState { address } => {
                let address = parse_address(method, address)?;
                let status = match state.statuses.get_mut(&address) {
                    Some(statuses) if statuses.len() > 1 => statuses.remove(0),
                    Some(statuses) => statuses
                        .first()
                        .copied()
                        .unwrap_or(AccountStatus::Uninitialized),
                    None => AccountStatus::Uninitialized,
                };
                Ok(json!(status.to_string()))
            }
            TonFunction::RunGetMethod {
                address,
                method: get_method,
                ..
            } => {
                let address = parse_address(method, address)?;
                let not_found = json!({"exit_code": -13, "gas_used": 0, "stack": []});
                match get_method.as_str() {
                    "seqno" => Ok(match state.seqnos.get(&address) {
                        Some(seqno) => json!({
                            "exit_code": 0,
                            "gas_used": 0,
                            "stack": [["num", format!("0x{:x}", seqno)]]
                        }),
                        None => not_found,
                    }),
                    "get_jetton_data" => Ok(state
                        .jetton_data
                        .get(&address)
                        .cloned()
                        .unwrap_or(not_found)),
                    _ => Ok(not_found),
                }
            }
            TonFunction::SendBocReturnHash { boc } => {
                let bytes = STANDARD
                    .decode(boc)
                    .map_err(|e| TonRpcError::invalid_response(method, e))?;
                let cell = BagOfCells::parse(&bytes)
                    .and_then(|b| b.single_root())
                    .map_err(|e| TonRpcError::invalid_response(method, e))?;
                let hash = cell.cell_hash_base64();
                state.sent.push(cell);
                Ok(json!({"@type": "raw.extMessageInfo", "hash": hash}))
            }
        }
    }
}
