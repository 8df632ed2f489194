use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jetton_core::cell::{ArcCell, BagOfCells};
use jetton_core::TonAddress;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_json::{json, Value};
use strum::Display;

use crate::types::StackParseError;

/// Element of a TVM stack in toncenter's `[type, value]` notation.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum StackEntry {
    Null,
    Number(BigInt),
    Cell(ArcCell),
    Slice(ArcCell),
    Unsupported(String),
}

/// Result of `runGetMethod`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunGetMethodResult {
    pub exit_code: i32,
    pub gas_used: i64,
    pub stack: Vec<StackEntry>,
}

#[derive(Deserialize)]
struct RawRunResult {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    exit_code: i32,
    #[serde(default, deserialize_with = "deserialize_number_from_string")]
    gas_used: i64,
    #[serde(default)]
    stack: Vec<(String, Value)>,
}

impl RunGetMethodResult {
    pub fn from_json(value: Value) -> Result<Self, StackParseError> {
        let raw: RawRunResult = serde_json::from_value(value)
            .map_err(|e| StackParseError::InvalidEntryValue(e.to_string()))?;
        let stack = raw
            .stack
            .iter()
            .map(|(tp, value)| StackEntry::from_json(tp, value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RunGetMethodResult {
            exit_code: raw.exit_code,
            gas_used: raw.gas_used,
            stack,
        })
    }
}

impl StackEntry {
    pub fn from_json(tp: &str, value: &Value) -> Result<StackEntry, StackParseError> {
        match tp {
            "num" | "int" | "number" => {
                let s = value.as_str().ok_or_else(|| {
                    StackParseError::InvalidEntryValue(format!("number expected, got {value}"))
                })?;
                Ok(StackEntry::Number(parse_number(s)?))
            }
            "cell" | "tvm.Cell" => Ok(StackEntry::Cell(parse_boc(value)?)),
            "slice" | "tvm.Slice" => Ok(StackEntry::Slice(parse_boc(value)?)),
            "null" => Ok(StackEntry::Null),
            other => Ok(StackEntry::Unsupported(other.to_string())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            StackEntry::Null => json!(["null", Value::Null]),
            StackEntry::Number(n) => {
                let sign = if n.sign() == Sign::Minus { "-" } else { "" };
                json!(["num", format!("{sign}0x{:x}", n.magnitude())])
            }
            StackEntry::Cell(cell) => json!(["tvm.Cell", boc_base64(cell)]),
            StackEntry::Slice(cell) => json!(["tvm.Slice", boc_base64(cell)]),
            StackEntry::Unsupported(tp) => json!([tp, Value::Null]),
        }
    }

    pub fn get_bigint(&self) -> Result<BigInt, StackParseError> {
        match self {
            StackEntry::Number(n) => Ok(n.clone()),
            t => Err(StackParseError::InvalidEntryType {
                expected: "Number".to_string(),
                found: t.clone(),
            }),
        }
    }

    pub fn get_biguint(&self) -> Result<BigUint, StackParseError> {
        let n = self.get_bigint()?;
        n.to_biguint().ok_or_else(|| {
            StackParseError::InvalidEntryValue(format!("expected non-negative number, found {n}"))
        })
    }

    pub fn get_i64(&self) -> Result<i64, StackParseError> {
        let n = self.get_bigint()?;
        i64::try_from(&n).map_err(|_| {
            StackParseError::InvalidEntryValue("Received number exceeds i64".to_string())
        })
    }

    pub fn get_bool(&self) -> Result<bool, StackParseError> {
        Ok(!self.get_bigint()?.is_zero())
    }

    pub fn get_cell(&self) -> Result<ArcCell, StackParseError> {
        match self {
            StackEntry::Cell(cell) | StackEntry::Slice(cell) => Ok(cell.clone()),
            t => Err(StackParseError::InvalidEntryType {
                expected: "Cell".to_string(),
                found: t.clone(),
            }),
        }
    }

    pub fn get_address(&self) -> Result<TonAddress, StackParseError> {
        let cell = self.get_cell()?;
        Ok(cell.parser().load_address()?)
    }
}

fn parse_number(s: &str) -> Result<BigInt, StackParseError> {
    let invalid = || StackParseError::InvalidEntryValue(format!("invalid number: {s}"));
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let n = match digits.strip_prefix("0x") {
        Some(hex) => BigInt::parse_bytes(hex.as_bytes(), 16),
        None => BigInt::parse_bytes(digits.as_bytes(), 10),
    }
    .ok_or_else(invalid)?;
    Ok(if negative { -n } else { n })
}

fn parse_boc(value: &Value) -> Result<ArcCell, StackParseError> {
    let b64 = value
        .get("bytes")
        .and_then(Value::as_str)
        .or_else(|| value.as_str())
        .ok_or_else(|| StackParseError::InvalidEntryValue(format!("BoC expected, got {value}")))?;
    Ok(BagOfCells::parse_base64(b64)?.single_root()?)
}

fn boc_base64(cell: &ArcCell) -> String {
    // a cell taken from a parsed BoC always serializes
    cell.to_boc(false)
        .map(|boc| STANDARD.encode(boc))
        .unwrap_or_default()
}
