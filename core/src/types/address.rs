use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use crc::Crc;
use lazy_static::lazy_static;

use super::{TonAddressParseError, TonHash, ZERO_HASH};

lazy_static! {
    pub static ref CRC_16_XMODEM: Crc<u16> = Crc::<u16>::new(&crc::CRC_16_XMODEM);
}

const FRIENDLY_ADDRESS_LEN: usize = 48;

#[derive(PartialEq, Eq, Clone, Hash)]
pub struct TonAddress {
    pub workchain: i32,
    pub hash_part: TonHash,
}

impl TonAddress {
    pub const NULL: TonAddress = TonAddress {
        workchain: 0,
        hash_part: ZERO_HASH,
    };

    pub fn new(workchain: i32, hash_part: &TonHash) -> TonAddress {
        TonAddress {
            workchain,
            hash_part: *hash_part,
        }
    }

    pub fn null() -> TonAddress {
        TonAddress::NULL.clone()
    }

    /// Parses raw form `<workchain>:<64 hex chars>`
    pub fn from_hex_str(s: &str) -> Result<TonAddress, TonAddressParseError> {
        let (wc_str, hash_str) = s.split_once(':').ok_or_else(|| {
            TonAddressParseError::new(s, "Invalid hex address string: wrong address format")
        })?;

        let workchain = wc_str.parse::<i32>().map_err(|_| {
            TonAddressParseError::new(s, "Invalid hex address string: parse int error")
        })?;

        let hash_part: TonHash = hex::decode(hash_str)
            .map_err(|_| TonAddressParseError::new(s, "Invalid hex address string: hex decode error"))?
            .as_slice()
            .try_into()
            .map_err(|_| TonAddressParseError::new(s, "Invalid hex address string: wrong length"))?;

        Ok(TonAddress::new(workchain, &hash_part))
    }

    pub fn from_base64_url(s: &str) -> Result<TonAddress, TonAddressParseError> {
        Ok(Self::from_base64_url_flags(s)?.0)
    }

    /// Parses url-safe base64 representation of an address
    ///
    /// # Returns
    /// the address, non-bounceable flag, non-production flag.
    pub fn from_base64_url_flags(
        s: &str,
    ) -> Result<(TonAddress, bool, bool), TonAddressParseError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| TonAddressParseError::new(s, "Invalid base64url address: decode error"))?;
        Self::from_friendly_bytes(&bytes, s)
    }

    /// Parses standard base64 representation of an address
    pub fn from_base64_std(s: &str) -> Result<TonAddress, TonAddressParseError> {
        let bytes = STANDARD_NO_PAD
            .decode(s)
            .map_err(|_| TonAddressParseError::new(s, "Invalid base64std address: decode error"))?;
        Ok(Self::from_friendly_bytes(&bytes, s)?.0)
    }

    fn from_friendly_bytes(
        bytes: &[u8],
        src: &str,
    ) -> Result<(TonAddress, bool, bool), TonAddressParseError> {
        let bytes: &[u8; 36] = bytes
            .try_into()
            .map_err(|_| TonAddressParseError::new(src, "Invalid friendly address: wrong length"))?;
        let (non_production, non_bounceable) = match bytes[0] {
            0x11 => (false, false),
            0x51 => (false, true),
            0x91 => (true, false),
            0xD1 => (true, true),
            _ => {
                return Err(TonAddressParseError::new(
                    src,
                    "Invalid friendly address: wrong tag byte",
                ))
            }
        };
        let workchain = bytes[1] as i8 as i32;
        let calc_crc = CRC_16_XMODEM.checksum(&bytes[0..34]);
        let addr_crc = u16::from_be_bytes([bytes[34], bytes[35]]);
        if calc_crc != addr_crc {
            return Err(TonAddressParseError::new(
                src,
                "Invalid friendly address: CRC mismatch",
            ));
        }
        let mut hash_part = ZERO_HASH;
        hash_part.copy_from_slice(&bytes[2..34]);
        Ok((TonAddress::new(workchain, &hash_part), non_bounceable, non_production))
    }

    pub fn to_hex(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash_part))
    }

    pub fn to_base64_url(&self) -> String {
        self.to_base64_url_flags(false, false)
    }

    pub fn to_base64_url_flags(&self, non_bounceable: bool, non_production: bool) -> String {
        URL_SAFE_NO_PAD.encode(self.to_friendly_bytes(non_bounceable, non_production))
    }

    fn to_friendly_bytes(&self, non_bounceable: bool, non_production: bool) -> [u8; 36] {
        let tag: u8 = match (non_production, non_bounceable) {
            (false, false) => 0x11,
            (false, true) => 0x51,
            (true, false) => 0x91,
            (true, true) => 0xD1,
        };
        let mut bytes = [0u8; 36];
        bytes[0] = tag;
        bytes[1] = (self.workchain & 0xff) as u8;
        bytes[2..34].copy_from_slice(&self.hash_part);
        let crc = CRC_16_XMODEM.checksum(&bytes[0..34]);
        bytes[34..36].copy_from_slice(&crc.to_be_bytes());
        bytes
    }
}

impl Display for TonAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_base64_url().as_str())
    }
}

impl Debug for TonAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_base64_url().as_str())
    }
}

impl FromStr for TonAddress {
    type Err = TonAddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == FRIENDLY_ADDRESS_LEN {
            if s.contains('-') || s.contains('_') {
                TonAddress::from_base64_url(s)
            } else {
                TonAddress::from_base64_std(s)
            }
        } else {
            TonAddress::from_hex_str(s)
        }
    }
}
