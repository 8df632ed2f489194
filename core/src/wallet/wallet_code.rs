use lazy_static::lazy_static;

use crate::cell::{ArcCell, BagOfCells};

macro_rules! load_code {
    ($path:expr) => {
        BagOfCells::parse_base64(include_str!($path))
            .and_then(|boc| boc.single_root())
            .expect(concat!("embedded wallet code is a valid BoC: ", $path))
    };
}

lazy_static! {
    pub static ref WALLET_V4R2_CODE: ArcCell = load_code!("../../resources/wallet/wallet_v4r2.code");
}

#[cfg(test)]
mod tests {
    use super::WALLET_V4R2_CODE;

    #[test]
    fn code_hash_v4r2() {
        assert_eq!(
            hex::encode(WALLET_V4R2_CODE.cell_hash()),
            "feb5ff6820e2ff0d9483e7e0d62c817d846789fb4ae580c878866d959dabd5c0"
        );
    }
}
