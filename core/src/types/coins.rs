use num_bigint::BigUint;
use num_traits::Zero;

use super::CoinsParseError;

/// Number of decimal places between TON and nanoton.
pub const TON_DECIMALS: usize = 9;

/// Formats a nanoton amount the way wallets display it: `1_500_000_000` becomes `"1.5"`.
pub fn format_nano(amount: &BigUint) -> String {
    let digits = amount.to_str_radix(10);
    let (int_part, frac_part) = if digits.len() > TON_DECIMALS {
        let split = digits.len() - TON_DECIMALS;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", digits, width = TON_DECIMALS))
    };
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part
    } else {
        format!("{int_part}.{frac_part}")
    }
}

/// Parses a decimal TON amount into nanotons: `"0.05"` becomes `50_000_000`.
pub fn parse_nano(amount: &str) -> Result<BigUint, CoinsParseError> {
    let trimmed = amount.trim();
    let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(CoinsParseError::new(amount, "empty amount"));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(CoinsParseError::new(amount, "only digits and one dot are allowed"));
    }
    if frac_part.len() > TON_DECIMALS {
        return Err(CoinsParseError::new(
            amount,
            format!("at most {TON_DECIMALS} decimal places are allowed"),
        ));
    }

    let digits = format!("{int_part}{frac_part:0<width$}", width = TON_DECIMALS);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(BigUint::zero());
    }
    BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| CoinsParseError::new(amount, "not a decimal number"))
}
