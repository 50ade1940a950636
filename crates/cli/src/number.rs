//! Decimal / `0x` hex number parsing for arguments and profile fields.

use iopmp_core::common::constants::{PMP_R, PMP_W, PMP_X};
use serde::{Deserialize, Deserializer};

use crate::error::CliError;

/// Parses `s` as decimal, or as hex when prefixed with `0x`/`0X`.
///
/// Underscores are accepted as digit separators (`0x8000_0000`).
pub fn parse_u64(s: &str) -> Result<u64, CliError> {
    let trimmed = s.trim();
    let digits: String = trimmed.chars().filter(|&c| c != '_').collect();
    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse(),
    };
    parsed.map_err(|_| CliError::InvalidNumber(s.to_string()))
}

/// Parses a permission string such as `rwx`, `r-x` or `-`.
pub fn parse_access(s: &str) -> Result<u8, CliError> {
    s.chars().try_fold(0u8, |acc, c| match c {
        'r' | 'R' => Ok(acc | PMP_R),
        'w' | 'W' => Ok(acc | PMP_W),
        'x' | 'X' => Ok(acc | PMP_X),
        '-' => Ok(acc),
        _ => Err(CliError::InvalidAccess(s.to_string())),
    })
}

/// Renders permission bits as `rwx` with `-` for cleared bits.
pub fn format_access(access: u8) -> String {
    [(PMP_R, 'r'), (PMP_W, 'w'), (PMP_X, 'x')]
        .iter()
        .map(|&(bit, c)| if access & bit != 0 { c } else { '-' })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Int(u64),
    Text(String),
}

/// `serde` adapter accepting a JSON integer or a decimal/hex string.
pub fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match NumberRepr::deserialize(deserializer)? {
        NumberRepr::Int(v) => Ok(v),
        NumberRepr::Text(s) => parse_u64(&s).map_err(serde::de::Error::custom),
    }
}

/// [`de_u64`] for optional fields.
pub fn de_opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    de_u64(deserializer).map(Some)
}
