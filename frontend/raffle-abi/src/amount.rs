// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr};

use num_bigint::BigUint;
use num_traits::{Num, Zero};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::DecodeError;

/// Number of decimals between wei and ether.
pub const ETHER_DECIMALS: usize = 18;

/// An amount of the native coin in its smallest unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wei(BigUint);

impl Wei {
    pub fn zero() -> Self {
        Wei(BigUint::zero())
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Renders the amount as decimal ether, keeping at least one fractional digit
    /// (`100000000000000000` is `0.1`, `10^18` is `1.0`, zero is `0.0`).
    pub fn format_ether(&self) -> String {
        let digits = self.0.to_str_radix(10);
        let padded = if digits.len() <= ETHER_DECIMALS {
            format!("{digits:0>width$}", width = ETHER_DECIMALS + 1)
        } else {
            digits
        };
        let (whole, fraction) = padded.split_at(padded.len() - ETHER_DECIMALS);
        let fraction = fraction.trim_end_matches('0');
        let fraction = if fraction.is_empty() { "0" } else { fraction };
        format!("{whole}.{fraction}")
    }

    /// Inverse of [`Wei::format_ether`]. At most 18 fractional digits are accepted.
    pub fn parse_ether(raw: &str) -> Result<Self, DecodeError> {
        let invalid = || DecodeError::InvalidEther(raw.to_string());
        let trimmed = raw.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > ETHER_DECIMALS
            || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole = if whole.is_empty() { "0" } else { whole };
        let scaled = format!("{whole}{fraction:0<width$}", width = ETHER_DECIMALS);
        BigUint::from_str_radix(&scaled, 10).map(Wei).map_err(|_| invalid())
    }
}

impl From<BigUint> for Wei {
    fn from(value: BigUint) -> Self {
        Wei(value)
    }
}

impl From<u128> for Wei {
    fn from(value: u128) -> Self {
        Wei(BigUint::from(value))
    }
}

impl FromStr for Wei {
    type Err = DecodeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        decode_uint(raw).map(Wei)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Wei {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_str_radix(10))
    }
}

impl<'de> Deserialize<'de> for Wei {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Decodes an unsigned integer as rendered by contract-call libraries: decimal digits,
/// or `0x`-prefixed hex.
pub fn decode_uint(raw: &str) -> Result<BigUint, DecodeError> {
    let invalid = || DecodeError::InvalidUint(raw.to_string());
    let trimmed = raw.trim();
    let (digits, radix) = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };
    let well_formed = !digits.is_empty()
        && digits.chars().all(|c| c.is_digit(radix));
    if !well_formed {
        return Err(invalid());
    }
    BigUint::from_str_radix(digits, radix).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn wei(raw: &str) -> Wei {
        raw.parse().unwrap()
    }

    #[test]
    fn formats_like_format_units() {
        assert_eq!(wei("100000000000000000").format_ether(), "0.1");
        assert_eq!(wei("1000000000000000000").format_ether(), "1.0");
        assert_eq!(wei("0").format_ether(), "0.0");
        assert_eq!(wei("1").format_ether(), "0.000000000000000001");
        assert_eq!(wei("12345000000000000000").format_ether(), "12.345");
        assert_eq!(wei("10000000000000000").format_ether(), "0.01");
    }

    #[test]
    fn parse_ether_recovers_the_raw_amount() {
        let ten_pow_30_minus_one = "9".repeat(30);
        for raw in [
            "0",
            "1",
            "999999999999999999",
            "1000000000000000000",
            "100000000000000000",
            "31415926535897932384626",
            ten_pow_30_minus_one.as_str(),
        ] {
            let amount = wei(raw);
            assert_eq!(Wei::parse_ether(&amount.format_ether()).unwrap(), amount, "{raw}");
        }
    }

    #[test]
    fn parse_ether_accepts_partial_forms() {
        assert_eq!(Wei::parse_ether("1").unwrap(), wei("1000000000000000000"));
        assert_eq!(Wei::parse_ether(".5").unwrap(), wei("500000000000000000"));
        assert_eq!(Wei::parse_ether("2.").unwrap(), wei("2000000000000000000"));
    }

    #[test]
    fn parse_ether_rejects_excess_precision_and_junk() {
        assert_matches!(Wei::parse_ether("0.0000000000000000001"), Err(DecodeError::InvalidEther(_)));
        assert_matches!(Wei::parse_ether("1.2.3"), Err(DecodeError::InvalidEther(_)));
        assert_matches!(Wei::parse_ether("-1"), Err(DecodeError::InvalidEther(_)));
        assert_matches!(Wei::parse_ether("."), Err(DecodeError::InvalidEther(_)));
    }

    #[test]
    fn decode_uint_handles_decimal_and_hex() {
        assert_eq!(decode_uint("42").unwrap(), BigUint::from(42u32));
        assert_eq!(decode_uint("0x2a").unwrap(), BigUint::from(42u32));
        assert_eq!(decode_uint(" 7 ").unwrap(), BigUint::from(7u32));
        for raw in ["", "0x", "1_000", "-3", "12a"] {
            assert_matches!(decode_uint(raw), Err(DecodeError::InvalidUint(_)), "{raw}");
        }
    }
}
