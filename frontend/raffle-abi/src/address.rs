// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tiny_keccak::{Hasher, Keccak};

use crate::DecodeError;

pub const ADDRESS_LENGTH: usize = 20;

/// Literal form of the zero address as returned by the contract before any draw.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// A 20-byte account or contract address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub const ZERO: Address = Address([0; ADDRESS_LENGTH]);

    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; ADDRESS_LENGTH]
    }

    /// Lowercase hex without the `0x` prefix.
    fn to_lower_hex(self) -> String {
        self.0.iter().map(|byte| format!("{byte:02x}")).collect()
    }

    /// EIP-55 mixed-case form, which is what wallet providers hand back.
    pub fn to_checksum(&self) -> String {
        let hex = self.to_lower_hex();
        let mut hasher = Keccak::v256();
        hasher.update(hex.as_bytes());
        let mut hash = [0u8; 32];
        hasher.finalize(&mut hash);

        let mut checksummed = String::with_capacity(2 + 2 * ADDRESS_LENGTH);
        checksummed.push_str("0x");
        for (index, digit) in hex.chars().enumerate() {
            let nibble = if index % 2 == 0 {
                hash[index / 2] >> 4
            } else {
                hash[index / 2] & 0x0f
            };
            if digit.is_ascii_alphabetic() && nibble >= 8 {
                checksummed.push(digit.to_ascii_uppercase());
            } else {
                checksummed.push(digit);
            }
        }
        checksummed
    }
}

impl FromStr for Address {
    type Err = DecodeError;

    /// Accepts `0x` followed by 40 hex digits in any case. Checksums are not enforced.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidAddress(raw.to_string());
        let digits = raw
            .trim()
            .strip_prefix("0x")
            .or_else(|| raw.trim().strip_prefix("0X"))
            .ok_or_else(invalid)?;
        if digits.len() != 2 * ADDRESS_LENGTH || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut bytes = [0u8; ADDRESS_LENGTH];
        for (index, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&digits[2 * index..2 * index + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn checksum_matches_eip55_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let address: Address = expected.to_lowercase().parse().unwrap();
            assert_eq!(address.to_checksum(), expected);
            assert_eq!(address.to_string(), expected);
        }
    }

    #[test]
    fn parsing_ignores_case() {
        let lower: Address = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359".parse().unwrap();
        let upper: Address = "0XFB6916095CA1DF60BB79CE92CE3EA74C37C5D359".parse().unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn zero_address_literal_is_zero() {
        let zero: Address = ZERO_ADDRESS.parse().unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero, Address::ZERO);
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for raw in ["", "0x", "0x1234", "5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", "0xZZAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"] {
            assert_matches!(raw.parse::<Address>(), Err(DecodeError::InvalidAddress(_)));
        }
    }
}
