// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Address, DecodeError};

/// Numeric chain identifier, as reported by the wallet in hex (`"0x7a69"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl FromStr for ChainId {
    type Err = DecodeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(ChainId)
            .map_err(|_| DecodeError::InvalidChainId(raw.to_string()))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deployed raffle addresses per chain. Only the first address of a chain is used.
///
/// The JSON form keys chains by their decimal id:
/// `{"31337": ["0x5FbDB2315678afecb367f032d93F642f64180aa3"]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<Address>>",
    into = "BTreeMap<String, Vec<Address>>"
)]
pub struct ContractAddressTable {
    entries: BTreeMap<ChainId, Vec<Address>>,
}

impl ContractAddressTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, chain_id: ChainId, address: Address) -> Self {
        self.entries.entry(chain_id).or_default().push(address);
        self
    }

    pub fn addresses(&self, chain_id: ChainId) -> &[Address] {
        self.entries.get(&chain_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The raffle address for `chain_id`, if that chain has a deployment.
    pub fn resolve(&self, chain_id: Option<ChainId>) -> Option<Address> {
        chain_id.and_then(|chain_id| self.addresses(chain_id).first().copied())
    }

    pub fn chains(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.entries.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Vec<Address>>> for ContractAddressTable {
    type Error = DecodeError;

    fn try_from(raw: BTreeMap<String, Vec<Address>>) -> Result<Self, Self::Error> {
        let entries: BTreeMap<ChainId, Vec<Address>> = raw
            .into_iter()
            .map(|(chain_id, addresses)| Ok((chain_id.parse::<ChainId>()?, addresses)))
            .collect::<Result<_, DecodeError>>()?;
        Ok(ContractAddressTable { entries })
    }
}

impl From<ContractAddressTable> for BTreeMap<String, Vec<Address>> {
    fn from(table: ContractAddressTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(chain_id, addresses)| (chain_id.to_string(), addresses))
            .collect()
    }
}
