// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Startup configuration: where the raffle is deployed and what its ABI looks like.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use raffle_abi::{AbiDescriptor, AbiError, ContractAddressTable};
use thiserror::Error;
use tracing::info;

pub const CONTRACT_ADDRESSES_FILE: &str = "contractAddresses.json";
pub const ABI_FILE: &str = "abi.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("the raffle ABI is unusable: {0}")]
    Abi(#[from] AbiError),
}

/// Immutable after startup.
#[derive(Clone, Debug)]
pub struct FrontendConfig {
    pub contract_addresses: ContractAddressTable,
    pub abi: AbiDescriptor,
}

impl FrontendConfig {
    pub fn new(contract_addresses: ContractAddressTable, abi: AbiDescriptor) -> Result<Self, ConfigError> {
        abi.validate_raffle()?;
        Ok(FrontendConfig {
            contract_addresses,
            abi,
        })
    }

    pub fn from_json(contract_addresses: &str, abi: &str) -> Result<Self, ConfigError> {
        let contract_addresses = serde_json::from_str(contract_addresses).map_err(|source| ConfigError::Parse {
            what: CONTRACT_ADDRESSES_FILE,
            source,
        })?;
        let abi = serde_json::from_str(abi).map_err(|source| ConfigError::Parse { what: ABI_FILE, source })?;
        Self::new(contract_addresses, abi)
    }

    /// Loads `contractAddresses.json` and `abi.json` from a constants directory.
    pub fn load(constants_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let constants_dir = constants_dir.as_ref();
        let contract_addresses = read(&constants_dir.join(CONTRACT_ADDRESSES_FILE))?;
        let abi = read(&constants_dir.join(ABI_FILE))?;
        let config = Self::from_json(&contract_addresses, &abi)?;
        info!(
            dir = %constants_dir.display(),
            chains = config.contract_addresses.chains().count(),
            "loaded raffle configuration"
        );
        Ok(config)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
