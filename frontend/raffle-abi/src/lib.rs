// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

/*! Shared ABI definitions for the Raffle frontend */

mod address;
mod amount;
mod chain;
mod descriptor;

use std::fmt;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::{
    address::{Address, ADDRESS_LENGTH, ZERO_ADDRESS},
    amount::{decode_uint, Wei, ETHER_DECIMALS},
    chain::{ChainId, ContractAddressTable},
    descriptor::{AbiDescriptor, AbiEntry, AbiError, AbiParam},
};

/// Errors raised while turning wire scalars into typed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid address {0:?}: expected 0x followed by 40 hex digits")]
    InvalidAddress(String),

    #[error("invalid unsigned integer {0:?}")]
    InvalidUint(String),

    #[error("invalid ether amount {0:?}")]
    InvalidEther(String),

    #[error("invalid chain id {0:?}")]
    InvalidChainId(String),

    #[error("`{function}` answered with {found} instead of {expected}")]
    UnexpectedResponse {
        function: RaffleFunction,
        expected: &'static str,
        found: &'static str,
    },
}

/// The contract functions the frontend relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaffleFunction {
    GetEntranceFee,
    GetNumberOfPlayers,
    GetRecentWinner,
    EnterRaffle,
}

impl RaffleFunction {
    pub const ALL: [RaffleFunction; 4] = [
        RaffleFunction::GetEntranceFee,
        RaffleFunction::GetNumberOfPlayers,
        RaffleFunction::GetRecentWinner,
        RaffleFunction::EnterRaffle,
    ];

    /// Name of the function in the contract ABI.
    pub fn name(self) -> &'static str {
        match self {
            RaffleFunction::GetEntranceFee => "getEntranceFee",
            RaffleFunction::GetNumberOfPlayers => "getNumberOfPlayers",
            RaffleFunction::GetRecentWinner => "getRecentWinner",
            RaffleFunction::EnterRaffle => "enterRaffle",
        }
    }

    pub fn state_mutability(self) -> &'static [&'static str] {
        match self {
            RaffleFunction::EnterRaffle => &["payable"],
            _ => &["view", "pure"],
        }
    }

    pub fn output_type(self) -> Option<&'static str> {
        match self {
            RaffleFunction::GetEntranceFee | RaffleFunction::GetNumberOfPlayers => Some("uint256"),
            RaffleFunction::GetRecentWinner => Some("address"),
            RaffleFunction::EnterRaffle => None,
        }
    }

    pub fn is_read(self) -> bool {
        self != RaffleFunction::EnterRaffle
    }
}

impl fmt::Display for RaffleFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A call against the raffle contract. All functions are parameterless; only the
/// entry carries a value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum RaffleOperation {
    GetEntranceFee,
    GetNumberOfPlayers,
    GetRecentWinner,
    /// Payable entry; `value` is the raw entrance fee in wei.
    EnterRaffle { value: Wei },
}

impl RaffleOperation {
    pub fn function(&self) -> RaffleFunction {
        match self {
            RaffleOperation::GetEntranceFee => RaffleFunction::GetEntranceFee,
            RaffleOperation::GetNumberOfPlayers => RaffleFunction::GetNumberOfPlayers,
            RaffleOperation::GetRecentWinner => RaffleFunction::GetRecentWinner,
            RaffleOperation::EnterRaffle { .. } => RaffleFunction::EnterRaffle,
        }
    }

    /// Value attached to the transaction, if any.
    pub fn msg_value(&self) -> Option<&Wei> {
        match self {
            RaffleOperation::EnterRaffle { value } => Some(value),
            _ => None,
        }
    }
}

/// Hash of a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receipt of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub confirmations: u64,
}

/// What the contract-call library hands back, before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum RaffleResponse {
    /// A view result rendered as a string (decimal integer or hex address).
    Value(String),
    /// A write accepted by the wallet and broadcast.
    Submitted(TxHash),
}

impl RaffleResponse {
    fn kind(&self) -> &'static str {
        match self {
            RaffleResponse::Value(_) => "a value",
            RaffleResponse::Submitted(_) => "a transaction",
        }
    }

    fn into_value(self, function: RaffleFunction) -> Result<String, DecodeError> {
        match self {
            RaffleResponse::Value(raw) => Ok(raw),
            other => Err(DecodeError::UnexpectedResponse {
                function,
                expected: "a value",
                found: other.kind(),
            }),
        }
    }

    pub fn into_uint(self, function: RaffleFunction) -> Result<BigUint, DecodeError> {
        decode_uint(&self.into_value(function)?)
    }

    /// Decodes a `getRecentWinner` answer; the zero address means no draw happened yet.
    pub fn into_recent_winner(self, function: RaffleFunction) -> Result<Option<RecentWinner>, DecodeError> {
        decode_recent_winner(&self.into_value(function)?)
    }

    pub fn into_tx_hash(self, function: RaffleFunction) -> Result<TxHash, DecodeError> {
        match self {
            RaffleResponse::Submitted(tx_hash) => Ok(tx_hash),
            other => Err(DecodeError::UnexpectedResponse {
                function,
                expected: "a transaction",
                found: other.kind(),
            }),
        }
    }
}

/// A drawn winner as the contract reported it. Displays the reported text unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentWinner {
    pub address: Address,
    pub raw: String,
}

impl fmt::Display for RecentWinner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Normalizes the zero address to `None`, in any letter case. All 20 bytes must be
/// zero; an address that merely starts with zero bytes is a real winner.
pub fn decode_recent_winner(raw: &str) -> Result<Option<RecentWinner>, DecodeError> {
    let address: Address = raw.parse()?;
    Ok((!address.is_zero()).then(|| RecentWinner {
        address,
        raw: raw.to_string(),
    }))
}
