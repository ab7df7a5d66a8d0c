// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use raffle_abi::{DecodeError, RaffleFunction, TxHash};
use thiserror::Error;

/// Failures reported by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("the user rejected the request")]
    Rejected,

    #[error("no wallet provider is available")]
    Unavailable,

    #[error("wallet provider error: {0}")]
    Provider(String),
}

/// Failures reported by the contract-call library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("execution reverted: {0}")]
    Reverted(String),

    #[error("transaction {0} was dropped before confirmation")]
    Dropped(TxHash),

    #[error("transport error: {0}")]
    Transport(String),
}

/// The three classes of failure a user can run into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Connection,
    Read,
    Transaction,
}

#[derive(Debug, Clone, Error)]
pub enum FrontendError {
    #[error("wallet connection failed: {0}")]
    Wallet(#[from] WalletError),

    #[error("reading `{function}` failed: {source}")]
    Read {
        function: RaffleFunction,
        #[source]
        source: ContractError,
    },

    #[error("`{function}` returned a malformed value: {source}")]
    Decode {
        function: RaffleFunction,
        #[source]
        source: DecodeError,
    },

    #[error("submitting the raffle entry failed: {0}")]
    Submission(#[source] ContractError),

    #[error("waiting for {tx_hash} to confirm failed: {source}")]
    Confirmation {
        tx_hash: TxHash,
        #[source]
        source: ContractError,
    },
}

impl FrontendError {
    pub fn class(&self) -> ErrorClass {
        match self {
            FrontendError::Wallet(_) => ErrorClass::Connection,
            FrontendError::Read { .. } => ErrorClass::Read,
            FrontendError::Decode { function, .. } if function.is_read() => ErrorClass::Read,
            FrontendError::Decode { .. }
            | FrontendError::Submission(_)
            | FrontendError::Confirmation { .. } => ErrorClass::Transaction,
        }
    }

    /// Headline shown in the error notification.
    pub fn title(&self) -> &'static str {
        match self.class() {
            ErrorClass::Connection => "Wallet connection failed",
            ErrorClass::Read => "Could not load raffle",
            ErrorClass::Transaction => "Transaction failed",
        }
    }
}
