// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use futures::future::BoxFuture;
use num_bigint::BigUint;
use raffle_abi::{
    Address, RaffleFunction, RaffleOperation, RaffleResponse, RecentWinner, TxHash, TxReceipt, Wei,
};
use tracing::debug;

use crate::error::{ContractError, FrontendError};

/// The contract-call library: runs one operation against a deployed contract.
pub trait ContractRunner: Send + Sync {
    fn call(
        &self,
        address: Address,
        operation: RaffleOperation,
    ) -> BoxFuture<'_, Result<RaffleResponse, ContractError>>;

    fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> BoxFuture<'_, Result<TxReceipt, ContractError>>;
}

/// Typed view of the raffle contract at one address.
pub struct RaffleContract<'a> {
    runner: &'a dyn ContractRunner,
    address: Address,
}

impl<'a> RaffleContract<'a> {
    pub fn new(runner: &'a dyn ContractRunner, address: Address) -> Self {
        RaffleContract { runner, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    async fn call(&self, operation: RaffleOperation) -> Result<RaffleResponse, ContractError> {
        debug!(address = %self.address, function = %operation.function(), "calling raffle contract");
        self.runner.call(self.address, operation).await
    }

    async fn read(&self, operation: RaffleOperation) -> Result<RaffleResponse, FrontendError> {
        let function = operation.function();
        self.call(operation)
            .await
            .map_err(|source| FrontendError::Read { function, source })
    }

    pub async fn entrance_fee(&self) -> Result<Wei, FrontendError> {
        let function = RaffleFunction::GetEntranceFee;
        self.read(RaffleOperation::GetEntranceFee)
            .await?
            .into_uint(function)
            .map(Wei::from)
            .map_err(|source| FrontendError::Decode { function, source })
    }

    pub async fn number_of_players(&self) -> Result<BigUint, FrontendError> {
        let function = RaffleFunction::GetNumberOfPlayers;
        self.read(RaffleOperation::GetNumberOfPlayers)
            .await?
            .into_uint(function)
            .map_err(|source| FrontendError::Decode { function, source })
    }

    pub async fn recent_winner(&self) -> Result<Option<RecentWinner>, FrontendError> {
        let function = RaffleFunction::GetRecentWinner;
        self.read(RaffleOperation::GetRecentWinner)
            .await?
            .into_recent_winner(function)
            .map_err(|source| FrontendError::Decode { function, source })
    }

    /// Broadcasts `enterRaffle` with `value` attached.
    pub async fn enter_raffle(&self, value: Wei) -> Result<TxHash, FrontendError> {
        let function = RaffleFunction::EnterRaffle;
        self.call(RaffleOperation::EnterRaffle { value })
            .await
            .map_err(FrontendError::Submission)?
            .into_tx_hash(function)
            .map_err(|source| FrontendError::Decode { function, source })
    }

    pub async fn wait(&self, tx_hash: TxHash, confirmations: u64) -> Result<TxReceipt, FrontendError> {
        self.runner
            .wait_for_confirmations(tx_hash.clone(), confirmations)
            .await
            .map_err(|source| FrontendError::Confirmation { tx_hash, source })
    }
}
