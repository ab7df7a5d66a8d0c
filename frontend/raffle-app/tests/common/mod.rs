// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use futures::{future::BoxFuture, FutureExt};
use num_bigint::BigUint;
use raffle_abi::{
    AbiDescriptor, Address, ChainId, ContractAddressTable, RaffleFunction, RaffleOperation,
    RaffleResponse, TxHash, TxReceipt, ZERO_ADDRESS,
};
use raffle_app::{
    ContractError, ContractRunner, FrontendConfig, MemoryStorage, PageShell, WalletConnection,
    WalletError, WalletProvider,
};
use tokio::sync::Notify;

pub const RAFFLE: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
pub const PLAYER: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const WINNER: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
pub const FEE: &str = "100000000000000000";

pub fn address(raw: &str) -> Address {
    raw.parse().unwrap()
}

/// Chain 1 has the raffle; every other chain has nothing.
pub fn address_table() -> ContractAddressTable {
    ContractAddressTable::new().with(ChainId(1), address(RAFFLE))
}

pub fn config() -> FrontendConfig {
    let abi: AbiDescriptor =
        serde_json::from_str(include_str!("../../constants/abi.json")).unwrap();
    FrontendConfig::new(address_table(), abi).unwrap()
}

pub struct FakeWallet {
    connection: Mutex<Result<WalletConnection, WalletError>>,
    gate: Option<Arc<Notify>>,
    pub enable_calls: AtomicUsize,
    pub deactivate_calls: AtomicUsize,
}

impl FakeWallet {
    pub fn on_chain(chain_id: u64) -> Self {
        FakeWallet {
            connection: Mutex::new(Ok(WalletConnection {
                account: Some(address(PLAYER)),
                chain_id: ChainId(chain_id),
            })),
            gate: None,
            enable_calls: AtomicUsize::new(0),
            deactivate_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: WalletError) -> Self {
        let wallet = Self::on_chain(1);
        *wallet.connection.lock().unwrap() = Err(error);
        wallet
    }

    /// `enable` blocks until the returned handle is notified.
    pub fn gated(chain_id: u64) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut wallet = Self::on_chain(chain_id);
        wallet.gate = Some(gate.clone());
        (wallet, gate)
    }

    pub fn enables(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
    }

    pub fn deactivations(&self) -> usize {
        self.deactivate_calls.load(Ordering::SeqCst)
    }
}

impl WalletProvider for FakeWallet {
    fn enable(&self) -> BoxFuture<'_, Result<WalletConnection, WalletError>> {
        async move {
            self.enable_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.connection.lock().unwrap().clone()
        }
        .boxed()
    }

    fn deactivate(&self) -> BoxFuture<'_, Result<(), WalletError>> {
        async move {
            self.deactivate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        .boxed()
    }
}

#[derive(Debug)]
pub struct RaffleContractState {
    pub entrance_fee: String,
    pub players: Vec<Address>,
    pub recent_winner: String,
    pub failing: Option<RaffleFunction>,
    pub confirmation_fails: bool,
    pub calls: Vec<(Address, RaffleOperation)>,
    pub confirmations_awaited: Vec<(TxHash, u64)>,
}

/// In-memory stand-in for the deployed raffle.
#[derive(Clone)]
pub struct FakeRaffle {
    pub state: Arc<Mutex<RaffleContractState>>,
    fee_gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl FakeRaffle {
    pub fn new() -> Self {
        FakeRaffle {
            state: Arc::new(Mutex::new(RaffleContractState {
                entrance_fee: FEE.to_string(),
                players: Vec::new(),
                recent_winner: ZERO_ADDRESS.to_string(),
                failing: None,
                confirmation_fails: false,
                calls: Vec::new(),
                confirmations_awaited: Vec::new(),
            })),
            fee_gate: Arc::new(Mutex::new(None)),
        }
    }

    /// The next `getEntranceFee` read answers with the fee current at call time, but
    /// only returns once the handle is notified.
    pub fn hold_next_fee_read(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.fee_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn set_fee(&self, fee: &str) {
        self.state.lock().unwrap().entrance_fee = fee.to_string();
    }

    pub fn calls(&self) -> Vec<(Address, RaffleOperation)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn functions_called(&self) -> Vec<RaffleFunction> {
        self.calls().iter().map(|(_, operation)| operation.function()).collect()
    }

    pub fn set_winner(&self, winner: &str) {
        self.state.lock().unwrap().recent_winner = winner.to_string();
    }

    pub fn fail(&self, function: Option<RaffleFunction>) {
        self.state.lock().unwrap().failing = function;
    }

    pub fn fail_confirmation(&self) {
        self.state.lock().unwrap().confirmation_fails = true;
    }
}

impl FakeRaffle {
    fn answer(&self, contract: Address, operation: RaffleOperation) -> Result<RaffleResponse, ContractError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((contract, operation.clone()));
        if state.failing == Some(operation.function()) {
            return Err(ContractError::Transport("connection reset".to_string()));
        }
        match operation {
            RaffleOperation::GetEntranceFee => Ok(RaffleResponse::Value(state.entrance_fee.clone())),
            RaffleOperation::GetNumberOfPlayers => {
                Ok(RaffleResponse::Value(state.players.len().to_string()))
            }
            RaffleOperation::GetRecentWinner => Ok(RaffleResponse::Value(state.recent_winner.clone())),
            RaffleOperation::EnterRaffle { value } => {
                let fee: BigUint = state.entrance_fee.parse().unwrap();
                if value.as_biguint() < &fee {
                    return Err(ContractError::Reverted("Raffle__NotEnoughETHEntered".to_string()));
                }
                state.players.push(address(PLAYER));
                Ok(RaffleResponse::Submitted(TxHash(format!("0x{:064x}", state.calls.len()))))
            }
        }
    }
}

impl ContractRunner for FakeRaffle {
    fn call(
        &self,
        contract: Address,
        operation: RaffleOperation,
    ) -> BoxFuture<'_, Result<RaffleResponse, ContractError>> {
        async move {
            let gate = match operation {
                RaffleOperation::GetEntranceFee => self.fee_gate.lock().unwrap().take(),
                _ => None,
            };
            let answer = self.answer(contract, operation);
            if let Some(gate) = gate {
                gate.notified().await;
            }
            answer
        }
        .boxed()
    }

    fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> BoxFuture<'_, Result<TxReceipt, ContractError>> {
        async move {
            let mut state = self.state.lock().unwrap();
            state.confirmations_awaited.push((tx_hash.clone(), confirmations));
            if state.confirmation_fails {
                return Err(ContractError::Dropped(tx_hash));
            }
            Ok(TxReceipt {
                tx_hash,
                block_number: 42,
                confirmations,
            })
        }
        .boxed()
    }
}

pub struct Harness {
    pub page: Arc<PageShell>,
    pub wallet: Arc<FakeWallet>,
    pub raffle: FakeRaffle,
    pub storage: MemoryStorage,
}

impl Harness {
    pub fn new(wallet: FakeWallet) -> Self {
        Self::with_storage(wallet, MemoryStorage::new())
    }

    pub fn with_storage(wallet: FakeWallet, storage: MemoryStorage) -> Self {
        let wallet = Arc::new(wallet);
        let raffle = FakeRaffle::new();
        let page = PageShell::new(
            config(),
            wallet.clone(),
            Arc::new(raffle.clone()),
            Arc::new(storage.clone()),
        );
        Harness {
            page: Arc::new(page),
            wallet,
            raffle,
            storage,
        }
    }
}
