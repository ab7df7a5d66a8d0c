// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shows the raffle's state and submits entries.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};

use raffle_abi::{Address, ContractAddressTable, TxReceipt};
use tracing::{debug, error, info};

use crate::{
    contract::{ContractRunner, RaffleContract},
    error::FrontendError,
    notification::NotificationCenter,
    session::Session,
    state::{RaffleSnapshot, WidgetState},
};

/// Confirmations awaited before an entry counts as done.
pub const REQUIRED_CONFIRMATIONS: u64 = 1;
pub const SUCCESS_TITLE: &str = "Transaction complete";
pub const ENTER_LABEL: &str = "enter raffle";
pub const LOADING_LABEL: &str = "loading";
pub const NO_RAFFLE_TEXT: &str = "No raffle address detected";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated(RaffleSnapshot),
    /// A newer refresh committed first; this result was dropped.
    Superseded,
    /// No deployment on the current chain; nothing was read.
    NoRaffle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnterOutcome {
    Entered(TxReceipt),
    /// A submission or refresh is in progress; nothing was sent.
    Busy,
    NoRaffle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnterButton {
    pub text: &'static str,
    pub loading_text: &'static str,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaffleDisplay {
    Available {
        entrance_fee: String,
        num_players: String,
        recent_winner: Option<String>,
    },
    NoRaffle,
}

impl RaffleDisplay {
    pub fn lines(&self) -> Vec<String> {
        match self {
            RaffleDisplay::Available {
                entrance_fee,
                num_players,
                recent_winner,
            } => {
                let mut lines = vec![
                    format!("Entrance fee: {entrance_fee} eth"),
                    format!("Number of players: {num_players}"),
                ];
                if let Some(winner) = recent_winner {
                    lines.push(format!("Recent winner: {winner}"));
                }
                lines
            }
            RaffleDisplay::NoRaffle => vec![NO_RAFFLE_TEXT.to_string()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntranceView {
    pub button: EnterButton,
    pub display: RaffleDisplay,
}

pub struct EntranceWidget {
    session: Session,
    runner: Arc<dyn ContractRunner>,
    addresses: Arc<ContractAddressTable>,
    notifications: NotificationCenter,
    state: Mutex<WidgetState>,
    was_active: AtomicBool,
    mounted: AtomicBool,
    generations: AtomicU64,
}

impl EntranceWidget {
    pub fn new(
        session: Session,
        runner: Arc<dyn ContractRunner>,
        addresses: Arc<ContractAddressTable>,
        notifications: NotificationCenter,
    ) -> Self {
        EntranceWidget {
            session,
            runner,
            addresses,
            notifications,
            state: Mutex::new(WidgetState::default()),
            was_active: AtomicBool::new(false),
            mounted: AtomicBool::new(true),
            generations: AtomicU64::new(0),
        }
    }

    /// Deployment for the session's current chain.
    pub fn raffle_address(&self) -> Option<Address> {
        self.addresses.resolve(self.session.chain_id())
    }

    pub fn state(&self) -> WidgetState {
        self.lock_state().clone()
    }

    pub fn snapshot(&self) -> RaffleSnapshot {
        self.lock_state().snapshot.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Calls still in flight finish, but their results are dropped. Entry outcomes are
    /// still announced; failed background reads are not.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        debug!("entrance widget unmounted");
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, WidgetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Refreshes when the wallet went from inactive to active since the last call.
    pub async fn sync_session(&self) -> Result<Option<RefreshOutcome>, FrontendError> {
        let active = self.session.is_active();
        let was_active = self.was_active.swap(active, Ordering::SeqCst);
        if active && !was_active {
            self.refresh().await.map(Some)
        } else {
            Ok(None)
        }
    }

    /// Reads fee, players and winner in that order, then replaces the snapshot at once.
    /// A failed read keeps the previous snapshot. Overlapping refreshes may run; one that
    /// finishes after a newer one has committed is dropped.
    pub async fn refresh(&self) -> Result<RefreshOutcome, FrontendError> {
        let Some(address) = self.raffle_address() else {
            debug!(chain_id = ?self.session.chain_id(), "no raffle deployed on this chain");
            return Ok(RefreshOutcome::NoRaffle);
        };

        let generation = {
            let mut state = self.lock_state();
            state.refreshes_in_flight += 1;
            self.generations.fetch_add(1, Ordering::SeqCst) + 1
        };
        let result = self.fetch_snapshot(address).await;
        let superseded = {
            let mut state = self.lock_state();
            state.refreshes_in_flight = state.refreshes_in_flight.saturating_sub(1);
            match &result {
                Ok(_) if generation <= state.committed_generation => true,
                Ok(snapshot) => {
                    if self.is_mounted() {
                        state.snapshot = snapshot.clone();
                        state.committed_generation = generation;
                    }
                    false
                }
                Err(_) => false,
            }
        };

        match result {
            Ok(_) if superseded => {
                debug!(generation, "dropping refresh overtaken by a newer one");
                Ok(RefreshOutcome::Superseded)
            }
            Ok(snapshot) => {
                info!(
                    %address,
                    generation,
                    entrance_fee = %snapshot.entrance_fee,
                    num_players = %snapshot.num_players,
                    "raffle state refreshed"
                );
                Ok(RefreshOutcome::Updated(snapshot))
            }
            Err(error) => {
                error!(%address, %error, "failed to refresh raffle state");
                // Nobody is looking at background reads of an unmounted widget.
                if self.is_mounted() {
                    self.notifications.error(&error);
                }
                Err(error)
            }
        }
    }

    async fn fetch_snapshot(&self, address: Address) -> Result<RaffleSnapshot, FrontendError> {
        let contract = RaffleContract::new(self.runner.as_ref(), address);
        let entrance_fee = contract.entrance_fee().await?;
        let num_players = contract.number_of_players().await?;
        let recent_winner = contract.recent_winner().await?;
        Ok(RaffleSnapshot::new(entrance_fee, num_players, recent_winner))
    }

    /// User pressed "enter raffle". Sends the raw entrance fee, waits for one
    /// confirmation, notifies, then refreshes.
    pub async fn enter(&self) -> Result<EnterOutcome, FrontendError> {
        let Some(address) = self.raffle_address() else {
            return Ok(EnterOutcome::NoRaffle);
        };
        let value = {
            let mut state = self.lock_state();
            if state.is_busy() {
                debug!("entry requested while busy");
                return Ok(EnterOutcome::Busy);
            }
            state.submitting = true;
            state.snapshot.entrance_fee.clone()
        };

        let contract = RaffleContract::new(self.runner.as_ref(), address);
        let result = match contract.enter_raffle(value).await {
            Ok(tx_hash) => {
                info!(%tx_hash, "raffle entry broadcast");
                contract.wait(tx_hash, REQUIRED_CONFIRMATIONS).await
            }
            Err(error) => Err(error),
        };
        self.lock_state().submitting = false;

        match result {
            Ok(receipt) => {
                info!(tx_hash = %receipt.tx_hash, block = receipt.block_number, "raffle entry confirmed");
                self.notifications.success(SUCCESS_TITLE);
                // Failures are already reported by `refresh`.
                let _ = self.refresh().await;
                Ok(EnterOutcome::Entered(receipt))
            }
            Err(error) => {
                error!(%error, "raffle entry failed");
                self.notifications.error(&error);
                Err(error)
            }
        }
    }

    pub fn render(&self) -> EntranceView {
        let state = self.state();
        let button = EnterButton {
            text: ENTER_LABEL,
            loading_text: LOADING_LABEL,
            disabled: state.is_busy(),
        };
        let display = if self.raffle_address().is_some() {
            RaffleDisplay::Available {
                entrance_fee: state.snapshot.entrance_fee_formatted,
                num_players: state.snapshot.num_players.to_string(),
                recent_winner: state.snapshot.recent_winner.map(|winner| winner.to_string()),
            }
        } else {
            RaffleDisplay::NoRaffle
        };
        EntranceView { button, display }
    }
}
