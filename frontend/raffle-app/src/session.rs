// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The wallet session shared by every component on the page.

use std::sync::Arc;

use futures::future::BoxFuture;
use raffle_abi::{Address, ChainId};
use tokio::sync::{
    broadcast::{self, error::RecvError, error::TryRecvError},
    watch,
};
use tracing::{debug, info, warn};

use crate::error::WalletError;

const ACCOUNT_CHANGE_CAPACITY: usize = 16;

/// What the wallet reports once the user grants access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletConnection {
    pub account: Option<Address>,
    pub chain_id: ChainId,
}

/// The injected wallet, seen from the page.
pub trait WalletProvider: Send + Sync {
    fn enable(&self) -> BoxFuture<'_, Result<WalletConnection, WalletError>>;

    fn deactivate(&self) -> BoxFuture<'_, Result<(), WalletError>>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub active: bool,
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
    pub connecting: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected,
    /// Another connect was in flight; the provider was not called again.
    AlreadyConnecting,
}

/// An account-change event as emitted by the wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountChange {
    pub account: Option<Address>,
}

/// A subscription to account-change events. Dropping it unsubscribes.
#[derive(Debug)]
pub struct AccountChanges {
    receiver: broadcast::Receiver<AccountChange>,
}

impl AccountChanges {
    /// Waits for the next event; `None` once the session is gone.
    pub async fn next(&mut self) -> Option<AccountChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "account-change listener fell behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns a queued event without waiting.
    pub fn try_next(&mut self) -> Option<AccountChange> {
        loop {
            match self.receiver.try_recv() {
                Ok(change) => return Some(change),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "account-change listener fell behind");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

struct SessionInner {
    provider: Arc<dyn WalletProvider>,
    state: watch::Sender<SessionState>,
    account_changes: broadcast::Sender<AccountChange>,
}

/// Context object handed to every component that needs the wallet.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let (account_changes, _) = broadcast::channel(ACCOUNT_CHANGE_CAPACITY);
        Session {
            inner: Arc::new(SessionInner {
                provider,
                state,
                account_changes,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.inner.state.borrow().active
    }

    pub fn is_connecting(&self) -> bool {
        self.inner.state.borrow().connecting
    }

    pub fn account(&self) -> Option<Address> {
        self.inner.state.borrow().account
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        self.inner.state.borrow().chain_id
    }

    /// Observers are woken on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub async fn connect(&self) -> Result<ConnectOutcome, WalletError> {
        let started = self.inner.state.send_if_modified(|state| {
            if state.connecting {
                return false;
            }
            state.connecting = true;
            true
        });
        if !started {
            debug!("connect requested while another attempt is in flight");
            return Ok(ConnectOutcome::AlreadyConnecting);
        }

        match self.inner.provider.enable().await {
            Ok(connection) => {
                info!(account = ?connection.account, chain_id = %connection.chain_id, "wallet connected");
                self.inner.state.send_modify(|state| {
                    state.active = true;
                    state.connecting = false;
                    state.account = connection.account;
                    state.chain_id = Some(connection.chain_id);
                });
                Ok(ConnectOutcome::Connected)
            }
            Err(error) => {
                warn!(%error, "wallet connection failed");
                self.inner.state.send_modify(|state| state.connecting = false);
                Err(error)
            }
        }
    }

    /// Deactivates the session locally even when the provider call fails.
    pub async fn disconnect(&self) -> Result<(), WalletError> {
        let result = self.inner.provider.deactivate().await;
        self.inner.state.send_modify(|state| {
            state.active = false;
            state.account = None;
            state.chain_id = None;
        });
        info!("wallet session deactivated");
        result
    }

    pub fn subscribe_to_account_change(&self) -> AccountChanges {
        AccountChanges {
            receiver: self.inner.account_changes.subscribe(),
        }
    }

    /// Entry point for the host bridge when the wallet reports a new account.
    pub fn notify_account_changed(&self, account: Option<Address>) {
        if let Some(account) = account {
            self.inner.state.send_if_modified(|state| {
                let changed = state.active && state.account != Some(account);
                if changed {
                    state.account = Some(account);
                }
                changed
            });
        }
        // No receivers simply means nobody mounted a listener yet.
        let _ = self.inner.account_changes.send(AccountChange { account });
    }

    /// Entry point for the host bridge when the wallet switches networks.
    pub fn notify_chain_changed(&self, chain_id: ChainId) {
        self.inner.state.send_if_modified(|state| {
            let changed = state.active && state.chain_id != Some(chain_id);
            if changed {
                state.chain_id = Some(chain_id);
            }
            changed
        });
    }
}
