// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connect button and account badge.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use raffle_abi::Address;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::FrontendError,
    notification::NotificationCenter,
    session::{AccountChanges, ConnectOutcome, Session},
    storage::{LocalStorage, CONNECTED_KEY, CONNECTED_VALUE},
};

pub const CONNECT_LABEL: &str = "Connect";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionView {
    Connected { account: Address, label: String },
    Connect { enabled: bool },
}

impl ConnectionView {
    pub fn text(&self) -> String {
        match self {
            ConnectionView::Connected { label, .. } => label.clone(),
            ConnectionView::Connect { .. } => CONNECT_LABEL.to_string(),
        }
    }
}

/// `0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed` becomes `0x5aAe...eAed`.
/// The tail is taken relative to the identifier's own length.
pub fn truncate_account(account: &str) -> String {
    let chars: Vec<char> = account.chars().collect();
    if chars.len() <= 10 {
        return account.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub struct ConnectionPanel {
    session: Session,
    storage: Arc<dyn LocalStorage>,
    notifications: NotificationCenter,
    registered: AtomicBool,
    /// Queued events for `process_account_changes`. Empty while the listener loop owns
    /// the subscription.
    account_changes: Mutex<Option<AccountChanges>>,
}

impl ConnectionPanel {
    pub fn new(session: Session, storage: Arc<dyn LocalStorage>, notifications: NotificationCenter) -> Self {
        ConnectionPanel {
            session,
            storage,
            notifications,
            registered: AtomicBool::new(false),
            account_changes: Mutex::new(None),
        }
    }

    /// Registers the account-change listener (once per panel), then tries to resume a
    /// previous session.
    pub async fn mount(&self) -> Result<(), FrontendError> {
        if !self.registered.swap(true, Ordering::SeqCst) {
            *self.account_changes.lock().await = Some(self.session.subscribe_to_account_change());
            debug!("account-change listener registered");
        }
        self.sync_session().await
    }

    /// Silently reconnects when no session is active but the user connected before.
    pub async fn sync_session(&self) -> Result<(), FrontendError> {
        if self.session.is_active() || self.session.is_connecting() {
            return Ok(());
        }
        if self.storage.get_item(CONNECTED_KEY).is_none() {
            return Ok(());
        }
        info!("resuming previous wallet session");
        match self.session.connect().await {
            Ok(_) => Ok(()),
            Err(error) => {
                warn!(%error, "could not resume wallet session");
                Err(error.into())
            }
        }
    }

    /// User pressed the connect button.
    pub async fn connect(&self) -> Result<ConnectOutcome, FrontendError> {
        match self.session.connect().await {
            Ok(ConnectOutcome::Connected) => {
                self.storage.set_item(CONNECTED_KEY, CONNECTED_VALUE);
                Ok(ConnectOutcome::Connected)
            }
            Ok(ConnectOutcome::AlreadyConnecting) => Ok(ConnectOutcome::AlreadyConnecting),
            Err(error) => {
                let error = FrontendError::from(error);
                self.notifications.error(&error);
                Err(error)
            }
        }
    }

    pub async fn handle_account_changed(&self, account: Option<Address>) -> Result<(), FrontendError> {
        info!(?account, "account changed");
        if account.is_some() {
            return Ok(());
        }
        warn!("no accounts available, ending wallet session");
        self.storage.remove_item(CONNECTED_KEY);
        self.session.disconnect().await.map_err(FrontendError::from)
    }

    /// Handles every account change queued since the last call. Returns how many were
    /// handled.
    pub async fn process_account_changes(&self) -> usize {
        let pending: Vec<_> = {
            let mut account_changes = self.account_changes.lock().await;
            match account_changes.as_mut() {
                Some(changes) => std::iter::from_fn(|| changes.try_next()).collect(),
                None => Vec::new(),
            }
        };
        for change in &pending {
            if let Err(error) = self.handle_account_changed(change.account).await {
                warn!(%error, "failed to handle account change");
            }
        }
        pending.len()
    }

    /// Listener loop for hosts that drive the panel from a spawned task. Runs until the
    /// session is dropped. It takes the subscription over, so
    /// [`ConnectionPanel::process_account_changes`] finds nothing while it runs. Returns at
    /// once if the panel is not mounted or another loop already runs.
    pub async fn watch_account_changes(&self) {
        let Some(mut changes) = self.account_changes.lock().await.take() else {
            return;
        };
        while let Some(change) = changes.next().await {
            if let Err(error) = self.handle_account_changed(change.account).await {
                warn!(%error, "failed to handle account change");
            }
        }
    }

    pub fn render(&self) -> ConnectionView {
        let state = self.session.state();
        match state.account {
            Some(account) => ConnectionView::Connected {
                account,
                label: format!("Connected to {}", truncate_account(&account.to_string())),
            },
            None => ConnectionView::Connect {
                enabled: !state.connecting,
            },
        }
    }
}
