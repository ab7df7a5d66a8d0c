// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tracing::warn;

use crate::{
    config::FrontendConfig,
    connection_panel::{ConnectionPanel, ConnectionView},
    contract::ContractRunner,
    entrance_widget::{EntranceView, EntranceWidget},
    notification::NotificationCenter,
    session::{Session, WalletProvider},
    storage::LocalStorage,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const PAGE_METADATA: PageMetadata = PageMetadata {
    title: "Lottery App",
    description: "lottery ethereum smart contract",
    icon: "/favicon.ico",
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageView {
    pub metadata: PageMetadata,
    pub connection: ConnectionView,
    pub entrance: EntranceView,
}

impl PageView {
    /// Plain-text rendering, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.metadata.title.to_string(), self.connection.text()];
        let button = &self.entrance.button;
        lines.push(if button.disabled {
            format!("[{}]", button.loading_text)
        } else {
            format!("[{}]", button.text)
        });
        lines.extend(self.entrance.display.lines());
        lines
    }
}

/// The single page of the app: connection panel on top, entrance widget below.
pub struct PageShell {
    session: Session,
    notifications: NotificationCenter,
    connection_panel: ConnectionPanel,
    entrance_widget: EntranceWidget,
}

impl PageShell {
    pub fn new(
        config: FrontendConfig,
        provider: Arc<dyn WalletProvider>,
        runner: Arc<dyn ContractRunner>,
        storage: Arc<dyn LocalStorage>,
    ) -> Self {
        let session = Session::new(provider);
        let notifications = NotificationCenter::new();
        let connection_panel = ConnectionPanel::new(session.clone(), storage, notifications.clone());
        let entrance_widget = EntranceWidget::new(
            session.clone(),
            runner,
            Arc::new(config.contract_addresses),
            notifications.clone(),
        );
        PageShell {
            session,
            notifications,
            connection_panel,
            entrance_widget,
        }
    }

    pub fn metadata(&self) -> PageMetadata {
        PAGE_METADATA
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn connection_panel(&self) -> &ConnectionPanel {
        &self.connection_panel
    }

    pub fn entrance_widget(&self) -> &EntranceWidget {
        &self.entrance_widget
    }

    pub async fn mount(&self) {
        if let Err(error) = self.connection_panel.mount().await {
            warn!(%error, "connection panel mounted without a session");
        }
        self.entrance_widget_sync().await;
    }

    /// Forwards a session transition to both components.
    pub async fn handle_session_change(&self) {
        if let Err(error) = self.connection_panel.sync_session().await {
            warn!(%error, "could not restore the wallet session");
        }
        self.entrance_widget_sync().await;
    }

    async fn entrance_widget_sync(&self) {
        // Refresh failures are logged and notified by the widget itself.
        let _ = self.entrance_widget.sync_session().await;
    }

    /// Processes queued account changes, then lets both components react.
    pub async fn process_account_changes(&self) -> usize {
        let handled = self.connection_panel.process_account_changes().await;
        if handled > 0 {
            self.handle_session_change().await;
        }
        handled
    }

    pub fn unmount(&self) {
        self.entrance_widget.unmount();
    }

    pub fn render(&self) -> PageView {
        PageView {
            metadata: PAGE_METADATA,
            connection: self.connection_panel.render(),
            entrance: self.entrance_widget.render(),
        }
    }
}
