// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_graphql::{EmptySubscription, Object, Request, Response, Schema, SimpleObject};
use tracing::debug;

use crate::{
    connection_panel::truncate_account,
    entrance_widget::{EnterOutcome, RefreshOutcome},
    notification::Notification,
    page::PageShell,
    session::ConnectOutcome,
    state::RefreshPhase,
};

/// Serves GraphQL queries and mutations against a mounted page.
pub struct RaffleFrontendService {
    page: Arc<PageShell>,
}

impl RaffleFrontendService {
    pub fn new(page: Arc<PageShell>) -> Self {
        RaffleFrontendService { page }
    }

    pub async fn handle_query(&self, request: impl Into<Request>) -> Response {
        let schema = Schema::build(
            QueryRoot {
                page: self.page.clone(),
            },
            MutationRoot {
                page: self.page.clone(),
            },
            EmptySubscription,
        )
        .finish();
        schema.execute(request).await
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct MetadataView {
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct SessionView {
    pub active: bool,
    pub connecting: bool,
    pub account: Option<String>,
    pub truncated_account: Option<String>,
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct RaffleView {
    pub address: Option<String>,
    pub available: bool,
    pub entrance_fee: String,
    pub entrance_fee_formatted: String,
    pub num_players: String,
    pub recent_winner: Option<String>,
    pub refreshing: bool,
    pub submitting: bool,
}

fn raffle_view(page: &PageShell) -> RaffleView {
    let widget = page.entrance_widget();
    let address = widget.raffle_address();
    let state = widget.state();
    RaffleView {
        address: address.map(|address| address.to_string()),
        available: address.is_some(),
        entrance_fee: state.snapshot.entrance_fee.to_string(),
        entrance_fee_formatted: state.snapshot.entrance_fee_formatted.clone(),
        num_players: state.snapshot.num_players.to_string(),
        recent_winner: state.snapshot.recent_winner.as_ref().map(|winner| winner.to_string()),
        refreshing: state.phase() == RefreshPhase::Refreshing,
        submitting: state.submitting,
    }
}

struct QueryRoot {
    page: Arc<PageShell>,
}

#[Object]
impl QueryRoot {
    /// Static page metadata
    async fn metadata(&self) -> MetadataView {
        let metadata = self.page.metadata();
        MetadataView {
            title: metadata.title.to_string(),
            description: metadata.description.to_string(),
            icon: metadata.icon.to_string(),
        }
    }

    /// Current wallet session
    async fn session(&self) -> SessionView {
        let state = self.page.session().state();
        let account = state.account.map(|account| account.to_string());
        SessionView {
            active: state.active,
            connecting: state.connecting,
            truncated_account: account.as_deref().map(truncate_account),
            account,
            chain_id: state.chain_id.map(|chain_id| chain_id.0),
        }
    }

    /// Last committed raffle snapshot
    async fn raffle(&self) -> RaffleView {
        raffle_view(&self.page)
    }

    async fn notifications(&self) -> Vec<Notification> {
        self.page.notifications().active()
    }
}

struct MutationRoot {
    page: Arc<PageShell>,
}

#[Object]
impl MutationRoot {
    /// Connect the wallet and remember the choice
    async fn connect(&self) -> async_graphql::Result<String> {
        let outcome = self.page.connection_panel().connect().await?;
        self.page.handle_session_change().await;
        Ok(match outcome {
            ConnectOutcome::Connected => "Connected".to_string(),
            ConnectOutcome::AlreadyConnecting => "Connection already in progress".to_string(),
        })
    }

    /// End the wallet session
    async fn disconnect(&self) -> async_graphql::Result<bool> {
        self.page.session().disconnect().await?;
        self.page.handle_session_change().await;
        Ok(true)
    }

    /// Re-read the raffle state
    async fn refresh(&self) -> async_graphql::Result<RaffleView> {
        match self.page.entrance_widget().refresh().await? {
            RefreshOutcome::Updated(_) => debug!("refresh requested over GraphQL"),
            RefreshOutcome::Superseded => debug!("refresh over GraphQL overtaken by a newer one"),
            RefreshOutcome::NoRaffle => debug!("refresh requested without a raffle deployment"),
        }
        Ok(raffle_view(&self.page))
    }

    /// Enter the raffle, paying the current entrance fee
    async fn enter_raffle(&self) -> async_graphql::Result<String> {
        Ok(match self.page.entrance_widget().enter().await? {
            EnterOutcome::Entered(receipt) => receipt.tx_hash.to_string(),
            EnterOutcome::Busy => return Err("an entry or refresh is already in progress".into()),
            EnterOutcome::NoRaffle => return Err("no raffle address detected".into()),
        })
    }

    async fn dismiss_notification(&self, id: u64) -> bool {
        self.page.notifications().dismiss(id)
    }
}
