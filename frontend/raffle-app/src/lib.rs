// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

/*! Raffle frontend: wallet session, raffle state and entry submission */

pub mod config;
pub mod connection_panel;
pub mod contract;
pub mod entrance_widget;
pub mod error;
pub mod notification;
pub mod page;
pub mod service;
pub mod session;
pub mod state;
pub mod storage;

pub use self::{
    config::{ConfigError, FrontendConfig},
    connection_panel::{truncate_account, ConnectionPanel, ConnectionView},
    contract::{ContractRunner, RaffleContract},
    entrance_widget::{EnterOutcome, EntranceView, EntranceWidget, RaffleDisplay, RefreshOutcome},
    error::{ContractError, ErrorClass, FrontendError, WalletError},
    notification::{Notification, NotificationCenter, NotificationKind},
    page::{PageMetadata, PageShell, PageView, PAGE_METADATA},
    service::RaffleFrontendService,
    session::{
        AccountChange, AccountChanges, ConnectOutcome, Session, SessionState, WalletConnection,
        WalletProvider,
    },
    state::{RaffleSnapshot, RefreshPhase, WidgetState},
    storage::{JsonFileStorage, LocalStorage, MemoryStorage, CONNECTED_KEY, CONNECTED_VALUE},
};
