// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, Mutex, PoisonError};

use async_graphql::SimpleObject;

use crate::error::FrontendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, async_graphql::Enum)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, async_graphql::Enum)]
pub enum NotificationPosition {
    TopRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, async_graphql::Enum)]
pub enum NotificationIcon {
    Bell,
    Exclamation,
}

/// A toast shown until the user dismisses it.
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
    pub position: NotificationPosition,
    pub icon: NotificationIcon,
}

#[derive(Debug, Default)]
struct NotificationQueue {
    next_id: u64,
    active: Vec<Notification>,
}

/// Shared queue of toasts, cloned into every component that raises them.
#[derive(Clone, Debug, Default)]
pub struct NotificationCenter {
    queue: Arc<Mutex<NotificationQueue>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: Option<String>,
    ) -> u64 {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.next_id += 1;
        let id = queue.next_id;
        let icon = match kind {
            NotificationKind::Success => NotificationIcon::Bell,
            NotificationKind::Error => NotificationIcon::Exclamation,
        };
        queue.active.push(Notification {
            id,
            kind,
            title: title.into(),
            message,
            position: NotificationPosition::TopRight,
            icon,
        });
        id
    }

    pub fn success(&self, title: impl Into<String>) -> u64 {
        self.dispatch(NotificationKind::Success, title, None)
    }

    pub fn error(&self, error: &FrontendError) -> u64 {
        self.dispatch(NotificationKind::Error, error.title(), Some(error.to_string()))
    }

    /// Removes the notification; returns `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let before = queue.active.len();
        queue.active.retain(|notification| notification.id != id);
        queue.active.len() != before
    }

    pub fn active(&self) -> Vec<Notification> {
        let queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.active.clone()
    }
}
