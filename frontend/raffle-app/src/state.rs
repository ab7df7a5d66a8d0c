// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use num_bigint::BigUint;
use num_traits::Zero;
use raffle_abi::{RecentWinner, Wei};

/// Everything the entrance widget shows, replaced as one unit on each refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaffleSnapshot {
    pub entrance_fee: Wei,
    pub entrance_fee_formatted: String,
    pub num_players: BigUint,
    pub recent_winner: Option<RecentWinner>,
}

impl RaffleSnapshot {
    pub fn new(entrance_fee: Wei, num_players: BigUint, recent_winner: Option<RecentWinner>) -> Self {
        RaffleSnapshot {
            entrance_fee_formatted: entrance_fee.format_ether(),
            entrance_fee,
            num_players,
            recent_winner,
        }
    }
}

impl Default for RaffleSnapshot {
    /// Placeholder shown before the first refresh.
    fn default() -> Self {
        RaffleSnapshot {
            entrance_fee: Wei::zero(),
            entrance_fee_formatted: "0".to_string(),
            num_players: BigUint::zero(),
            recent_winner: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshPhase {
    #[default]
    Idle,
    Refreshing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WidgetState {
    pub snapshot: RaffleSnapshot,
    /// Refreshes started and not yet finished. Several may overlap.
    pub refreshes_in_flight: usize,
    /// Generation of the refresh that produced `snapshot`; 0 for the placeholder.
    pub committed_generation: u64,
    /// An entry is being submitted or awaiting confirmation.
    pub submitting: bool,
}

impl WidgetState {
    pub fn phase(&self) -> RefreshPhase {
        if self.refreshes_in_flight > 0 {
            RefreshPhase::Refreshing
        } else {
            RefreshPhase::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.submitting || self.phase() == RefreshPhase::Refreshing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_before_first_refresh() {
        let snapshot = RaffleSnapshot::default();
        assert_eq!(snapshot.entrance_fee_formatted, "0");
        assert!(snapshot.entrance_fee.is_zero());
        assert!(snapshot.num_players.is_zero());
        assert_eq!(snapshot.recent_winner, None);
    }

    #[test]
    fn new_snapshot_formats_the_fee() {
        let fee: Wei = "100000000000000000".parse().unwrap();
        let snapshot = RaffleSnapshot::new(fee.clone(), BigUint::from(3u32), None);
        assert_eq!(snapshot.entrance_fee, fee);
        assert_eq!(snapshot.entrance_fee_formatted, "0.1");
    }

    #[test]
    fn busy_while_refreshing_or_submitting() {
        let mut state = WidgetState::default();
        assert!(!state.is_busy());
        state.refreshes_in_flight = 2;
        assert_eq!(state.phase(), RefreshPhase::Refreshing);
        state.refreshes_in_flight = 1;
        assert!(state.is_busy());
        state.refreshes_in_flight = 0;
        assert_eq!(state.phase(), RefreshPhase::Idle);
        state.submitting = true;
        assert!(state.is_busy());
    }
}
