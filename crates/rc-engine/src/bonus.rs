//! Bonus round state machine
//!
//! `Inactive → Triggered → Active(remaining > 0) → Completed → Inactive`.
//! The state is a plain value owned by the per-session engine; every
//! transition happens through the methods here so the invariants (additive
//! retriggers, monotonic multiplier tier, exactly one decrement per spin)
//! sit in one place.

use serde::{Deserialize, Serialize};

use crate::config::MultiplierLadder;
use crate::error::{EngineError, EngineResult};

/// Mutable free-spins round state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusState {
    /// Is a round in progress?
    pub active: bool,
    /// Spins left in the round
    pub remaining: u32,
    /// Total spins awarded this round, retriggers included
    pub total_awarded: u32,
    /// Spins on which at least one Wild was visible
    pub wild_collected: u32,
    /// Current multiplier tier; monotonic within a round
    pub multiplier_tier: u32,
    /// Round winnings so far, paid as one lump on completion
    pub cumulative_win: f64,
    /// Bet locked at trigger time; bonus spins are staked on it
    pub bet: f64,
    /// Active line count locked at trigger time
    pub active_lines: u8,
    /// Persistent special symbol for the round (variant feature)
    pub special_symbol: Option<u32>,
}

impl Default for BonusState {
    fn default() -> Self {
        Self {
            active: false,
            remaining: 0,
            total_awarded: 0,
            wild_collected: 0,
            multiplier_tier: 1,
            cumulative_win: 0.0,
            bet: 0.0,
            active_lines: 0,
            special_symbol: None,
        }
    }
}

/// Read-only view of an active round, attached to spin results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusSnapshot {
    pub remaining: u32,
    pub total_awarded: u32,
    pub wild_collected: u32,
    pub multiplier_tier: u32,
    pub cumulative_win: f64,
    pub special_symbol: Option<u32>,
}

impl BonusState {
    /// Start a fresh round. Callers must check `active` first: a new round
    /// never cold-starts over a running one.
    pub fn trigger(awarded: u32, bet: f64, active_lines: u8) -> Self {
        Self {
            active: true,
            remaining: awarded,
            total_awarded: awarded,
            wild_collected: 0,
            multiplier_tier: 1,
            cumulative_win: 0.0,
            bet,
            active_lines,
            special_symbol: None,
        }
    }

    /// Add spins to the running round. Retriggers are additive, never a
    /// fresh start.
    pub fn retrigger(&mut self, awarded: u32) {
        debug_assert!(self.active);
        self.remaining += awarded;
        self.total_awarded += awarded;
    }

    /// Record the wild outcome of one bonus grid: at most one collection
    /// tick per spin, and an immediate ladder re-check. Escalation applies
    /// from this spin onward.
    pub fn register_wild_spin(&mut self, wild_visible: bool, ladder: &MultiplierLadder) {
        if !wild_visible {
            return;
        }
        self.wild_collected += 1;
        let tier = ladder.tier_for(self.wild_collected);
        if tier > self.multiplier_tier {
            self.multiplier_tier = tier;
        }
    }

    /// Add a spin's winnings (line + scatter + collection) to the round
    pub fn accumulate(&mut self, amount: f64) {
        self.cumulative_win += amount;
    }

    /// Spend one spin of the round. On the last spin the round completes:
    /// the cumulative win is returned as the lump sum and the state resets
    /// to inactive.
    pub fn consume_spin(&mut self) -> Option<f64> {
        debug_assert!(self.active && self.remaining > 0);
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            let lump = self.cumulative_win;
            *self = Self::default();
            Some(lump)
        } else {
            None
        }
    }

    /// Detect and recover from a desynced round (`active` with no spins
    /// remaining). The state is force-reset; the caller gets an
    /// engine-integrity error rather than a silent continue.
    pub fn ensure_consistent(&mut self) -> EngineResult<()> {
        if self.active && self.remaining == 0 {
            log::error!(
                "bonus state desync: active round with remaining=0 (awarded={}), forcing reset",
                self.total_awarded
            );
            *self = Self::default();
            return Err(EngineError::StateDesync);
        }
        Ok(())
    }

    /// Snapshot for spin results; `None` while inactive
    pub fn snapshot(&self) -> Option<BonusSnapshot> {
        self.active.then(|| BonusSnapshot {
            remaining: self.remaining,
            total_awarded: self.total_awarded,
            wild_collected: self.wild_collected,
            multiplier_tier: self.multiplier_tier,
            cumulative_win: self.cumulative_win,
            special_symbol: self.special_symbol,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TierStep;

    fn ladder() -> MultiplierLadder {
        MultiplierLadder {
            steps: vec![
                TierStep { wilds: 4, tier: 2 },
                TierStep { wilds: 8, tier: 3 },
                TierStep { wilds: 12, tier: 10 },
            ],
        }
    }

    #[test]
    fn trigger_initializes_the_round() {
        let state = BonusState::trigger(10, 2.0, 20);
        assert!(state.active);
        assert_eq!(state.remaining, 10);
        assert_eq!(state.total_awarded, 10);
        assert_eq!(state.wild_collected, 0);
        assert_eq!(state.multiplier_tier, 1);
        assert_eq!(state.cumulative_win, 0.0);
    }

    #[test]
    fn retrigger_adds_spins() {
        let mut state = BonusState::trigger(10, 1.0, 20);
        state.consume_spin();
        state.consume_spin();
        assert_eq!(state.remaining, 8);
        state.retrigger(10);
        assert_eq!(state.remaining, 18);
        assert_eq!(state.total_awarded, 20);
    }

    #[test]
    fn consume_spin_decrements_exactly_once_and_completes_at_zero() {
        let mut state = BonusState::trigger(3, 1.0, 20);
        state.accumulate(12.5);
        assert_eq!(state.consume_spin(), None);
        assert_eq!(state.remaining, 2);
        assert_eq!(state.consume_spin(), None);
        state.accumulate(7.5);
        let lump = state.consume_spin();
        assert_eq!(lump, Some(20.0));
        assert!(!state.active);
        assert_eq!(state, BonusState::default());
    }

    #[test]
    fn tier_escalates_at_thresholds_and_never_decreases() {
        let ladder = ladder();
        let mut state = BonusState::trigger(50, 1.0, 20);

        for _ in 0..3 {
            state.register_wild_spin(true, &ladder);
            assert_eq!(state.multiplier_tier, 1);
        }
        state.register_wild_spin(true, &ladder);
        assert_eq!(state.wild_collected, 4);
        assert_eq!(state.multiplier_tier, 2);

        // wildless spins change nothing
        state.register_wild_spin(false, &ladder);
        assert_eq!(state.wild_collected, 4);
        assert_eq!(state.multiplier_tier, 2);

        for _ in 0..4 {
            state.register_wild_spin(true, &ladder);
        }
        assert_eq!(state.multiplier_tier, 3);
        for _ in 0..4 {
            state.register_wild_spin(true, &ladder);
        }
        assert_eq!(state.multiplier_tier, 10);
    }

    #[test]
    fn fresh_trigger_resets_tier_to_one() {
        let ladder = ladder();
        let mut state = BonusState::trigger(5, 1.0, 20);
        for _ in 0..8 {
            state.register_wild_spin(true, &ladder);
        }
        assert_eq!(state.multiplier_tier, 3);
        while state.active {
            state.consume_spin();
        }
        let state = BonusState::trigger(5, 1.0, 20);
        assert_eq!(state.multiplier_tier, 1);
    }

    #[test]
    fn desync_resets_and_reports() {
        let mut state = BonusState::trigger(5, 1.0, 20);
        state.remaining = 0; // corrupt it
        let err = state.ensure_consistent().unwrap_err();
        assert!(matches!(err, EngineError::StateDesync));
        assert_eq!(state, BonusState::default());
        // a consistent state passes
        assert!(BonusState::default().ensure_consistent().is_ok());
    }
}
