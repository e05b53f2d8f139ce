//! Spin request and result types

use serde::{Deserialize, Serialize};

use crate::bonus::BonusSnapshot;
use crate::grid::VisibleGrid;
use crate::paytable::{LineWin, ScatterWin, WinClass};

/// One spin request from a player session
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpinRequest {
    /// Total bet
    pub bet: f64,
    /// Active paylines, a prefix of the master list (1..=20)
    pub active_lines: u8,
    /// Optional seed: swaps in a fresh seeded source for deterministic
    /// replay of this and all following spins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SpinRequest {
    pub fn new(bet: f64, active_lines: u8) -> Self {
        Self {
            bet,
            active_lines,
            seed: None,
        }
    }

    pub fn seeded(bet: f64, active_lines: u8, seed: u64) -> Self {
        Self {
            bet,
            active_lines,
            seed: Some(seed),
        }
    }
}

/// Complete outcome of one spin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinResult {
    /// Bet the spin was staked on (the trigger bet during a bonus round)
    pub bet: f64,
    /// The sampled window
    pub grid: VisibleGrid,
    /// Per-line wins on active paylines
    pub line_wins: Vec<LineWin>,
    /// Scatter payout, if any
    pub scatter_win: Option<ScatterWin>,
    /// Scatter symbols visible anywhere in the grid
    pub scatter_count: u8,
    /// Free spins awarded by this grid (fresh trigger or retrigger)
    pub free_spins_awarded: u32,
    /// Value-symbol collection for this spin (bonus rounds only)
    pub collection: f64,
    /// Completed round's lump sum; 0 unless the round ended on this spin
    pub bonus_lump: f64,
    /// Arithmetic total: line wins + scatter win + bonus lump
    pub total_win: f64,
    /// Size class of the aggregate win; `None` when nothing was won
    pub win_class: Option<WinClass>,
    /// Amount actually credited to the ledger for this spin
    pub payout: f64,
    /// Was this a free spin inside a bonus round?
    pub is_bonus_spin: bool,
    /// Bonus round state after this spin, while a round is running
    pub bonus: Option<BonusSnapshot>,
}

impl SpinResult {
    /// Did the spin win anything?
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Sum of the per-line wins
    pub fn line_total(&self) -> f64 {
        self.line_wins.iter().map(|w| w.amount).sum()
    }

    /// Scatter win amount, 0 when none
    pub fn scatter_total(&self) -> f64 {
        self.scatter_win.as_ref().map(|s| s.amount).unwrap_or(0.0)
    }
}
