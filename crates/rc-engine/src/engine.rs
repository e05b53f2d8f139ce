//! Symbol-first spin engine
//!
//! The engine samples a grid first and evaluates what it shows — the
//! opposite of outcome-first designs that decide the win and backfill
//! symbols. Both shapes fit behind [`SpinEngine`]; only the symbol-first
//! strategy lives in this crate.
//!
//! Spin pipeline:
//!
//! ```text
//! SpinRequest
//!     │  validate → debit (base game only)
//!     v
//! VisibleGrid::sample ──> evaluate_spin (pure) ──> credit payout
//!     │                        │
//!     │                 BonusState in, BonusState out
//!     v                        v
//! SpinResult  <────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::bonus::BonusState;
use crate::collector;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::grid::VisibleGrid;
use crate::ledger::{DebitOutcome, Ledger};
use crate::paytable::{self, MAX_LINES, WinClass};
use crate::rng::{ChaChaSource, RandomSource};
use crate::spin::{SpinRequest, SpinResult};
use crate::symbols::SymbolCategory;

/// Capability interface for spin engines.
///
/// Symbol-first (this crate) and outcome-first engines are alternative
/// strategies behind this seam; their internals are never mixed.
pub trait SpinEngine {
    /// Execute one spin
    fn spin(&mut self, request: &SpinRequest) -> EngineResult<SpinResult>;

    /// Is a bonus round in progress?
    fn bonus_active(&self) -> bool;

    /// Session statistics so far
    fn stats(&self) -> &SessionStats;
}

/// Session statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub wins: u64,
    pub losses: u64,
    pub bonus_triggers: u64,
    pub bonus_spins: u64,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Return-to-player so far, in percent
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            (self.total_win / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Share of spins that won something, in percent
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    fn record(&mut self, result: &SpinResult) {
        self.total_spins += 1;
        if result.is_bonus_spin {
            self.bonus_spins += 1;
        } else {
            self.total_bet += result.bet;
            if result.free_spins_awarded > 0 {
                self.bonus_triggers += 1;
            }
        }
        self.total_win += result.payout;
        if result.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        if result.bet > 0.0 {
            let ratio = result.total_win / result.bet;
            if ratio > self.max_win_ratio {
                self.max_win_ratio = ratio;
            }
        }
    }
}

/// Evaluate one sampled grid against the current bonus state.
///
/// Pure: the grid is already drawn, the state goes in as a value and comes
/// back as a value, and no ledger or RNG is touched — identical inputs give
/// identical outputs. The engine wraps this with debit/credit and sampling.
///
/// `bet` and `active_lines` describe the request; during an active round the
/// values locked at trigger time are used instead. Intermediate bonus spins
/// carry `payout = 0` — the round settles as one lump on its final spin.
pub fn evaluate_spin(
    grid: VisibleGrid,
    bonus: &BonusState,
    config: &EngineConfig,
    bet: f64,
    active_lines: u8,
) -> (SpinResult, BonusState) {
    let catalog = &config.symbols;
    let in_bonus = bonus.active;
    let (bet, active_lines) = if in_bonus {
        (bonus.bet, bonus.active_lines)
    } else {
        (bet, active_lines)
    };

    let line_wins = paytable::evaluate_lines(&grid, catalog, active_lines, bet);
    let scatter = paytable::evaluate_scatters(&grid, catalog, &config.scatter, bet);
    let line_total: f64 = line_wins.iter().map(|w| w.amount).sum();
    let scatter_total = scatter.win.as_ref().map(|w| w.amount).unwrap_or(0.0);

    let mut next = bonus.clone();
    let mut collection = 0.0;
    let mut bonus_lump = 0.0;

    if in_bonus {
        if scatter.free_spins > 0 {
            next.retrigger(scatter.free_spins);
        }
        let wild_visible = grid.contains_category(catalog, SymbolCategory::Wild);
        next.register_wild_spin(wild_visible, &config.bonus.ladder);
        collection = collector::collect(&grid, catalog, next.multiplier_tier, bet);
        next.accumulate(line_total + scatter_total + collection);
        if let Some(lump) = next.consume_spin() {
            bonus_lump = lump;
        }
    } else if scatter.free_spins > 0 {
        next = BonusState::trigger(scatter.free_spins, bet, active_lines);
    }

    let total_win = line_total + scatter_total + bonus_lump;
    let payout = if in_bonus { bonus_lump } else { total_win };

    let result = SpinResult {
        bet,
        grid,
        line_wins,
        scatter_win: scatter.win,
        scatter_count: scatter.count,
        free_spins_awarded: scatter.free_spins,
        collection,
        bonus_lump,
        total_win,
        win_class: WinClass::for_win(total_win, bet),
        payout,
        is_bonus_spin: in_bonus,
        bonus: next.snapshot(),
    };
    (result, next)
}

/// The symbol-first slot engine for one player session.
///
/// Owns the session's bonus state exclusively; nothing here is shared or
/// global. Wrap it in a [`crate::session::Session`] when serving concurrent
/// callers.
pub struct SlotEngine<L: Ledger> {
    config: EngineConfig,
    rng: Box<dyn RandomSource>,
    bonus: BonusState,
    stats: SessionStats,
    ledger: L,
}

impl<L: Ledger> SlotEngine<L> {
    /// Create with OS-entropy randomness
    pub fn new(config: EngineConfig, ledger: L) -> EngineResult<Self> {
        Self::with_source(config, ledger, Box::new(ChaChaSource::from_os()))
    }

    /// Create with a fixed seed for reproducible sessions
    pub fn with_seed(config: EngineConfig, ledger: L, seed: u64) -> EngineResult<Self> {
        Self::with_source(config, ledger, Box::new(ChaChaSource::seeded(seed)))
    }

    /// Create with an injected random source
    pub fn with_source(
        config: EngineConfig,
        ledger: L,
        rng: Box<dyn RandomSource>,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            bonus: BonusState::default(),
            stats: SessionStats::default(),
            ledger,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Current bonus round state
    pub fn bonus_state(&self) -> &BonusState {
        &self.bonus
    }

    /// Spins left in the current round (0 when inactive)
    pub fn free_spins_remaining(&self) -> u32 {
        self.bonus.remaining
    }

    fn base_spin(&mut self, request: &SpinRequest) -> EngineResult<SpinResult> {
        if !self.config.bet.accepts(request.bet) {
            return Err(EngineError::InvalidBet(request.bet));
        }
        if request.active_lines == 0 || request.active_lines > MAX_LINES {
            return Err(EngineError::InvalidLineCount(request.active_lines));
        }

        // Debit strictly before the first RNG draw
        match self.ledger.debit(request.bet)? {
            DebitOutcome::InsufficientFunds => {
                return Err(EngineError::InsufficientFunds(request.bet));
            }
            DebitOutcome::Accepted => {}
        }

        // From here the stake is taken; a failed evaluation returns it
        let (result, next) = match self.compute_base(request) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.ledger.credit(request.bet)?;
                return Err(e);
            }
        };

        if result.payout > 0.0 {
            self.ledger.credit(result.payout)?;
        }
        if result.free_spins_awarded > 0 {
            log::info!(
                "bonus triggered: {} scatters, {} free spins",
                result.scatter_count,
                result.free_spins_awarded
            );
        }
        self.bonus = next;
        self.stats.record(&result);
        Ok(result)
    }

    fn compute_base(&mut self, request: &SpinRequest) -> EngineResult<(SpinResult, BonusState)> {
        let grid = VisibleGrid::sample(&self.config.symbols, false, &mut *self.rng)?;
        let (mut result, mut next) =
            evaluate_spin(grid, &self.bonus, &self.config, request.bet, request.active_lines);

        // Fresh trigger: optionally pick the round's persistent special
        // symbol from the standard set
        if next.active && self.config.bonus.select_special_symbol {
            let ids = self.config.symbols.standard_ids();
            if !ids.is_empty() {
                let pick = (self.rng.next_unit()? * ids.len() as f64) as usize;
                let id = ids[pick.min(ids.len() - 1)];
                next.special_symbol = Some(id);
                if let Some(snap) = result.bonus.as_mut() {
                    snap.special_symbol = Some(id);
                }
            }
        }
        Ok((result, next))
    }

    fn bonus_spin(&mut self) -> EngineResult<SpinResult> {
        // Free spin: no debit. A sampling failure leaves the round
        // untouched — the spin was never consumed.
        let grid = VisibleGrid::sample(&self.config.symbols, true, &mut *self.rng)?;
        let (result, next) = evaluate_spin(grid, &self.bonus, &self.config, 0.0, 0);

        if result.payout > 0.0 {
            self.ledger.credit(result.payout)?;
        }
        if result.free_spins_awarded > 0 {
            log::info!(
                "bonus retrigger: +{} free spins",
                result.free_spins_awarded
            );
        }
        if result.bonus_lump > 0.0 || !next.active {
            log::info!("bonus round complete, lump {}", result.bonus_lump);
        }
        self.bonus = next;
        self.stats.record(&result);
        Ok(result)
    }
}

impl<L: Ledger> SpinEngine for SlotEngine<L> {
    /// Execute one spin: a base-game spin when idle, the next free spin of
    /// the round when a bonus is running (request bet/lines are ignored
    /// then; the trigger-time values apply).
    fn spin(&mut self, request: &SpinRequest) -> EngineResult<SpinResult> {
        self.bonus.ensure_consistent()?;
        if let Some(seed) = request.seed {
            self.rng = Box::new(ChaChaSource::seeded(seed));
        }
        if self.bonus.active {
            self.bonus_spin()
        } else {
            self.base_spin(request)
        }
    }

    fn bonus_active(&self) -> bool {
        self.bonus.active
    }

    fn stats(&self) -> &SessionStats {
        &self.stats
    }
}
