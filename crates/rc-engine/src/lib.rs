//! # rc-engine — ReelCore slot outcome & bonus engine
//!
//! Turns a wager into a symbol grid, evaluates wins across configurable
//! paylines with wild and scatter rules, and drives a free-spins bonus
//! round with an escalating multiplier and a collectible value-symbol
//! mechanic. Rendering, audio, and balance persistence live elsewhere;
//! the balance is consumed through the [`Ledger`] contract.
//!
//! ## Architecture
//!
//! ```text
//! SlotEngine (per session)
//!     │
//!     ├── EngineConfig (symbols, pay tables, scatter table, ladder)
//!     ├── RandomSource (injectable, seedable)
//!     ├── BonusState (free spins, wild collection, multiplier tier)
//!     └── Ledger (external debit/credit)
//!           │
//!           v
//!     SpinRequest → VisibleGrid → evaluate_spin → SpinResult
//! ```
//!
//! Everything that determines RTP — weights, pay tables, thresholds — is
//! data in [`EngineConfig`], never code.

pub mod bonus;
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod ledger;
pub mod paytable;
pub mod rng;
pub mod session;
pub mod spin;
pub mod symbols;

pub use bonus::{BonusSnapshot, BonusState};
pub use config::{
    BetLimits, BonusConfig, EngineConfig, MultiplierLadder, ScatterAward, ScatterTable, TierStep,
    standard_catalog,
};
pub use engine::{SessionStats, SlotEngine, SpinEngine, evaluate_spin};
pub use error::{EngineError, EngineResult};
pub use grid::{REEL_COUNT, ROW_COUNT, VisibleGrid};
pub use ledger::{DebitOutcome, Ledger, MemoryLedger};
pub use paytable::{LineWin, MASTER_PAYLINES, MAX_LINES, Payline, ScatterWin, WinClass};
pub use rng::{ChaChaSource, RandomSource, SequenceSource};
pub use session::Session;
pub use spin::{SpinRequest, SpinResult};
pub use symbols::{Symbol, SymbolCatalog, SymbolCategory, WeightedPool};
