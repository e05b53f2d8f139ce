//! Visible grid sampling
//!
//! The engine plays on a fixed 5×3 window. Each cell is drawn independently
//! from the weighted pool: there is no virtual reel strip, so vertically
//! adjacent cells are uncorrelated. This is a deliberate simplification
//! versus physical strip simulation and the per-cell independence is what
//! the deterministic grid tests rely on — one RNG draw per cell, reel-major
//! order.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::rng::RandomSource;
use crate::symbols::{SymbolCatalog, SymbolCategory};

/// Number of reels (columns)
pub const REEL_COUNT: usize = 5;
/// Number of visible rows per reel
pub const ROW_COUNT: usize = 3;

/// The visible symbol window for one spin, reel-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleGrid {
    cells: [[u32; ROW_COUNT]; REEL_COUNT],
}

impl VisibleGrid {
    /// Sample a fresh grid. `bonus_active` selects the draw pool: value
    /// symbols are only eligible during an active bonus round.
    pub fn sample(
        catalog: &SymbolCatalog,
        bonus_active: bool,
        rng: &mut dyn RandomSource,
    ) -> EngineResult<Self> {
        let pool = catalog.pool(bonus_active);
        let mut cells = [[0u32; ROW_COUNT]; REEL_COUNT];
        for reel in cells.iter_mut() {
            for cell in reel.iter_mut() {
                *cell = pool.draw(rng)?;
            }
        }
        Ok(Self { cells })
    }

    /// Build a grid from explicit reel columns (tests, replays)
    pub fn from_reels(cells: [[u32; ROW_COUNT]; REEL_COUNT]) -> Self {
        Self { cells }
    }

    /// Symbol at (reel, row)
    pub fn at(&self, reel: usize, row: usize) -> u32 {
        self.cells[reel][row]
    }

    /// Iterate all cells as (reel, row, symbol_id)
    pub fn iter_cells(&self) -> impl Iterator<Item = (u8, u8, u32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(reel, col)| {
            col.iter()
                .enumerate()
                .map(move |(row, &id)| (reel as u8, row as u8, id))
        })
    }

    /// Count visible symbols of a category, anywhere in the window
    pub fn count_category(&self, catalog: &SymbolCatalog, category: SymbolCategory) -> u8 {
        self.iter_cells()
            .filter(|(_, _, id)| catalog.category_of(*id) == Some(category))
            .count() as u8
    }

    /// Is at least one symbol of the category visible?
    pub fn contains_category(&self, catalog: &SymbolCatalog, category: SymbolCategory) -> bool {
        self.iter_cells()
            .any(|(_, _, id)| catalog.category_of(id) == Some(category))
    }

    /// Sum of the values carried by visible value symbols, in bet units
    pub fn visible_value_sum(&self, catalog: &SymbolCatalog) -> f64 {
        self.iter_cells()
            .filter_map(|(_, _, id)| catalog.get(id))
            .filter(|s| s.category == SymbolCategory::Value)
            .filter_map(|s| s.value)
            .sum()
    }
}
