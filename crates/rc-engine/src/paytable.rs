//! Payline evaluation and win classification

use serde::{Deserialize, Serialize};

use crate::config::ScatterTable;
use crate::grid::{REEL_COUNT, VisibleGrid};
use crate::symbols::{SymbolCatalog, SymbolCategory};

/// A payline: one row index per reel
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Row positions for each reel (e.g., [1, 0, 0, 0, 1] for a "V" shape)
    pub positions: [u8; REEL_COUNT],
}

const fn line(index: u8, positions: [u8; REEL_COUNT]) -> Payline {
    Payline { index, positions }
}

/// The static master payline list. A spin activates a prefix of 1..=20.
pub const MASTER_PAYLINES: [Payline; 20] = [
    // Straight lines
    line(0, [1, 1, 1, 1, 1]),
    line(1, [0, 0, 0, 0, 0]),
    line(2, [2, 2, 2, 2, 2]),
    // V shapes
    line(3, [0, 1, 2, 1, 0]),
    line(4, [2, 1, 0, 1, 2]),
    // Zigzag
    line(5, [0, 0, 1, 2, 2]),
    line(6, [2, 2, 1, 0, 0]),
    line(7, [1, 0, 0, 0, 1]),
    line(8, [1, 2, 2, 2, 1]),
    // W shapes
    line(9, [0, 1, 0, 1, 0]),
    line(10, [2, 1, 2, 1, 2]),
    // Diagonal
    line(11, [0, 1, 1, 1, 0]),
    line(12, [2, 1, 1, 1, 2]),
    // Steps
    line(13, [1, 1, 0, 1, 1]),
    line(14, [1, 1, 2, 1, 1]),
    // Complex
    line(15, [0, 2, 0, 2, 0]),
    line(16, [2, 0, 2, 0, 2]),
    line(17, [1, 0, 1, 0, 1]),
    line(18, [1, 2, 1, 2, 1]),
    line(19, [0, 0, 2, 0, 0]),
];

/// Maximum activatable payline count
pub const MAX_LINES: u8 = MASTER_PAYLINES.len() as u8;

/// Win size class, as a multiple of total bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinClass {
    /// Below 5x bet
    Small,
    /// 5x up to 20x bet
    Medium,
    /// 20x up to 50x bet
    Large,
    /// 50x bet and above
    Mega,
}

impl WinClass {
    /// Classify a positive win ratio (win / bet)
    pub fn classify(ratio: f64) -> WinClass {
        if ratio >= 50.0 {
            WinClass::Mega
        } else if ratio >= 20.0 {
            WinClass::Large
        } else if ratio >= 5.0 {
            WinClass::Medium
        } else {
            WinClass::Small
        }
    }

    /// Classify a win amount against a bet; `None` when nothing was won
    pub fn for_win(amount: f64, bet: f64) -> Option<WinClass> {
        (amount > 0.0 && bet > 0.0).then(|| Self::classify(amount / bet))
    }
}

/// A win on a single payline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineWin {
    /// Payline index
    pub line_index: u8,
    /// Anchor symbol that paid
    pub symbol_id: u32,
    /// Run length (3..=5)
    pub run_length: u8,
    /// Win amount
    pub amount: f64,
    /// Size class relative to total bet
    pub win_class: WinClass,
}

/// Scatter payout for a spin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterWin {
    /// Scatter symbols visible anywhere in the grid
    pub count: u8,
    /// Win amount (total-bet multiplier from the award table)
    pub amount: f64,
    /// Size class relative to total bet
    pub win_class: WinClass,
}

/// Position-independent scatter outcome
#[derive(Debug, Clone, Default)]
pub struct ScatterHit {
    /// Scatter symbols visible anywhere in the grid
    pub count: u8,
    /// Scatter payout, if the count reached the award table
    pub win: Option<ScatterWin>,
    /// Free spins awarded by the table (0 below the trigger count)
    pub free_spins: u32,
}

/// Evaluate all active paylines left to right.
///
/// Matching rule: the run anchors on the first non-Wild symbol of the line;
/// leading Wilds join that run. A line of nothing but Wilds anchors as Wild
/// and pays the Wild's own table. If the anchor has no line pay table
/// (Scatter, Value), the line pays nothing. A run extends while the next
/// symbol equals the anchor or is Wild, and anything shorter than 3 pays
/// nothing. Each line stakes `bet / active_lines`.
pub fn evaluate_lines(
    grid: &VisibleGrid,
    catalog: &SymbolCatalog,
    active_lines: u8,
    bet: f64,
) -> Vec<LineWin> {
    let line_bet = bet / active_lines as f64;
    let mut wins = Vec::new();

    for payline in MASTER_PAYLINES.iter().take(active_lines as usize) {
        if let Some(win) = evaluate_line(grid, catalog, payline, line_bet, bet) {
            wins.push(win);
        }
    }
    wins
}

fn evaluate_line(
    grid: &VisibleGrid,
    catalog: &SymbolCatalog,
    payline: &Payline,
    line_bet: f64,
    bet: f64,
) -> Option<LineWin> {
    let mut symbols = [0u32; REEL_COUNT];
    for (reel, &row) in payline.positions.iter().enumerate() {
        symbols[reel] = grid.at(reel, row as usize);
    }

    // Leading wilds defer to the first non-wild anchor
    let anchor = symbols
        .iter()
        .find(|&&id| !catalog.is_wild(id))
        .copied()
        .or_else(|| catalog.wild_id())?;

    let mut run_length = 0u8;
    for &id in &symbols {
        if id == anchor || catalog.is_wild(id) {
            run_length += 1;
        } else {
            break;
        }
    }

    if run_length < 3 {
        return None;
    }

    let symbol = catalog.get(anchor)?;
    let pay = symbol.pay(run_length);
    if pay <= 0.0 {
        return None;
    }

    let amount = line_bet * pay;
    Some(LineWin {
        line_index: payline.index,
        symbol_id: anchor,
        run_length,
        amount,
        win_class: WinClass::classify(amount / bet),
    })
}

/// Count scatters anywhere in the grid and look up the award table
pub fn evaluate_scatters(
    grid: &VisibleGrid,
    catalog: &SymbolCatalog,
    table: &ScatterTable,
    bet: f64,
) -> ScatterHit {
    let count = grid.count_category(catalog, SymbolCategory::Scatter);
    let Some(award) = table.award_for(count) else {
        return ScatterHit {
            count,
            win: None,
            free_spins: 0,
        };
    };

    let amount = award.pay * bet;
    ScatterHit {
        count,
        win: (amount > 0.0).then(|| ScatterWin {
            count,
            amount,
            win_class: WinClass::classify(award.pay),
        }),
        free_spins: award.free_spins,
    }
}
