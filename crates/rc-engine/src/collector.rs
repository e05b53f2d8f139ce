//! Value-symbol collection
//!
//! Coins only matter during an active bonus round, and only cash in when a
//! Wild lands in the same grid. Visible values never carry over to the next
//! spin: no Wild, no collection, coins gone.

use crate::grid::VisibleGrid;
use crate::symbols::{SymbolCatalog, SymbolCategory};

/// A spin's collection amount.
///
/// `sum(visible values) * multiplier_tier * bet` when at least one Wild is
/// visible in the same grid, else exactly 0.
pub fn collect(
    grid: &VisibleGrid,
    catalog: &SymbolCatalog,
    multiplier_tier: u32,
    bet: f64,
) -> f64 {
    if !grid.contains_category(catalog, SymbolCategory::Wild) {
        return 0.0;
    }
    grid.visible_value_sum(catalog) * multiplier_tier as f64 * bet
}
