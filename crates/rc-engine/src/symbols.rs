//! Symbol definitions, catalog, and weighted drawing

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::rng::RandomSource;

/// Symbol category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolCategory {
    /// Regular paying symbol
    Standard,
    /// Substitutes for any standard symbol within a payline run
    Wild,
    /// Counted anywhere in the grid; triggers the bonus round
    Scatter,
    /// Bonus-only collectible carrying a fixed value
    Value,
}

/// A symbol definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: u32,
    /// Symbol name (e.g., "HP1", "LP3", "WILD")
    pub name: String,
    /// Symbol category
    pub category: SymbolCategory,
    /// Draw weight. Value symbols only ever enter the bonus pool; everything
    /// else with weight 0 is excluded from all pools.
    pub weight: u32,
    /// Line pay multipliers for 3, 4, 5 of a kind (index 0 = 3oak)
    #[serde(default)]
    pub pay_values: Vec<f64>,
    /// Collectible value in bet units (Value symbols only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Symbol {
    /// Create a standard symbol
    pub fn standard(id: u32, name: impl Into<String>, weight: u32, pays: &[f64]) -> Self {
        Self {
            id,
            name: name.into(),
            category: SymbolCategory::Standard,
            weight,
            pay_values: pays.to_vec(),
            value: None,
        }
    }

    /// Create a wild symbol with its own pay table
    pub fn wild(id: u32, name: impl Into<String>, weight: u32, pays: &[f64]) -> Self {
        Self {
            id,
            name: name.into(),
            category: SymbolCategory::Wild,
            weight,
            pay_values: pays.to_vec(),
            value: None,
        }
    }

    /// Create a scatter symbol. Scatter pays live in the scatter award
    /// table, not here.
    pub fn scatter(id: u32, name: impl Into<String>, weight: u32) -> Self {
        Self {
            id,
            name: name.into(),
            category: SymbolCategory::Scatter,
            weight,
            pay_values: Vec::new(),
            value: None,
        }
    }

    /// Create a value symbol carrying `value` bet units
    pub fn value(id: u32, name: impl Into<String>, weight: u32, value: f64) -> Self {
        Self {
            id,
            name: name.into(),
            category: SymbolCategory::Value,
            weight,
            pay_values: Vec::new(),
            value: Some(value),
        }
    }

    /// Line pay multiplier for a run length
    pub fn pay(&self, run_length: u8) -> f64 {
        if run_length < 3 {
            return 0.0;
        }
        let idx = (run_length - 3) as usize;
        self.pay_values.get(idx).copied().unwrap_or(0.0)
    }
}

/// The full symbol catalog for a game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
}

impl SymbolCatalog {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Get symbol by ID
    pub fn get(&self, id: u32) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Check whether an ID is a wild symbol
    pub fn is_wild(&self, id: u32) -> bool {
        self.get(id)
            .is_some_and(|s| s.category == SymbolCategory::Wild)
    }

    pub fn category_of(&self, id: u32) -> Option<SymbolCategory> {
        self.get(id).map(|s| s.category)
    }

    /// First wild symbol ID
    pub fn wild_id(&self) -> Option<u32> {
        self.symbols
            .iter()
            .find(|s| s.category == SymbolCategory::Wild)
            .map(|s| s.id)
    }

    /// First scatter symbol ID
    pub fn scatter_id(&self) -> Option<u32> {
        self.symbols
            .iter()
            .find(|s| s.category == SymbolCategory::Scatter)
            .map(|s| s.id)
    }

    /// All standard symbol IDs
    pub fn standard_ids(&self) -> Vec<u32> {
        self.symbols
            .iter()
            .filter(|s| s.category == SymbolCategory::Standard)
            .map(|s| s.id)
            .collect()
    }

    /// Build the eligible draw pool.
    ///
    /// Value symbols are bonus-only: outside an active round they are never
    /// eligible, regardless of their configured weight.
    pub fn pool(&self, bonus_active: bool) -> WeightedPool {
        let entries: Vec<(u32, u32)> = self
            .symbols
            .iter()
            .filter(|s| s.weight > 0)
            .filter(|s| bonus_active || s.category != SymbolCategory::Value)
            .map(|s| (s.id, s.weight))
            .collect();
        WeightedPool::new(entries)
    }

    /// Catalog sanity checks used by config validation
    pub fn validate(&self) -> EngineResult<()> {
        if !self
            .symbols
            .iter()
            .any(|s| s.category == SymbolCategory::Standard && s.weight > 0)
        {
            return Err(EngineError::Config(
                "catalog needs at least one drawable standard symbol".into(),
            ));
        }
        for s in &self.symbols {
            if self.symbols.iter().filter(|o| o.id == s.id).count() > 1 {
                return Err(EngineError::Config(format!("duplicate symbol id {}", s.id)));
            }
            match s.category {
                SymbolCategory::Value => {
                    if s.value.is_none() {
                        return Err(EngineError::Config(format!(
                            "value symbol {} has no value",
                            s.name
                        )));
                    }
                }
                _ => {
                    if s.value.is_some() {
                        return Err(EngineError::Config(format!(
                            "non-value symbol {} carries a value",
                            s.name
                        )));
                    }
                }
            }
            if s.pay_values.len() > 3 {
                return Err(EngineError::Config(format!(
                    "symbol {} pay table longer than 5-of-a-kind",
                    s.name
                )));
            }
        }
        Ok(())
    }
}

/// Cumulative-weight draw pool over symbol IDs
#[derive(Debug, Clone)]
pub struct WeightedPool {
    entries: Vec<(u32, u32)>,
    total: u64,
}

impl WeightedPool {
    pub fn new(entries: Vec<(u32, u32)>) -> Self {
        let total = entries.iter().map(|(_, w)| *w as u64).sum();
        Self { entries, total }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Draw one symbol ID: `rng * total_weight` walked over the cumulative
    /// weight list.
    pub fn draw(&self, rng: &mut dyn RandomSource) -> EngineResult<u32> {
        if self.is_empty() {
            return Err(EngineError::Config("draw from empty symbol pool".into()));
        }
        let target = rng.next_unit()? * self.total as f64;
        let mut cumulative = 0u64;
        for (id, weight) in &self.entries {
            cumulative += *weight as u64;
            if target < cumulative as f64 {
                return Ok(*id);
            }
        }
        // target landed on the total due to float rounding
        Ok(self.entries[self.entries.len() - 1].0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ChaChaSource, SequenceSource};

    fn small_catalog() -> SymbolCatalog {
        SymbolCatalog::new(vec![
            Symbol::standard(1, "A", 30, &[5.0, 20.0, 100.0]),
            Symbol::standard(2, "B", 60, &[2.0, 8.0, 40.0]),
            Symbol::wild(3, "WILD", 10, &[10.0, 50.0, 250.0]),
            Symbol::scatter(4, "SCATTER", 5),
            Symbol::value(5, "COIN", 8, 2.0),
        ])
    }

    #[test]
    fn symbol_pay_lookup() {
        let s = Symbol::standard(1, "A", 10, &[5.0, 20.0, 100.0]);
        assert_eq!(s.pay(2), 0.0);
        assert_eq!(s.pay(3), 5.0);
        assert_eq!(s.pay(4), 20.0);
        assert_eq!(s.pay(5), 100.0);
        assert_eq!(s.pay(6), 0.0);
    }

    #[test]
    fn base_pool_excludes_value_symbols() {
        let catalog = small_catalog();
        let base = catalog.pool(false);
        let bonus = catalog.pool(true);

        let mut rng = ChaChaSource::seeded(9);
        for _ in 0..2000 {
            let id = base.draw(&mut rng).unwrap();
            assert_ne!(
                catalog.category_of(id),
                Some(SymbolCategory::Value),
                "value symbol drawn outside a bonus round"
            );
        }
        // and the bonus pool can produce it
        let mut rng = ChaChaSource::seeded(9);
        let mut saw_value = false;
        for _ in 0..2000 {
            if catalog.category_of(bonus.draw(&mut rng).unwrap()) == Some(SymbolCategory::Value) {
                saw_value = true;
                break;
            }
        }
        assert!(saw_value);
    }

    #[test]
    fn draw_boundaries_map_to_expected_symbols() {
        // weights 30/60 -> cumulative 30, 90
        let pool = WeightedPool::new(vec![(1, 30), (2, 60)]);
        let mut rng = SequenceSource::new(vec![0.0, 0.3333, 0.3334, 0.9999]);
        assert_eq!(pool.draw(&mut rng).unwrap(), 1);
        assert_eq!(pool.draw(&mut rng).unwrap(), 1); // 29.997 < 30
        assert_eq!(pool.draw(&mut rng).unwrap(), 2); // 30.006 >= 30
        assert_eq!(pool.draw(&mut rng).unwrap(), 2);
    }

    #[test]
    fn draw_frequency_tracks_weight() {
        let pool = WeightedPool::new(vec![(1, 10), (2, 90)]);
        let mut rng = ChaChaSource::seeded(1234);
        let n = 50_000;
        let mut ones = 0u32;
        for _ in 0..n {
            if pool.draw(&mut rng).unwrap() == 1 {
                ones += 1;
            }
        }
        let freq = ones as f64 / n as f64;
        assert!((freq - 0.10).abs() < 0.01, "observed {freq}");
    }

    #[test]
    fn catalog_validation_catches_bad_value_symbol() {
        let mut bad = Symbol::value(5, "COIN", 8, 2.0);
        bad.value = None;
        let catalog = SymbolCatalog::new(vec![Symbol::standard(1, "A", 10, &[1.0]), bad]);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn catalog_validation_catches_duplicate_ids() {
        let catalog = SymbolCatalog::new(vec![
            Symbol::standard(1, "A", 10, &[1.0]),
            Symbol::standard(1, "B", 10, &[1.0]),
        ]);
        assert!(catalog.validate().is_err());
    }
}
