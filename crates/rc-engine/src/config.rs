//! Engine configuration
//!
//! Everything that determines return-to-player lives here as data: symbol
//! weights, pay tables, the scatter award table, the multiplier ladder, and
//! the value-symbol set. Retuning a game edits this config, never engine
//! code.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::symbols::{Symbol, SymbolCatalog};

/// Allowed bet range
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BetLimits {
    pub min_bet: f64,
    pub max_bet: f64,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min_bet: 0.10,
            max_bet: 100.0,
        }
    }
}

impl BetLimits {
    pub fn accepts(&self, bet: f64) -> bool {
        bet.is_finite() && bet > 0.0 && bet >= self.min_bet && bet <= self.max_bet
    }
}

/// One row of the scatter award table
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScatterAward {
    /// Minimum scatter count for this row
    pub count: u8,
    /// Free spins awarded
    pub free_spins: u32,
    /// Scatter payout as a multiplier of total bet
    pub pay: f64,
}

/// Data-driven scatter → free-spins mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterTable {
    /// Rows in ascending count order; counts below the first row award
    /// nothing
    pub awards: Vec<ScatterAward>,
}

impl Default for ScatterTable {
    fn default() -> Self {
        Self {
            awards: vec![
                ScatterAward { count: 3, free_spins: 10, pay: 2.0 },
                ScatterAward { count: 4, free_spins: 12, pay: 5.0 },
                ScatterAward { count: 5, free_spins: 15, pay: 20.0 },
            ],
        }
    }
}

impl ScatterTable {
    /// Best row for an observed scatter count (highest `count <= observed`)
    pub fn award_for(&self, observed: u8) -> Option<&ScatterAward> {
        self.awards.iter().rev().find(|a| observed >= a.count)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.awards.is_empty() {
            return Err(EngineError::Config("scatter table is empty".into()));
        }
        let mut prev = 0u8;
        for a in &self.awards {
            if a.count < 3 {
                return Err(EngineError::Config(
                    "scatter awards below 3 symbols are not allowed".into(),
                ));
            }
            if a.count <= prev {
                return Err(EngineError::Config(
                    "scatter table counts must be strictly ascending".into(),
                ));
            }
            if a.free_spins == 0 {
                return Err(EngineError::Config(
                    "scatter award with zero free spins".into(),
                ));
            }
            prev = a.count;
        }
        Ok(())
    }
}

/// One step of the wild-collection multiplier ladder
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierStep {
    /// Wilds collected to unlock this tier
    pub wilds: u32,
    /// Multiplier tier value once unlocked
    pub tier: u32,
}

/// Multiplier escalation thresholds for the bonus round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiplierLadder {
    /// Steps in ascending `wilds` order; tier 1 applies below the first step
    pub steps: Vec<TierStep>,
}

impl Default for MultiplierLadder {
    fn default() -> Self {
        Self {
            steps: vec![
                TierStep { wilds: 4, tier: 2 },
                TierStep { wilds: 8, tier: 3 },
                TierStep { wilds: 12, tier: 10 },
            ],
        }
    }
}

impl MultiplierLadder {
    /// Tier for a wild-collection count. Never below 1.
    pub fn tier_for(&self, wild_collected: u32) -> u32 {
        self.steps
            .iter()
            .rev()
            .find(|s| wild_collected >= s.wilds)
            .map(|s| s.tier)
            .unwrap_or(1)
    }

    fn validate(&self) -> EngineResult<()> {
        let mut prev_wilds = 0u32;
        let mut prev_tier = 1u32;
        for s in &self.steps {
            if s.wilds <= prev_wilds {
                return Err(EngineError::Config(
                    "multiplier ladder thresholds must be strictly ascending".into(),
                ));
            }
            if s.tier < prev_tier {
                return Err(EngineError::Config(
                    "multiplier ladder tiers must be non-decreasing".into(),
                ));
            }
            prev_wilds = s.wilds;
            prev_tier = s.tier;
        }
        Ok(())
    }
}

/// Bonus round configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusConfig {
    /// Multiplier escalation ladder
    pub ladder: MultiplierLadder,
    /// Select one standard symbol as the round's persistent special symbol
    /// (variant feature used by some game skins)
    #[serde(default)]
    pub select_special_symbol: bool,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            ladder: MultiplierLadder::default(),
            select_special_symbol: false,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Game name
    pub name: String,
    /// Symbol catalog with weights and pay tables
    pub symbols: SymbolCatalog,
    /// Bet limits
    pub bet: BetLimits,
    /// Scatter award table
    pub scatter: ScatterTable,
    /// Bonus round settings
    pub bonus: BonusConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "ReelCore Standard".into(),
            symbols: standard_catalog(),
            bet: BetLimits::default(),
            scatter: ScatterTable::default(),
            bonus: BonusConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Validate the whole configuration surface
    pub fn validate(&self) -> EngineResult<()> {
        self.symbols.validate()?;
        self.scatter.validate()?;
        self.bonus.ladder.validate()?;
        if !(self.bet.min_bet > 0.0 && self.bet.min_bet <= self.bet.max_bet) {
            return Err(EngineError::Config("bad bet limits".into()));
        }
        if self.symbols.scatter_id().is_none() && !self.scatter.awards.is_empty() {
            return Err(EngineError::Config(
                "scatter table configured without a scatter symbol".into(),
            ));
        }
        Ok(())
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::Serialization(e.to_string()))
    }

    /// Import from JSON, validating the result
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Import from YAML, validating the result
    pub fn from_yaml(yaml: &str) -> EngineResult<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| EngineError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// The standard ReelCore symbol set.
///
/// Industry naming: HP = high paying, LP = low paying. COIN symbols are the
/// bonus-only collectibles; their weights only apply inside a bonus round.
pub fn standard_catalog() -> SymbolCatalog {
    SymbolCatalog::new(vec![
        Symbol::standard(1, "HP1", 4, &[20.0, 100.0, 500.0]),
        Symbol::standard(2, "HP2", 5, &[15.0, 75.0, 300.0]),
        Symbol::standard(3, "HP3", 6, &[10.0, 50.0, 200.0]),
        Symbol::standard(4, "HP4", 7, &[8.0, 40.0, 150.0]),
        Symbol::standard(5, "LP1", 10, &[5.0, 25.0, 100.0]),
        Symbol::standard(6, "LP2", 11, &[4.0, 20.0, 80.0]),
        Symbol::standard(7, "LP3", 12, &[3.0, 15.0, 60.0]),
        Symbol::standard(8, "LP4", 13, &[2.0, 10.0, 40.0]),
        Symbol::wild(9, "WILD", 3, &[50.0, 200.0, 1000.0]),
        Symbol::scatter(10, "SCATTER", 2),
        Symbol::value(11, "COIN1", 5, 1.0),
        Symbol::value(12, "COIN2", 4, 2.0),
        Symbol::value(13, "COIN3", 2, 5.0),
        Symbol::value(14, "COIN4", 1, 8.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn scatter_table_lookup() {
        let table = ScatterTable::default();
        assert!(table.award_for(2).is_none());
        assert_eq!(table.award_for(3).unwrap().free_spins, 10);
        assert_eq!(table.award_for(4).unwrap().free_spins, 12);
        assert_eq!(table.award_for(5).unwrap().free_spins, 15);
        // counts beyond the last row clamp to it
        assert_eq!(table.award_for(9).unwrap().free_spins, 15);
    }

    #[test]
    fn ladder_tier_lookup_is_monotonic() {
        let ladder = MultiplierLadder::default();
        assert_eq!(ladder.tier_for(0), 1);
        assert_eq!(ladder.tier_for(3), 1);
        assert_eq!(ladder.tier_for(4), 2);
        assert_eq!(ladder.tier_for(7), 2);
        assert_eq!(ladder.tier_for(8), 3);
        assert_eq!(ladder.tier_for(12), 10);
        assert_eq!(ladder.tier_for(100), 10);
    }

    #[test]
    fn config_json_round_trip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        let back = EngineConfig::from_json(&json).unwrap();
        assert_eq!(back.name, config.name);
        assert_eq!(back.symbols.symbols().len(), config.symbols.symbols().len());
    }

    #[test]
    fn config_yaml_accepts_retuned_weights() {
        let yaml = r#"
name: Retuned
symbols:
  - { id: 1, name: HP1, category: standard, weight: 2, pay_values: [20.0, 100.0, 500.0] }
  - { id: 2, name: LP1, category: standard, weight: 40, pay_values: [2.0, 10.0, 40.0] }
  - { id: 9, name: WILD, category: wild, weight: 1, pay_values: [50.0, 200.0, 1000.0] }
  - { id: 10, name: SCATTER, category: scatter, weight: 1, pay_values: [] }
  - { id: 11, name: COIN1, category: value, weight: 3, pay_values: [], value: 1.0 }
bet: { min_bet: 0.1, max_bet: 50.0 }
scatter:
  awards:
    - { count: 3, free_spins: 8, pay: 2.0 }
bonus:
  ladder:
    steps:
      - { wilds: 5, tier: 2 }
  select_special_symbol: true
"#;
        let config = EngineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.scatter.award_for(3).unwrap().free_spins, 8);
        assert!(config.bonus.select_special_symbol);
        assert_eq!(config.bonus.ladder.tier_for(5), 2);
    }

    #[test]
    fn bad_scatter_table_is_rejected() {
        let mut config = EngineConfig::default();
        config.scatter.awards[0].count = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn descending_ladder_is_rejected() {
        let mut config = EngineConfig::default();
        config.bonus.ladder.steps = vec![
            TierStep { wilds: 4, tier: 3 },
            TierStep { wilds: 8, tier: 2 },
        ];
        assert!(config.validate().is_err());
    }
}
