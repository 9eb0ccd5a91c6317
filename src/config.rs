//! Pot Logic Engine — Configuration
//!
//! Immutable tables and tuning knobs. Built once (defaults or JSON), then
//! handed by reference to the simulator and the odds calculator.
//!
//! ```json
//! {
//!   "simulation": { "default_trials": 20000, "seed": 7 },
//!   "odds": { "equity_model": "category_heuristic" }
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::evaluator::HandCategory;
use crate::odds::Position;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub simulation: SimulationConfig,
    pub odds: OddsConfig,
}

impl EngineConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| EngineError::invalid(format!("engine config: {e}")))?;
        if config.simulation.batch_size == 0 {
            return Err(EngineError::invalid("engine config: batch_size must be positive"));
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Trials used when a request doesn't name a count.
    pub default_trials: u32,
    /// Trials per parallel work unit.
    pub batch_size: u32,
    /// Fixed seed for reproducible estimates. `None` draws one per call.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_trials: 10_000,
            batch_size: 1_000,
            seed: None,
        }
    }
}

/// Where `calculate_pot_odds` gets its equity figure from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityModel {
    /// Win probability from a Monte Carlo run.
    #[default]
    MonteCarlo,
    /// Fixed equity per made-hand category, scaled down for crowded pots.
    CategoryHeuristic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OddsConfig {
    pub position_multipliers: HashMap<Position, f64>,
    pub min_player_multiplier: f64,
    pub player_multiplier_step: f64,
    /// EV above this fraction of the call is a strong call.
    pub strong_call_fraction: f64,
    pub equity_model: EquityModel,
    pub category_equity: HashMap<HandCategory, f64>,
    pub min_heuristic_player_adjustment: f64,
}

impl Default for OddsConfig {
    fn default() -> Self {
        let position_multipliers = HashMap::from([
            (Position::Button, 1.2),
            (Position::Cutoff, 1.1),
            (Position::Middle, 1.0),
            (Position::Early, 0.9),
            (Position::Blinds, 1.0),
        ]);

        let category_equity = HashMap::from([
            (HandCategory::RoyalFlush, 95.0),
            (HandCategory::StraightFlush, 90.0),
            (HandCategory::FourOfAKind, 85.0),
            (HandCategory::FullHouse, 80.0),
            (HandCategory::Flush, 75.0),
            (HandCategory::Straight, 70.0),
            (HandCategory::ThreeOfAKind, 65.0),
            (HandCategory::TwoPair, 60.0),
            (HandCategory::Pair, 55.0),
            (HandCategory::HighCard, 50.0),
        ]);

        Self {
            position_multipliers,
            min_player_multiplier: 0.8,
            player_multiplier_step: 0.1,
            strong_call_fraction: 0.5,
            equity_model: EquityModel::MonteCarlo,
            category_equity,
            min_heuristic_player_adjustment: 0.5,
        }
    }
}

impl OddsConfig {
    /// Unlisted positions count as 1.0.
    pub fn position_multiplier(&self, position: Position) -> f64 {
        self.position_multipliers.get(&position).copied().unwrap_or(1.0)
    }

    pub fn player_count_multiplier(&self, num_players: u32) -> f64 {
        let extra = num_players.saturating_sub(2) as f64;
        (1.0 - extra * self.player_multiplier_step).max(self.min_player_multiplier)
    }

    /// Heuristic equity percentage for a made hand in an `num_players` pot.
    pub fn heuristic_equity(&self, category: HandCategory, num_players: u32) -> f64 {
        let base = self.category_equity.get(&category).copied().unwrap_or(50.0);
        let extra = num_players.saturating_sub(2) as f64;
        let adjustment =
            (1.0 - extra * self.player_multiplier_step).max(self.min_heuristic_player_adjustment);
        base * adjustment
    }
}
