//! Pot Logic Engine — Pot Odds & Recommendation
//!
//! Pure arithmetic over the betting situation and an equity figure.
//!
//! ## Pipeline
//!
//! 1. **Pot Odds**: `bet / (pot + bet)`, the break-even equity for a call
//! 2. **Implied Odds**: pot scaled by position and player-count multipliers
//! 3. **EV**: `equity × (pot + implied) − bet`
//! 4. **Recommendation**: EV and equity thresholds mapped to an action

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::OddsConfig;
use crate::error::{EngineError, Result};

pub const MIN_PLAYERS: u32 = 2;
pub const MAX_PLAYERS: u32 = 10;

/// Seat position at the table. Unrecognised names map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Position {
    Early,
    Middle,
    Cutoff,
    Button,
    SmallBlind,
    BigBlind,
    Blinds,
    #[default]
    Unknown,
}

impl Position {
    pub fn name(self) -> &'static str {
        match self {
            Position::Early => "early",
            Position::Middle => "middle",
            Position::Cutoff => "cutoff",
            Position::Button => "button",
            Position::SmallBlind => "small_blind",
            Position::BigBlind => "big_blind",
            Position::Blinds => "blinds",
            Position::Unknown => "unknown",
        }
    }
}

impl FromStr for Position {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let position = match s.trim().to_ascii_lowercase().as_str() {
            "early" => Position::Early,
            "middle" => Position::Middle,
            "cutoff" => Position::Cutoff,
            "button" => Position::Button,
            "small_blind" => Position::SmallBlind,
            "big_blind" => Position::BigBlind,
            "blinds" => Position::Blinds,
            _ => Position::Unknown,
        };
        Ok(position)
    }
}

impl From<String> for Position {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(p) => p,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Playing advice derived from EV and equity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Recommendation {
    InsufficientInformation,
    StrongCall,
    MarginalCall,
    CallEquityExceedsPotOdds,
    Fold,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Recommendation::InsufficientInformation => "insufficient information",
            Recommendation::StrongCall => "strong call",
            Recommendation::MarginalCall => "marginal call",
            Recommendation::CallEquityExceedsPotOdds => "call — equity exceeds pot odds",
            Recommendation::Fold => "fold",
        };
        f.write_str(text)
    }
}

impl From<Recommendation> for String {
    fn from(r: Recommendation) -> Self {
        r.to_string()
    }
}

/// The betting situation a decision is made in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OddsInput {
    pub pot_size: f64,
    pub bet_to_call: f64,
    pub position: Position,
    pub num_players: u32,
}

/// Pot odds analysis. Ratio rounded to 4 places, everything else to 2.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsResult {
    pub pot_odds_ratio: f64,
    pub pot_odds_percentage: f64,
    pub implied_odds: f64,
    pub equity: f64,
    pub expected_value: f64,
    pub is_profitable: bool,
    pub recommendation: Recommendation,
    pub break_even_equity: f64,
}

/// Stateless calculator over an immutable [`OddsConfig`].
#[derive(Debug, Clone, Copy)]
pub struct OddsCalculator<'a> {
    config: &'a OddsConfig,
}

impl<'a> OddsCalculator<'a> {
    pub fn new(config: &'a OddsConfig) -> Self {
        Self { config }
    }

    /// Reject non-positive pots, negative calls and out-of-range tables.
    pub fn validate(input: &OddsInput) -> Result<()> {
        if !(input.pot_size.is_finite() && input.pot_size > 0.0) {
            return Err(EngineError::invalid(format!(
                "pot_size must be positive, got {}",
                input.pot_size
            )));
        }
        if !(input.bet_to_call.is_finite() && input.bet_to_call >= 0.0) {
            return Err(EngineError::invalid(format!(
                "bet_to_call must not be negative, got {}",
                input.bet_to_call
            )));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&input.num_players) {
            return Err(EngineError::invalid(format!(
                "num_players must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {}",
                input.num_players
            )));
        }
        Ok(())
    }

    /// Pot scaled by position and player-count multipliers.
    pub fn implied_odds(&self, input: &OddsInput) -> f64 {
        input.pot_size
            * self.config.position_multiplier(input.position)
            * self.config.player_count_multiplier(input.num_players)
    }

    /// Full analysis for `equity` (a percentage, 0 = unknown).
    pub fn calculate(&self, input: &OddsInput, equity: f64) -> Result<OddsResult> {
        Self::validate(input)?;
        if !(0.0..=100.0).contains(&equity) {
            return Err(EngineError::invalid(format!(
                "equity must be a percentage in [0, 100], got {equity}"
            )));
        }

        // ── Step 1: Pot Odds ────────────────────────────────────────
        let ratio = input.bet_to_call / (input.pot_size + input.bet_to_call);
        let pot_odds_pct = ratio * 100.0;

        // ── Step 2: Implied Odds ────────────────────────────────────
        let implied = self.implied_odds(input);

        // ── Step 3: EV ──────────────────────────────────────────────
        let ev = expected_value(input.pot_size, input.bet_to_call, equity, implied);

        // ── Step 4: Recommendation ──────────────────────────────────
        let is_profitable = equity > 0.0 && equity > pot_odds_pct;
        let recommendation = recommend(
            equity,
            pot_odds_pct,
            ev,
            input.bet_to_call,
            self.config.strong_call_fraction,
        );

        log::trace!(
            "pot odds {pot_odds_pct:.2}% equity {equity:.2}% ev {ev:.2} -> {recommendation}"
        );

        Ok(OddsResult {
            pot_odds_ratio: round_to(ratio, 4),
            pot_odds_percentage: round_to(pot_odds_pct, 2),
            implied_odds: round_to(implied, 2),
            equity: round_to(equity, 2),
            expected_value: round_to(ev, 2),
            is_profitable,
            recommendation,
            break_even_equity: round_to(pot_odds_pct, 2),
        })
    }
}

/// EV of calling, with equity given as a percentage.
pub fn expected_value(pot_size: f64, bet_to_call: f64, equity: f64, implied_odds: f64) -> f64 {
    (equity / 100.0) * (pot_size + implied_odds) - bet_to_call
}

fn recommend(
    equity: f64,
    pot_odds_pct: f64,
    ev: f64,
    bet_to_call: f64,
    strong_call_fraction: f64,
) -> Recommendation {
    if equity == 0.0 {
        Recommendation::InsufficientInformation
    } else if ev > 0.0 && ev > bet_to_call * strong_call_fraction {
        Recommendation::StrongCall
    } else if ev > 0.0 {
        Recommendation::MarginalCall
    } else if equity > pot_odds_pct {
        Recommendation::CallEquityExceedsPotOdds
    } else {
        Recommendation::Fold
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pot: f64, bet: f64, position: Position, players: u32) -> OddsInput {
        OddsInput { pot_size: pot, bet_to_call: bet, position, num_players: players }
    }

    #[test]
    fn test_pot_odds_example() {
        let config = OddsConfig::default();
        let calc = OddsCalculator::new(&config);
        let result = calc.calculate(&input(100.0, 20.0, Position::Unknown, 2), 0.0).unwrap();

        assert_eq!(result.pot_odds_percentage, 16.67);
        assert_eq!(result.break_even_equity, 16.67);
        assert_eq!(result.pot_odds_ratio, 0.1667);
        assert!(!result.is_profitable, "unknown equity is never profitable");
        assert_eq!(result.recommendation, Recommendation::InsufficientInformation);
    }

    #[test]
    fn test_implied_odds_multipliers() {
        let config = OddsConfig::default();
        let calc = OddsCalculator::new(&config);

        let button = calc.implied_odds(&input(100.0, 20.0, Position::Button, 2));
        assert!((button - 120.0).abs() < 1e-9);

        let early = calc.implied_odds(&input(100.0, 20.0, Position::Early, 3));
        assert!((early - 81.0).abs() < 1e-9, "0.9 × 0.9 × 100, got {early}");

        // Player multiplier floors at 0.8.
        let crowded = calc.implied_odds(&input(100.0, 20.0, Position::Middle, 10));
        assert!((crowded - 80.0).abs() < 1e-9);

        let blind = calc.implied_odds(&input(100.0, 20.0, Position::BigBlind, 2));
        assert!((blind - 100.0).abs() < 1e-9, "unlisted positions default to 1.0");
    }

    #[test]
    fn test_recommendation_tiers() {
        let config = OddsConfig::default();
        let calc = OddsCalculator::new(&config);

        // EV = 0.5 × 220 − 20 = 90 > 10
        let strong = calc.calculate(&input(100.0, 20.0, Position::Button, 2), 50.0).unwrap();
        assert_eq!(strong.recommendation, Recommendation::StrongCall);
        assert_eq!(strong.expected_value, 90.0);
        assert!(strong.is_profitable);

        // EV = 0.1 × 200 − 15 = 5, positive but below 7.5
        let marginal = calc.calculate(&input(100.0, 15.0, Position::Middle, 2), 10.0).unwrap();
        assert_eq!(marginal.recommendation, Recommendation::MarginalCall);

        // pot odds 66.67%, EV = 0.7 × 172 − 200 < 0
        let equity_call = calc.calculate(&input(100.0, 200.0, Position::Early, 10), 70.0).unwrap();
        assert!(equity_call.expected_value < 0.0);
        assert_eq!(equity_call.recommendation, Recommendation::CallEquityExceedsPotOdds);
        assert!(equity_call.is_profitable);

        let fold = calc.calculate(&input(100.0, 200.0, Position::Early, 10), 30.0).unwrap();
        assert_eq!(fold.recommendation, Recommendation::Fold);
        assert!(!fold.is_profitable);
    }

    #[test]
    fn test_free_call() {
        let config = OddsConfig::default();
        let calc = OddsCalculator::new(&config);
        let result = calc.calculate(&input(50.0, 0.0, Position::Cutoff, 4), 20.0).unwrap();
        assert_eq!(result.pot_odds_percentage, 0.0);
        assert!(result.is_profitable);
        assert_eq!(result.recommendation, Recommendation::StrongCall);
    }

    #[test]
    fn test_validation() {
        let config = OddsConfig::default();
        let calc = OddsCalculator::new(&config);
        let bad = [
            input(0.0, 10.0, Position::Button, 2),
            input(-5.0, 10.0, Position::Button, 2),
            input(f64::NAN, 10.0, Position::Button, 2),
            input(100.0, -1.0, Position::Button, 2),
            input(100.0, 10.0, Position::Button, 1),
            input(100.0, 10.0, Position::Button, 11),
        ];
        for case in bad {
            assert!(
                matches!(calc.calculate(&case, 50.0), Err(EngineError::InvalidInput(_))),
                "{case:?} should be rejected"
            );
        }
        assert!(calc.calculate(&input(100.0, 10.0, Position::Button, 2), 101.0).is_err());
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("BUTTON".parse::<Position>().unwrap(), Position::Button);
        assert_eq!("small_blind".parse::<Position>().unwrap(), Position::SmallBlind);
        assert_eq!("hijack".parse::<Position>().unwrap(), Position::Unknown);

        let p: Position = serde_json::from_str("\"Cutoff\"").unwrap();
        assert_eq!(p, Position::Cutoff);
        assert_eq!(serde_json::to_string(&Position::BigBlind).unwrap(), "\"big_blind\"");
    }

    #[test]
    fn test_recommendation_wire_strings() {
        let json = serde_json::to_string(&Recommendation::CallEquityExceedsPotOdds).unwrap();
        assert_eq!(json, "\"call — equity exceeds pot odds\"");
        assert_eq!(Recommendation::Fold.to_string(), "fold");
    }
}
