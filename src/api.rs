//! Pot Logic Engine — External Operations
//!
//! The three calls the web layer makes. Requests arrive as card tokens and
//! plain numbers, responses leave as serializable structs.
//!
//! | Operation                 | Request              | Response             |
//! |---------------------------|----------------------|----------------------|
//! | `evaluate_hand`           | [`HandRequest`]      | [`HandEvaluation`]   |
//! | `calculate_probabilities` | [`ProbabilityRequest`] | [`ProbabilityReport`] |
//! | `calculate_pot_odds`      | [`PotOddsRequest`]   | [`OddsResult`]       |
//!
//! Validation is strict: any malformed token, duplicate card or
//! out-of-range number rejects the whole request.

use serde::{Deserialize, Serialize};

use crate::analysis::{count_outs, describe, strength_percentage, Outs};
use crate::card::{ensure_distinct, parse_cards, Card};
use crate::config::{EngineConfig, EquityModel};
use crate::error::{EngineError, Result};
use crate::evaluator::{evaluate_partial, Kickers};
use crate::odds::{OddsCalculator, OddsInput, OddsResult, Position};
use crate::simulation::Simulator;

pub const MIN_OPPONENTS: u32 = 1;
pub const MAX_OPPONENTS: u32 = 9;
pub const MIN_TRIALS: u32 = 1_000;
pub const MAX_TRIALS: u32 = 100_000;

// ── Requests ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandRequest {
    #[serde(alias = "hole_cards")]
    pub player_cards: Vec<String>,
    #[serde(default, alias = "board_cards")]
    pub community_cards: Vec<String>,
}

/// Field aliases allow both naming conventions:
///   - `num_players` counts the hero (2-10)
///   - `num_opponents` doesn't (1-9) and wins when both are given
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbabilityRequest {
    #[serde(alias = "hole_cards")]
    pub player_cards: Vec<String>,
    #[serde(default, alias = "board_cards")]
    pub community_cards: Vec<String>,
    #[serde(default)]
    pub num_players: Option<u32>,
    #[serde(default)]
    pub num_opponents: Option<u32>,
    #[serde(default, alias = "num_trials")]
    pub num_simulations: Option<u32>,
}

impl ProbabilityRequest {
    /// Opponent count. Defaults to heads-up.
    pub fn opponents(&self) -> u32 {
        match (self.num_opponents, self.num_players) {
            (Some(n), _) => n,
            (None, Some(players)) => players.saturating_sub(1),
            (None, None) => 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PotOddsRequest {
    pub pot_size: f64,
    pub bet_to_call: f64,
    #[serde(default, alias = "hole_cards")]
    pub player_cards: Vec<String>,
    #[serde(default, alias = "board_cards")]
    pub community_cards: Vec<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default = "default_num_players")]
    pub num_players: u32,
}

fn default_num_players() -> u32 {
    2
}

// ── Responses ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandEvaluation {
    pub hand_rank: String,
    pub hand_value: u8,
    pub kickers: Kickers,
    pub strength_percentage: f64,
    pub hand_description: String,
    pub outs: Outs,
    pub hole_cards: Vec<String>,
    pub board_cards: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityReport {
    pub win_probability: f64,
    pub tie_probability: f64,
    pub lose_probability: f64,
    pub simulations: u64,
}

// ── Engine ──────────────────────────────────────────────────────────

/// Entry point holding the immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Best hand from hole + board with description, strength and outs.
    pub fn evaluate_hand(&self, request: &HandRequest) -> Result<HandEvaluation> {
        let (hole, board) = parse_hand(&request.player_cards, &request.community_cards)?;

        let all: Vec<Card> = hole.iter().chain(&board).copied().collect();
        let hand = evaluate_partial(&all)?;

        Ok(HandEvaluation {
            hand_rank: hand.category.name().to_string(),
            hand_value: hand.primary,
            kickers: hand.kickers,
            strength_percentage: crate::odds::round_to(strength_percentage(&hand), 2),
            hand_description: describe(&hand),
            outs: count_outs(&hole, &board)?,
            hole_cards: hole.iter().map(Card::to_string).collect(),
            board_cards: board.iter().map(Card::to_string).collect(),
        })
    }

    /// Monte Carlo win / tie / lose percentages.
    pub fn calculate_probabilities(&self, request: &ProbabilityRequest) -> Result<ProbabilityReport> {
        let (hole, board) = parse_hand(&request.player_cards, &request.community_cards)?;

        let opponents = request.opponents();
        if !(MIN_OPPONENTS..=MAX_OPPONENTS).contains(&opponents) {
            return Err(EngineError::invalid(format!(
                "opponents must be between {MIN_OPPONENTS} and {MAX_OPPONENTS}, got {opponents}"
            )));
        }

        let trials = request
            .num_simulations
            .unwrap_or(self.config.simulation.default_trials);
        if !(MIN_TRIALS..=MAX_TRIALS).contains(&trials) {
            return Err(EngineError::invalid(format!(
                "num_simulations must be between {MIN_TRIALS} and {MAX_TRIALS}, got {trials}"
            )));
        }

        let outcome = Simulator::new(&self.config.simulation).estimate(
            &hole,
            &board,
            opponents as usize,
            trials,
        )?;
        let p = outcome.probabilities();

        Ok(ProbabilityReport {
            win_probability: p.win,
            tie_probability: p.tie,
            lose_probability: p.lose,
            simulations: outcome.trials(),
        })
    }

    /// Pot odds, implied odds, EV and a recommendation. Equity is 0
    /// (unknown) when no hole cards are given.
    pub fn calculate_pot_odds(&self, request: &PotOddsRequest) -> Result<OddsResult> {
        let input = OddsInput {
            pot_size: request.pot_size,
            bet_to_call: request.bet_to_call,
            position: request.position,
            num_players: request.num_players,
        };
        OddsCalculator::validate(&input)?;

        let equity = if request.player_cards.is_empty() {
            parse_cards(&request.community_cards)?;
            0.0
        } else {
            let (hole, board) = parse_hand(&request.player_cards, &request.community_cards)?;
            self.equity(&hole, &board, request.num_players)?
        };

        OddsCalculator::new(&self.config.odds).calculate(&input, equity)
    }

    fn equity(&self, hole: &[Card], board: &[Card], num_players: u32) -> Result<f64> {
        match self.config.odds.equity_model {
            EquityModel::MonteCarlo => {
                let outcome = Simulator::new(&self.config.simulation).estimate(
                    hole,
                    board,
                    num_players.saturating_sub(1) as usize,
                    self.config.simulation.default_trials,
                )?;
                Ok(outcome.probabilities().win)
            }
            EquityModel::CategoryHeuristic => {
                if hole.len() + board.len() < 5 {
                    return Ok(0.0);
                }
                let all: Vec<Card> = hole.iter().chain(board).copied().collect();
                let hand = evaluate_partial(&all)?;
                Ok(self.config.odds.heuristic_equity(hand.category, num_players))
            }
        }
    }
}

/// Parse and cross-check two hole cards plus up to five board cards.
fn parse_hand(hole_tokens: &[String], board_tokens: &[String]) -> Result<(Vec<Card>, Vec<Card>)> {
    let hole = parse_cards(hole_tokens)?;
    if hole.len() != 2 {
        return Err(EngineError::invalid(format!(
            "exactly 2 hole cards are required, got {}",
            hole.len()
        )));
    }

    let board = parse_cards(board_tokens)?;
    if board.len() > 5 {
        return Err(EngineError::invalid(format!(
            "at most 5 board cards are allowed, got {}",
            board.len()
        )));
    }

    let all: Vec<Card> = hole.iter().chain(&board).copied().collect();
    ensure_distinct(&all)?;

    Ok((hole, board))
}

// ── Default-Config Shortcuts ────────────────────────────────────────

pub fn evaluate_hand(request: &HandRequest) -> Result<HandEvaluation> {
    Engine::default().evaluate_hand(request)
}

pub fn calculate_probabilities(request: &ProbabilityRequest) -> Result<ProbabilityReport> {
    Engine::default().calculate_probabilities(request)
}

pub fn calculate_pot_odds(request: &PotOddsRequest) -> Result<OddsResult> {
    Engine::default().calculate_pot_odds(request)
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::odds::Recommendation;

    fn tokens(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    fn hand_request(hole: &[&str], board: &[&str]) -> HandRequest {
        HandRequest { player_cards: tokens(hole), community_cards: tokens(board) }
    }

    fn seeded_engine(seed: u64) -> Engine {
        Engine::new(EngineConfig {
            simulation: SimulationConfig { seed: Some(seed), ..SimulationConfig::default() },
            ..EngineConfig::default()
        })
    }

    fn pot_odds_request(hole: &[&str], board: &[&str]) -> PotOddsRequest {
        PotOddsRequest {
            pot_size: 100.0,
            bet_to_call: 20.0,
            player_cards: tokens(hole),
            community_cards: tokens(board),
            position: Position::Button,
            num_players: 3,
        }
    }

    #[test]
    fn test_evaluate_royal_flush() {
        let result = evaluate_hand(&hand_request(&["Ah", "Kh"], &["Qh", "Jh", "10h"])).unwrap();
        assert_eq!(result.hand_rank, "ROYAL_FLUSH");
        assert_eq!(result.hand_value, 14);
        assert_eq!(result.hand_description, "Royal Flush");
        assert_eq!(result.strength_percentage, 100.0);
        assert_eq!(result.hole_cards, vec!["Ah", "Kh"]);
        assert_eq!(result.board_cards, vec!["Qh", "Jh", "10h"]);
    }

    #[test]
    fn test_evaluate_aces_up() {
        let result = evaluate_hand(&hand_request(&["As", "Ks"], &["Ah", "Kh", "Qd"])).unwrap();
        assert_eq!(result.hand_rank, "TWO_PAIR");
        assert_eq!(result.hand_value, 14);
        assert_eq!(result.kickers.as_slice(), &[13]);
        assert_eq!(result.hand_description, "Two Pair, Aces and Kings");
    }

    #[test]
    fn test_evaluate_preflop() {
        let result = evaluate_hand(&hand_request(&["8h", "8d"], &[])).unwrap();
        assert_eq!(result.hand_rank, "PAIR");
        assert_eq!(result.hand_description, "Pair of 8s");
        assert_eq!(result.outs, Outs::default());
    }

    #[test]
    fn test_evaluate_rejects_bad_requests() {
        let short = evaluate_hand(&hand_request(&["Ah"], &[]));
        assert!(matches!(short, Err(EngineError::InvalidInput(_))));

        let malformed = evaluate_hand(&hand_request(&["Ah", "Kh"], &["Qh", "1h", "10h"]));
        assert_eq!(malformed, Err(EngineError::InvalidCard("1h".into())));

        let duplicate = evaluate_hand(&hand_request(&["Ah", "Kh"], &["ah", "Jh", "10h"]));
        assert!(matches!(duplicate, Err(EngineError::DuplicateCard(_))));

        let long_board = evaluate_hand(&hand_request(&["Ah", "Kh"], &["2c", "3c", "4c", "5c", "6c", "7c"]));
        assert!(long_board.is_err());
    }

    #[test]
    fn test_probabilities_from_json() {
        let request: ProbabilityRequest = serde_json::from_str(
            r#"{"player_cards": ["Ah", "Kh"], "community_cards": [], "num_players": 6, "num_simulations": 2000}"#,
        )
        .unwrap();
        assert_eq!(request.opponents(), 5);

        let report = seeded_engine(3).calculate_probabilities(&request).unwrap();
        assert_eq!(report.simulations, 2_000);
        let total = report.win_probability + report.tie_probability + report.lose_probability;
        assert!((total - 100.0).abs() <= 0.01);
        assert!(report.win_probability > 15.0 && report.win_probability < 45.0, "{report:?}");
    }

    #[test]
    fn test_probabilities_bounds() {
        let engine = seeded_engine(1);
        let mut request = ProbabilityRequest {
            player_cards: tokens(&["Ah", "Kh"]),
            num_opponents: Some(10),
            num_simulations: Some(1_000),
            ..ProbabilityRequest::default()
        };
        assert!(engine.calculate_probabilities(&request).is_err());

        request.num_opponents = Some(0);
        assert!(engine.calculate_probabilities(&request).is_err());

        request.num_opponents = Some(1);
        request.num_simulations = Some(999);
        assert!(engine.calculate_probabilities(&request).is_err());

        request.num_simulations = Some(100_001);
        assert!(engine.calculate_probabilities(&request).is_err());

        request.num_simulations = None;
        let report = engine.calculate_probabilities(&request).unwrap();
        assert_eq!(report.simulations, 10_000);
    }

    #[test]
    fn test_pot_odds_without_cards() {
        let result = calculate_pot_odds(&pot_odds_request(&[], &[])).unwrap();
        assert_eq!(result.pot_odds_percentage, 16.67);
        assert_eq!(result.break_even_equity, 16.67);
        assert_eq!(result.equity, 0.0);
        assert!(!result.is_profitable);
        assert_eq!(result.recommendation, Recommendation::InsufficientInformation);
    }

    #[test]
    fn test_pot_odds_with_nut_hand() {
        let result = seeded_engine(4)
            .calculate_pot_odds(&pot_odds_request(&["Ah", "Kh"], &["Qh", "Jh", "10h"]))
            .unwrap();
        assert_eq!(result.equity, 100.0, "royal flush can't lose or tie");
        assert!(result.is_profitable);
        assert_eq!(result.recommendation, Recommendation::StrongCall);
        // implied = 100 × 1.2 × 0.9; EV = 208 − 20
        assert_eq!(result.implied_odds, 108.0);
        assert_eq!(result.expected_value, 188.0);
    }

    #[test]
    fn test_pot_odds_heuristic_model() {
        let mut config = EngineConfig::default();
        config.odds.equity_model = EquityModel::CategoryHeuristic;
        let engine = Engine::new(config);

        let result = engine
            .calculate_pot_odds(&pot_odds_request(&["Ah", "Kh"], &["Qh", "Jh", "10h"]))
            .unwrap();
        assert_eq!(result.equity, 85.5, "95 × 0.9 for three players");

        let preflop = engine.calculate_pot_odds(&pot_odds_request(&["Ah", "Kh"], &[])).unwrap();
        assert_eq!(preflop.equity, 0.0);
    }

    #[test]
    fn test_pot_odds_rejects_bad_requests() {
        let mut request = pot_odds_request(&[], &[]);
        request.pot_size = 0.0;
        assert!(calculate_pot_odds(&request).is_err());

        let mut request = pot_odds_request(&[], &[]);
        request.bet_to_call = -1.0;
        assert!(calculate_pot_odds(&request).is_err());

        let request = pot_odds_request(&["Ah", "Kx"], &[]);
        assert_eq!(calculate_pot_odds(&request), Err(EngineError::InvalidCard("Kx".into())));

        let request = pot_odds_request(&[], &["Qh", "Zz"]);
        assert!(calculate_pot_odds(&request).is_err());
    }

    #[test]
    fn test_pot_odds_request_json_defaults() {
        let request: PotOddsRequest =
            serde_json::from_str(r#"{"pot_size": 100, "bet_to_call": 20, "position": "Button"}"#).unwrap();
        assert_eq!(request.num_players, 2);
        assert_eq!(request.position, Position::Button);
        assert!(request.player_cards.is_empty());
    }
}
