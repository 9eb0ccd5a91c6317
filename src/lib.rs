//! Pot Logic Engine — Crate Root
//!
//! Poker decision support: rank hands, estimate equity by simulation, and
//! turn equity into pot-odds / EV recommendations.
//!
//! ## Architecture
//!
//! ```text
//! Web layer (Node.js via N-API, or any Rust caller)
//!     │
//!     ▼
//! api.rs  ────────────────────────  evaluate_hand / calculate_probabilities / calculate_pot_odds
//!     ├── odds.rs                  pot odds, implied odds, EV, recommendation
//!     ├── simulation.rs            Monte Carlo equity (rayon fan-out)
//!     │     └── evaluator.rs       best 5 of 5-7 cards, total order
//!     │           └── card.rs      cards, parsing, deck with exclusions
//!     ├── analysis.rs              description, strength %, outs
//!     └── config.rs                immutable tables and tuning
//! ```
//!
//! ## Example
//!
//! ```
//! use potlogic_engine::{evaluate_hand, HandRequest};
//!
//! let request = HandRequest {
//!     player_cards: vec!["Ah".into(), "Kh".into()],
//!     community_cards: vec!["Qh".into(), "Jh".into(), "10h".into()],
//! };
//! let result = evaluate_hand(&request).unwrap();
//! assert_eq!(result.hand_rank, "ROYAL_FLUSH");
//! ```

pub mod analysis;
pub mod api;
pub mod card;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod odds;
pub mod simulation;

#[cfg(feature = "node")]
mod node;

pub use api::{
    calculate_pot_odds, calculate_probabilities, evaluate_hand, Engine, HandEvaluation,
    HandRequest, PotOddsRequest, ProbabilityReport, ProbabilityRequest,
};
pub use card::{parse_cards, Card, Deck, Rank, Suit};
pub use config::{EngineConfig, EquityModel, OddsConfig, SimulationConfig};
pub use error::{EngineError, Result};
pub use evaluator::{evaluate, EvaluatedHand, HandCategory};
pub use odds::{OddsCalculator, OddsInput, OddsResult, Position, Recommendation};
pub use simulation::{Probabilities, SimulationOutcome, Simulator};

/// Install the logger (honours `RUST_LOG`). Safe to call more than once.
pub fn init() {
    env_logger::try_init().ok();
    log::info!("Pot Logic engine v{} ready", env!("CARGO_PKG_VERSION"));
}

/// Engine version string.
pub fn version() -> String {
    format!("potlogic-engine v{}", env!("CARGO_PKG_VERSION"))
}
