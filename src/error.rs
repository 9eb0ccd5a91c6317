//! Pot Logic Engine — Errors
//!
//! Every failure in the engine is deterministic: the same inputs always fail
//! the same way, so nothing here is retried.

use thiserror::Error;

use crate::card::Card;

/// Errors surfaced to callers of the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A card token that is not `<rank><suit>` with a known rank and suit.
    #[error("invalid card token {0:?}")]
    InvalidCard(String),

    /// The same card was supplied twice across hole and board cards.
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),

    /// Out-of-range counts or monetary fields.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The deck cannot supply the board completion plus opponent hands.
    #[error("deck exhausted: simulation needs {needed} cards but only {available} remain")]
    SimulationExhaustion { needed: usize, available: usize },
}

impl EngineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        log::debug!("rejecting request: {msg}");
        EngineError::InvalidInput(msg)
    }

    /// True for the whole input-validation class (bad tokens, duplicates, ranges).
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, EngineError::SimulationExhaustion { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
