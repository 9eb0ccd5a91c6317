//! Pot Logic Engine — Monte Carlo Equity
//!
//! Estimates win / tie / loss probabilities for two hole cards against
//! random opponents by completing the board and dealing opponent hands from
//! the unseen cards, many times over.
//!
//! ## Parallelism
//!
//! Trials are independent. They are split into batches of
//! `SimulationConfig::batch_size`; each batch runs on the rayon pool with its
//! own deck copy and its own Xoshiro256++ stream, keeps local counters, and
//! the counters are summed once at the end.
//!
//! With the default 10,000 trials and 9 opponents that is up to 100,000
//! seven-card evaluations per call.

use std::time::Instant;

use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::Serialize;

use crate::card::{ensure_distinct, Card, Deck};
use crate::config::SimulationConfig;
use crate::error::{EngineError, Result};
use crate::evaluator::evaluate_unchecked;
use crate::odds::round_to;

const BOARD_SIZE: usize = 5;
const HOLE_SIZE: usize = 2;

/// Aggregate counts over completed trials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationOutcome {
    pub wins: u64,
    pub ties: u64,
    pub losses: u64,
}

impl SimulationOutcome {
    pub fn trials(&self) -> u64 {
        self.wins + self.ties + self.losses
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            wins: self.wins + other.wins,
            ties: self.ties + other.ties,
            losses: self.losses + other.losses,
        }
    }

    /// Percentages rounded to 2 places. `lose` absorbs the rounding so the
    /// three always add up to 100.
    pub fn probabilities(&self) -> Probabilities {
        let n = self.trials();
        if n == 0 {
            return Probabilities::default();
        }
        let win = round_to(self.wins as f64 / n as f64 * 100.0, 2);
        let tie = round_to(self.ties as f64 / n as f64 * 100.0, 2);
        Probabilities {
            win,
            tie,
            lose: round_to(100.0 - win - tie, 2),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Probabilities {
    pub win: f64,
    pub tie: f64,
    pub lose: f64,
}

/// Monte Carlo equity estimator.
#[derive(Debug, Clone)]
pub struct Simulator {
    batch_size: u32,
    seed: Option<u64>,
}

impl Simulator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            seed: config.seed,
        }
    }

    /// Play `num_trials` random showdowns of `hole` against `num_opponents`.
    ///
    /// `board` holds the known community cards (0-5). Fails with
    /// `SimulationExhaustion` when the unseen cards can't cover the board
    /// completion plus two cards per opponent.
    pub fn estimate(
        &self,
        hole: &[Card],
        board: &[Card],
        num_opponents: usize,
        num_trials: u32,
    ) -> Result<SimulationOutcome> {
        if hole.len() != HOLE_SIZE {
            return Err(EngineError::invalid(format!(
                "simulation needs exactly {HOLE_SIZE} hole cards, got {}",
                hole.len()
            )));
        }
        if board.len() > BOARD_SIZE {
            return Err(EngineError::invalid(format!(
                "board holds at most {BOARD_SIZE} cards, got {}",
                board.len()
            )));
        }
        if num_opponents == 0 {
            return Err(EngineError::invalid("simulation needs at least one opponent"));
        }
        if num_trials == 0 {
            return Err(EngineError::invalid("simulation needs at least one trial"));
        }

        let known: Vec<Card> = hole.iter().chain(board).copied().collect();
        ensure_distinct(&known)?;

        let deck = Deck::excluding(&known).into_cards();
        let board_needed = BOARD_SIZE - board.len();
        let needed = board_needed + HOLE_SIZE * num_opponents;
        if deck.len() < needed {
            return Err(EngineError::SimulationExhaustion {
                needed,
                available: deck.len(),
            });
        }

        let base_seed = self.seed.unwrap_or_else(random);
        let batch_size = self.batch_size;
        let batches = num_trials.div_ceil(batch_size);
        let setup = TrialSetup { hole, board, num_opponents };
        let started = Instant::now();

        let outcome = (0..batches)
            .into_par_iter()
            .map(|batch| {
                let trials = batch_size.min(num_trials - batch * batch_size);
                let rng = Xoshiro256PlusPlus::seed_from_u64(base_seed.wrapping_add(batch as u64));
                let tally = run_batch(&setup, Dealer::new(deck.clone(), needed, rng), trials);
                log::trace!("batch {batch}: {trials} trials -> {tally:?}");
                tally
            })
            .reduce(SimulationOutcome::default, SimulationOutcome::merge);

        log::debug!(
            "simulated {} trials vs {} opponents in {} batches ({:.1?})",
            outcome.trials(),
            num_opponents,
            batches,
            started.elapsed()
        );

        Ok(outcome)
    }
}

// ── Trial Loop ──────────────────────────────────────────────────────

struct TrialSetup<'a> {
    hole: &'a [Card],
    board: &'a [Card],
    num_opponents: usize,
}

/// Draws without replacement: each deal is a partial Fisher-Yates shuffle
/// of the first `needed` slots, so every deal is a uniform sample of the
/// unseen cards regardless of what earlier deals left behind.
struct Dealer<R: Rng> {
    deck: Vec<Card>,
    needed: usize,
    rng: R,
}

impl<R: Rng> Dealer<R> {
    fn new(deck: Vec<Card>, needed: usize, rng: R) -> Self {
        debug_assert!(needed <= deck.len());
        Self { deck, needed, rng }
    }

    fn deal(&mut self) -> &[Card] {
        let len = self.deck.len();
        for k in 0..self.needed {
            let swap_idx = self.rng.gen_range(k..len);
            self.deck.swap(k, swap_idx);
        }
        &self.deck[..self.needed]
    }
}

fn run_batch<R: Rng>(setup: &TrialSetup<'_>, mut dealer: Dealer<R>, trials: u32) -> SimulationOutcome {
    let known_board = setup.board.len();
    let board_needed = BOARD_SIZE - known_board;

    // [hole0, hole1, board0..board4]; the board tail is refilled per trial.
    let mut seven = [setup.hole[0]; 7];
    seven[..HOLE_SIZE].copy_from_slice(setup.hole);
    seven[HOLE_SIZE..HOLE_SIZE + known_board].copy_from_slice(setup.board);

    let mut tally = SimulationOutcome::default();

    for _ in 0..trials {
        let dealt = dealer.deal();
        seven[HOLE_SIZE + known_board..].copy_from_slice(&dealt[..board_needed]);
        let hero = evaluate_unchecked(&seven);

        let mut villain = seven;
        let mut beaten = false;
        let mut tied = false;

        for hand in dealt[board_needed..].chunks_exact(HOLE_SIZE).take(setup.num_opponents) {
            villain[..HOLE_SIZE].copy_from_slice(hand);
            let rank = evaluate_unchecked(&villain);

            if rank > hero {
                beaten = true;
                break;
            } else if rank == hero {
                tied = true;
            }
        }

        if beaten {
            tally.losses += 1;
        } else if tied {
            tally.ties += 1;
        } else {
            tally.wins += 1;
        }
    }

    tally
}

// ── Tests ───────────────────────────────────────────────────────────
