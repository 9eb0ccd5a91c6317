//! Pot Logic Engine — Hand Reading
//!
//! Human-facing readouts layered over the evaluator: a description
//! ("Full House, Aces over Kings"), a rough strength percentage, and the
//! drawing outs on the flop and turn.

use serde::Serialize;

use crate::card::{Card, Suit};
use crate::evaluator::{evaluate_partial, straight_high, EvaluatedHand, HandCategory, RankMask};
use crate::error::Result;

/// Base strength per category, before the primary-value bump.
const fn base_strength(category: HandCategory) -> f64 {
    match category {
        HandCategory::RoyalFlush => 100.0,
        HandCategory::StraightFlush => 95.0,
        HandCategory::FourOfAKind => 90.0,
        HandCategory::FullHouse => 85.0,
        HandCategory::Flush => 80.0,
        HandCategory::Straight => 75.0,
        HandCategory::ThreeOfAKind => 70.0,
        HandCategory::TwoPair => 65.0,
        HandCategory::Pair => 60.0,
        HandCategory::HighCard => 50.0,
    }
}

fn value_name(value: u8) -> String {
    match value {
        11 => "Jack".into(),
        12 => "Queen".into(),
        13 => "King".into(),
        14 => "Ace".into(),
        v => v.to_string(),
    }
}

/// Strength on a 0-100 scale: category base plus half a point per rank
/// above deuce, capped at 100.
pub fn strength_percentage(hand: &EvaluatedHand) -> f64 {
    let bump = (hand.primary.saturating_sub(2)) as f64 * 0.5;
    (base_strength(hand.category) + bump).min(100.0)
}

pub fn describe(hand: &EvaluatedHand) -> String {
    let v = value_name(hand.primary);
    let second = || hand.kickers.first().map(value_name).unwrap_or_default();

    match hand.category {
        HandCategory::RoyalFlush => "Royal Flush".into(),
        HandCategory::StraightFlush => format!("{v}-high Straight Flush"),
        HandCategory::FourOfAKind => format!("Four {v}s"),
        HandCategory::FullHouse => format!("Full House, {v}s over {}s", second()),
        HandCategory::Flush => format!("{v}-high Flush"),
        HandCategory::Straight => format!("{v}-high Straight"),
        HandCategory::ThreeOfAKind => format!("Three {v}s"),
        HandCategory::TwoPair => format!("Two Pair, {v}s and {}s", second()),
        HandCategory::Pair => format!("Pair of {v}s"),
        HandCategory::HighCard => format!("{v} High"),
    }
}

/// Unseen cards that improve the hand, by draw type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Outs {
    pub straight_draw: u32,
    pub flush_draw: u32,
    pub overcards: u32,
    pub gutshot: u32,
    pub open_ended: u32,
}

/// Count outs with one or two cards to come (3-4 board cards).
/// Other streets have nothing to draw to and report zeros.
pub fn count_outs(hole: &[Card], board: &[Card]) -> Result<Outs> {
    let mut outs = Outs::default();
    if !(3..=4).contains(&board.len()) {
        return Ok(outs);
    }

    let known: Vec<Card> = hole.iter().chain(board).copied().collect();
    let current = evaluate_partial(&known)?;

    let mut mask = RankMask::empty();
    let mut suit_counts = [0u32; 4];
    for card in &known {
        mask |= RankMask::of(card.rank);
        suit_counts[card.suit.index()] += 1;
    }

    if current.category < HandCategory::Flush {
        outs.flush_draw = Suit::ALL
            .iter()
            .filter(|s| suit_counts[s.index()] == 4)
            .map(|s| 13 - suit_counts[s.index()])
            .sum();
    }

    if current.category < HandCategory::Straight {
        // Ranks absent from the known cards that would complete a straight;
        // all four of each are unseen.
        let completing = crate::card::Rank::ALL
            .iter()
            .filter(|&&r| !mask.contains(RankMask::of(r)))
            .filter(|&&r| straight_high(mask | RankMask::of(r)).is_some())
            .count() as u32;

        outs.straight_draw = completing * 4;
        match completing {
            0 => {}
            1 => outs.gutshot = outs.straight_draw,
            _ => outs.open_ended = outs.straight_draw,
        }
    }

    if current.category == HandCategory::HighCard {
        let board_high = board.iter().map(|c| c.value()).max().unwrap_or(0);
        outs.overcards = hole.iter().filter(|c| c.value() > board_high).count() as u32 * 3;
    }

    Ok(outs)
}
