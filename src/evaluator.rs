//! Pot Logic Engine — Hand Evaluator
//!
//! Ranks the best 5-card hand out of 5-7 cards using rank counts and
//! per-suit rank bitmasks. No lookup tables, no allocation per call.
//!
//! ## Priority Cascade (first match wins)
//!
//! | Step | Category         | primary_value     | kickers              |
//! |------|------------------|-------------------|----------------------|
//! | 1    | Royal / Str. Fl. | straight high     | -                    |
//! | 2    | Four of a Kind   | quad rank         | -                    |
//! | 3    | Full House       | trips rank        | [pair rank]          |
//! | 4    | Flush            | top flush card    | next 4 flush cards   |
//! | 5    | Straight         | straight high     | -                    |
//! | 6    | Three of a Kind  | trips rank        | -                    |
//! | 7    | Two Pair         | top pair          | [second pair]        |
//! | 8    | Pair             | pair rank         | -                    |
//! | 9    | High Card        | top card          | next 4 cards         |
//!
//! The wheel (A-2-3-4-5) is a 5-high straight.

use std::cmp::Ordering;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize, Serializer};

use crate::card::{Card, Rank};
use crate::error::{EngineError, Result};

bitflags! {
    /// Set of ranks present, bit `i` = `Rank::ALL[i]`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RankMask: u16 {
        const TWO   = 1 << 0;
        const THREE = 1 << 1;
        const FOUR  = 1 << 2;
        const FIVE  = 1 << 3;
        const SIX   = 1 << 4;
        const SEVEN = 1 << 5;
        const EIGHT = 1 << 6;
        const NINE  = 1 << 7;
        const TEN   = 1 << 8;
        const JACK  = 1 << 9;
        const QUEEN = 1 << 10;
        const KING  = 1 << 11;
        const ACE   = 1 << 12;
    }
}

impl RankMask {
    #[inline]
    pub fn of(rank: Rank) -> Self {
        Self::from_bits_retain(1 << rank.index())
    }

    /// Values present, highest first.
    pub fn values_desc(self) -> impl Iterator<Item = u8> {
        Rank::ALL
            .into_iter()
            .rev()
            .filter(move |&r| self.contains(RankMask::of(r)))
            .map(Rank::value)
    }
}

// Straight masks with their high card, best first. The wheel is last.
const STRAIGHTS: [(u16, u8); 10] = [
    (0b1_1111_0000_0000, 14), // A-K-Q-J-T
    (0b0_1111_1000_0000, 13), // K-Q-J-T-9
    (0b0_0111_1100_0000, 12), // Q-J-T-9-8
    (0b0_0011_1110_0000, 11), // J-T-9-8-7
    (0b0_0001_1111_0000, 10), // T-9-8-7-6
    (0b0_0000_1111_1000, 9),  // 9-8-7-6-5
    (0b0_0000_0111_1100, 8),  // 8-7-6-5-4
    (0b0_0000_0011_1110, 7),  // 7-6-5-4-3
    (0b0_0000_0001_1111, 6),  // 6-5-4-3-2
    (0b1_0000_0000_1111, 5),  // 5-4-3-2-A (wheel)
];

/// High card of the best straight contained in `mask`, if any.
#[inline]
pub fn straight_high(mask: RankMask) -> Option<u8> {
    STRAIGHTS
        .iter()
        .find(|&&(bits, _)| mask.contains(RankMask::from_bits_retain(bits)))
        .map(|&(_, high)| high)
}

/// Hand categories, low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandCategory {
    HighCard = 1,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl HandCategory {
    pub const ALL: [HandCategory; 10] = [
        HandCategory::HighCard,
        HandCategory::Pair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
        HandCategory::RoyalFlush,
    ];

    /// Wire name, e.g. `ROYAL_FLUSH`.
    pub fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "HIGH_CARD",
            HandCategory::Pair => "PAIR",
            HandCategory::TwoPair => "TWO_PAIR",
            HandCategory::ThreeOfAKind => "THREE_OF_A_KIND",
            HandCategory::Straight => "STRAIGHT",
            HandCategory::Flush => "FLUSH",
            HandCategory::FullHouse => "FULL_HOUSE",
            HandCategory::FourOfAKind => "FOUR_OF_A_KIND",
            HandCategory::StraightFlush => "STRAIGHT_FLUSH",
            HandCategory::RoyalFlush => "ROYAL_FLUSH",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Up to four tie-break values, highest first. Unused slots are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kickers {
    values: [u8; 4],
    len: u8,
}

impl Kickers {
    pub fn from_values(values: impl IntoIterator<Item = u8>) -> Self {
        let mut k = Kickers::default();
        for v in values.into_iter().take(4) {
            k.values[k.len as usize] = v;
            k.len += 1;
        }
        k
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values[..self.len as usize]
    }

    pub fn first(&self) -> Option<u8> {
        self.as_slice().first().copied()
    }
}

impl Serialize for Kickers {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

/// Result of evaluating a card set.
///
/// Field order is the comparison order: category, then primary value, then
/// kickers element-wise. Equal on all three is a genuine tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EvaluatedHand {
    pub category: HandCategory,
    #[serde(rename = "primary_value")]
    pub primary: u8,
    pub kickers: Kickers,
}

impl EvaluatedHand {
    fn new(category: HandCategory, primary: u8, kickers: Kickers) -> Self {
        Self { category, primary, kickers }
    }

    fn simple(category: HandCategory, primary: u8) -> Self {
        Self::new(category, primary, Kickers::default())
    }

    /// Total order used to settle showdowns.
    #[inline]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

// ── Entry Points ────────────────────────────────────────────────────

/// Evaluate the best 5-card hand from 5-7 cards.
pub fn evaluate(cards: &[Card]) -> Result<EvaluatedHand> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EngineError::invalid(format!(
            "hand evaluation needs 5 to 7 cards, got {}",
            cards.len()
        )));
    }
    Ok(evaluate_unchecked(cards))
}

/// Run the same cascade over 1-7 cards. With fewer than 5 cards no straight
/// or flush can form, so only made-rank hands are reported.
pub fn evaluate_partial(cards: &[Card]) -> Result<EvaluatedHand> {
    if cards.is_empty() || cards.len() > 7 {
        return Err(EngineError::invalid(format!(
            "hand evaluation needs 1 to 7 cards, got {}",
            cards.len()
        )));
    }
    Ok(evaluate_unchecked(cards))
}

/// Hot-path evaluation. Callers guarantee 5-7 distinct cards.
#[inline]
pub fn evaluate_unchecked(cards: &[Card]) -> EvaluatedHand {
    debug_assert!(!cards.is_empty() && cards.len() <= 7);

    let mut rank_counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    let mut suit_masks = [RankMask::empty(); 4];
    let mut all = RankMask::empty();

    for card in cards {
        let bit = RankMask::of(card.rank);
        rank_counts[card.value() as usize] += 1;
        suit_counts[card.suit.index()] += 1;
        suit_masks[card.suit.index()] |= bit;
        all |= bit;
    }

    // At most one suit can hold 5+ of 7 cards.
    let flush_suit = (0..4).find(|&s| suit_counts[s] >= 5);

    // Step 1: straight flush / royal
    if let Some(s) = flush_suit {
        if let Some(high) = straight_high(suit_masks[s]) {
            return if high == 14 {
                EvaluatedHand::simple(HandCategory::RoyalFlush, 14)
            } else {
                EvaluatedHand::simple(HandCategory::StraightFlush, high)
            };
        }
    }

    // Highest value with at least `n` copies, skipping `except`.
    let highest_with = |n: u8, except: u8| -> Option<u8> {
        (2..=14u8).rev().find(|&v| v != except && rank_counts[v as usize] >= n)
    };

    // Step 2: four of a kind
    if let Some(quad) = highest_with(4, 0) {
        return EvaluatedHand::simple(HandCategory::FourOfAKind, quad);
    }

    // Step 3: full house
    let trips = highest_with(3, 0);
    if let Some(t) = trips {
        if let Some(pair) = highest_with(2, t) {
            return EvaluatedHand::new(HandCategory::FullHouse, t, Kickers::from_values([pair]));
        }
    }

    // Step 4: flush
    if let Some(s) = flush_suit {
        let mut values = suit_masks[s].values_desc();
        let top = values.next().unwrap_or(0);
        return EvaluatedHand::new(HandCategory::Flush, top, Kickers::from_values(values));
    }

    // Step 5: straight
    if let Some(high) = straight_high(all) {
        return EvaluatedHand::simple(HandCategory::Straight, high);
    }

    // Step 6: three of a kind
    if let Some(t) = trips {
        return EvaluatedHand::simple(HandCategory::ThreeOfAKind, t);
    }

    // Steps 7-8: two pair, pair
    if let Some(hi) = highest_with(2, 0) {
        return match highest_with(2, hi) {
            Some(lo) => EvaluatedHand::new(HandCategory::TwoPair, hi, Kickers::from_values([lo])),
            None => EvaluatedHand::simple(HandCategory::Pair, hi),
        };
    }

    // Step 9: high card. No pairs here, so the rank mask lists every card.
    let mut values = all.values_desc();
    let top = values.next().unwrap_or(0);
    EvaluatedHand::new(HandCategory::HighCard, top, Kickers::from_values(values))
}

// ── Tests ───────────────────────────────────────────────────────────
