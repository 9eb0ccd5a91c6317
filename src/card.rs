//! Pot Logic Engine — Card Model
//!
//! ## Card Encoding
//!
//! Each card has a dense ID 0-51:
//!   - `rank = id >> 2`  (0=2, 1=3, ..., 12=A)
//!   - `suit = id & 3`   (0=♣, 1=♦, 2=♥, 3=♠)
//!
//! ## Wire Format
//!
//! A rank token (`2`-`10`, `J`, `Q`, `K`, `A`) followed by a one-letter suit
//! (`h`, `d`, `c`, `s`), case-insensitive: `"Ah"`, `"10s"`, `"qD"`.
//! Parsing is strict. A single bad token rejects the whole list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value 2-14, Ace high.
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Position in `ALL` (0=2 ... 12=A).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize - 2
    }

    pub fn from_value(value: u8) -> Option<Rank> {
        match value {
            2..=14 => Some(Rank::ALL[value as usize - 2]),
            _ => None,
        }
    }

    fn token(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    fn from_token(token: &str) -> Option<Rank> {
        let rank = match token.to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return None,
        };
        Some(rank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Suit {
    Clubs = 0,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        };
        write!(f, "{c}")
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An immutable playing card.
///
/// Equality is rank and suit. Rank comparisons go through [`Card::value`],
/// suits never break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Numeric value 2-14, Ace high.
    #[inline]
    pub const fn value(self) -> u8 {
        self.rank.value()
    }

    /// Dense ID 0-51.
    #[inline]
    pub const fn id(self) -> usize {
        (self.rank.index() << 2) | self.suit.index()
    }

    pub fn from_id(id: usize) -> Option<Card> {
        if id >= DECK_SIZE {
            return None;
        }
        Some(Card::new(Rank::ALL[id >> 2], Suit::ALL[id & 3]))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidCard(s.to_string());

        let (split, suit_char) = s.char_indices().last().ok_or_else(invalid)?;
        let suit = Suit::from_char(suit_char).ok_or_else(invalid)?;
        let rank = Rank::from_token(&s[..split]).ok_or_else(invalid)?;

        Ok(Card::new(rank, suit))
    }
}

impl TryFrom<String> for Card {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// Parse a list of wire tokens. Fails on the first malformed token.
pub fn parse_cards<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Card>> {
    tokens.iter().map(|t| t.as_ref().parse()).collect()
}

/// Reject card sets that mention the same card twice.
pub fn ensure_distinct(cards: &[Card]) -> Result<()> {
    let mut seen = [false; DECK_SIZE];
    for &card in cards {
        if std::mem::replace(&mut seen[card.id()], true) {
            return Err(EngineError::DuplicateCard(card));
        }
    }
    Ok(())
}

/// The 52-card deck minus an exclusion set, in ascending ID order.
///
/// Built fresh per call. Sampling shuffles a copy, so the stored order never
/// biases what gets drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn full() -> Self {
        Self::excluding(&[])
    }

    pub fn excluding(excluded: &[Card]) -> Self {
        let mut used = [false; DECK_SIZE];
        for &c in excluded {
            used[c.id()] = true;
        }

        let cards = (0..DECK_SIZE)
            .filter(|&id| !used[id])
            .filter_map(Card::from_id)
            .collect();

        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!(card("Ah"), Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!(card("10s"), Card::new(Rank::Ten, Suit::Spades));
        assert_eq!(card("AS"), Card::new(Rank::Ace, Suit::Spades));
        assert_eq!(card("jd"), Card::new(Rank::Jack, Suit::Diamonds));
        assert_eq!(card("2c"), Card::new(Rank::Two, Suit::Clubs));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "A", "h", "1h", "11h", "Tx", "Th", "Ax", "10", "A h", "Ah ", "♥A"] {
            assert!(
                matches!(bad.parse::<Card>(), Err(EngineError::InvalidCard(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_cards_rejects_whole_list() {
        let err = parse_cards(&["Ah", "Kh", "Zz"]).unwrap_err();
        assert_eq!(err, EngineError::InvalidCard("Zz".into()));

        let cards = parse_cards(&["Ah", "10h"]).unwrap();
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn test_display_round_trips_wire_token() {
        for id in 0..DECK_SIZE {
            let c = Card::from_id(id).unwrap();
            assert_eq!(c.to_string().parse::<Card>().unwrap(), c);
            assert_eq!(c.id(), id);
        }
        assert!(Card::from_id(52).is_none());
    }

    #[test]
    fn test_values() {
        assert_eq!(card("Ah").value(), 14);
        assert_eq!(card("Kd").value(), 13);
        assert_eq!(card("10c").value(), 10);
        assert_eq!(card("2s").value(), 2);
    }

    #[test]
    fn test_deck_exclusion() {
        let excluded = [card("Ah"), card("Kh"), card("2c")];
        let deck = Deck::excluding(&excluded);
        assert_eq!(deck.len(), 49);
        for c in excluded {
            assert!(!deck.contains(c));
        }

        let mut ids: Vec<usize> = deck.cards().iter().map(|c| c.id()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 49, "no card may appear twice");

        assert_eq!(Deck::full().len(), DECK_SIZE);
    }

    #[test]
    fn test_ensure_distinct() {
        assert!(ensure_distinct(&[card("Ah"), card("Ad")]).is_ok());
        assert_eq!(
            ensure_distinct(&[card("Ah"), card("Kd"), card("AH")]),
            Err(EngineError::DuplicateCard(card("Ah")))
        );
    }

    #[test]
    fn test_serde_uses_wire_token() {
        let json = serde_json::to_string(&card("10d")).unwrap();
        assert_eq!(json, "\"10d\"");
        let back: Card = serde_json::from_str("\"qs\"").unwrap();
        assert_eq!(back, card("Qs"));
        assert!(serde_json::from_str::<Card>("\"1s\"").is_err());
    }
}
