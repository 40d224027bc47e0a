//! Cards of the 20-card Schnapsen deck.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of cards in a Schnapsen deck.
pub const DECK_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Suit {
    Hearts,
    Clubs,
    Spades,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Clubs, Suit::Spades, Suit::Diamonds];

    pub fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "HEARTS",
            Suit::Clubs => "CLUBS",
            Suit::Spades => "SPADES",
            Suit::Diamonds => "DIAMONDS",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ranks in deck order (highest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Ace,
    Ten,
    King,
    Queen,
    Jack,
}

impl Rank {
    pub const ALL: [Rank; 5] = [Rank::Ace, Rank::Ten, Rank::King, Rank::Queen, Rank::Jack];

    /// Trick points carried by a card of this rank.
    pub fn points(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Ten => 10,
            Rank::King => 4,
            Rank::Queen => 3,
            Rank::Jack => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rank::Ace => "ACE",
            Rank::Ten => "TEN",
            Rank::King => "KING",
            Rank::Queen => "QUEEN",
            Rank::Jack => "JACK",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn points(self) -> u32 {
        self.rank.points()
    }

    /// The full deck in canonical (unshuffled) order: suit-major, ranks high to low.
    pub fn deck() -> Vec<Card> {
        let mut out = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                out.push(Card::new(rank, suit));
            }
        }
        out
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.rank, self.suit)
    }
}

/// Render a card list as `[ACE_SPADES, TEN_HEARTS]`.
pub fn fmt_cards(cards: &[Card]) -> String {
    let names: Vec<String> = cards.iter().map(ToString::to_string).collect();
    format!("[{}]", names.join(", "))
}
