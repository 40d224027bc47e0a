//! Canonical game state: seats, scores, talon and phase.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::{Card, Suit};

/// Seat identity. `One` leads the first trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::One => f.write_str("player one"),
            PlayerId::Two => f.write_str("player two"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Talon still has cards; following is free.
    One,
    /// Talon exhausted; follow-suit rules apply.
    Two,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::One => f.write_str("ONE"),
            GamePhase::Two => f.write_str("TWO"),
        }
    }
}

/// Points won by a seat.
///
/// Marriage points stay pending until the seat has won at least one trick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub direct_points: u32,
    pub pending_points: u32,
}

impl Score {
    pub fn redeem_pending_points(self) -> Score {
        Score {
            direct_points: self.direct_points + self.pending_points,
            pending_points: 0,
        }
    }
}

/// Per-seat state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotState {
    pub player: PlayerId,
    pub hand: Vec<Card>,
    pub won_cards: Vec<Card>,
    pub score: Score,
    /// Hand cards the opponent has seen (marriage partners, exchanged trump card).
    pub revealed: Vec<Card>,
}

impl BotState {
    pub fn new(player: PlayerId, hand: Vec<Card>) -> Self {
        Self {
            player,
            hand,
            won_cards: Vec::new(),
            score: Score::default(),
            revealed: Vec::new(),
        }
    }

    pub fn holds(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    /// Remove `card` from the hand. Returns false if it was not held.
    pub fn remove_from_hand(&mut self, card: Card) -> bool {
        match self.hand.iter().position(|&c| c == card) {
            Some(i) => {
                self.hand.remove(i);
                self.revealed.retain(|&c| c != card);
                true
            }
            None => false,
        }
    }

    pub fn reveal(&mut self, card: Card) {
        if !self.revealed.contains(&card) {
            self.revealed.push(card);
        }
    }
}

/// Undealt cards. Index 0 is the top; the last card is the face-up trump card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Talon {
    cards: Vec<Card>,
    trump_suit: Suit,
}

impl Talon {
    /// A talon whose last card is the trump card; `None` if `cards` is empty.
    pub fn new(cards: Vec<Card>) -> Option<Self> {
        let trump_suit = cards.last()?.suit;
        Some(Self { cards, trump_suit })
    }

    /// A talon with no cards left (phase two).
    pub fn exhausted(trump_suit: Suit) -> Self {
        Self {
            cards: Vec::new(),
            trump_suit,
        }
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn trump_suit(&self) -> Suit {
        self.trump_suit
    }

    /// The face-up trump card, while the talon is not exhausted.
    pub fn trump_card(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn draw(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    /// Replace the face-up trump card with `jack`, returning the old trump card.
    pub fn exchange_trump(&mut self, jack: Card) -> Option<Card> {
        let last = self.cards.last_mut()?;
        Some(std::mem::replace(last, jack))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// Full state between decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub leader: BotState,
    pub follower: BotState,
    pub talon: Talon,
    pub tricks_played: u32,
}

impl GameState {
    pub fn trump_suit(&self) -> Suit {
        self.talon.trump_suit()
    }

    pub fn phase(&self) -> GamePhase {
        if self.talon.is_empty() {
            GamePhase::Two
        } else {
            GamePhase::One
        }
    }

    pub fn all_cards_played(&self) -> bool {
        self.leader.hand.is_empty() && self.follower.hand.is_empty() && self.talon.is_empty()
    }

    pub fn seat(&self, player: PlayerId) -> &BotState {
        if self.leader.player == player {
            &self.leader
        } else {
            &self.follower
        }
    }

    /// Make the trick winner the next leader.
    pub fn set_leader(&mut self, player: PlayerId) {
        if self.leader.player != player {
            std::mem::swap(&mut self.leader, &mut self.follower);
        }
    }
}
