//! What one seat is allowed to see at a decision point.

use crate::card::{Card, Suit};
use crate::moves::Move;
use crate::state::{BotState, GamePhase, GameState, PlayerId, Score};

/// Read-only view of a [`GameState`] from the POV of the seat being asked for a move.
#[derive(Debug, Clone)]
pub struct PlayerPerspective<'a> {
    state: &'a GameState,
    me: PlayerId,
    valid_moves: Vec<Move>,
}

impl<'a> PlayerPerspective<'a> {
    pub fn new(state: &'a GameState, me: PlayerId, valid_moves: Vec<Move>) -> Self {
        Self {
            state,
            me,
            valid_moves,
        }
    }

    fn own(&self) -> &BotState {
        self.state.seat(self.me)
    }

    fn opponent(&self) -> &BotState {
        self.state.seat(self.me.other())
    }

    pub fn player(&self) -> PlayerId {
        self.me
    }

    pub fn am_i_leader(&self) -> bool {
        self.state.leader.player == self.me
    }

    pub fn hand(&self) -> &[Card] {
        &self.own().hand
    }

    pub fn trump_suit(&self) -> Suit {
        self.state.trump_suit()
    }

    /// Face-up trump card; `None` once the talon is exhausted.
    pub fn trump_card(&self) -> Option<Card> {
        self.state.talon.trump_card()
    }

    pub fn won_cards(&self) -> &[Card] {
        &self.own().won_cards
    }

    pub fn opponent_won_cards(&self) -> &[Card] {
        &self.opponent().won_cards
    }

    /// Opponent hand cards this seat can know about.
    ///
    /// In phase two every remaining card is deducible, so the whole hand is returned.
    pub fn known_cards_of_opponent_hand(&self) -> Vec<Card> {
        let opponent = self.opponent();
        match self.phase() {
            GamePhase::Two => opponent.hand.clone(),
            GamePhase::One => opponent
                .hand
                .iter()
                .copied()
                .filter(|c| opponent.revealed.contains(c))
                .collect(),
        }
    }

    pub fn talon_size(&self) -> usize {
        self.state.talon.size()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn my_score(&self) -> Score {
        self.own().score
    }

    pub fn opponent_score(&self) -> Score {
        self.opponent().score
    }

    pub fn tricks_played(&self) -> u32 {
        self.state.tricks_played
    }

    /// Legal moves at this decision point, in hand order.
    pub fn valid_moves(&self) -> &[Move] {
        &self.valid_moves
    }
}
