//! Serializable capture of a decision point, attached to error records.

use std::fmt;

use serde::{Deserialize, Serialize};
use sx_core::card::fmt_cards;
use sx_core::moves::fmt_moves;
use sx_core::{Card, GamePhase, Move, PlayerId, PlayerPerspective, Suit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveSnapshot {
    pub player: PlayerId,
    pub hand: Vec<Card>,
    pub phase: GamePhase,
    pub leader_move: Option<Move>,
    pub trump_suit: Suit,
    pub valid_moves: Vec<Move>,
    pub won_cards: Vec<Card>,
    pub opponent_won_cards: Vec<Card>,
    pub known_opponent_cards: Vec<Card>,
    pub talon_size: usize,
}

impl PerspectiveSnapshot {
    pub fn capture(perspective: &PlayerPerspective<'_>, leader_move: Option<&Move>) -> Self {
        Self {
            player: perspective.player(),
            hand: perspective.hand().to_vec(),
            phase: perspective.phase(),
            leader_move: leader_move.copied(),
            trump_suit: perspective.trump_suit(),
            valid_moves: perspective.valid_moves().to_vec(),
            won_cards: perspective.won_cards().to_vec(),
            opponent_won_cards: perspective.opponent_won_cards().to_vec(),
            known_opponent_cards: perspective.known_cards_of_opponent_hand(),
            talon_size: perspective.talon_size(),
        }
    }
}

impl fmt::Display for PerspectiveSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leader_move = match &self.leader_move {
            Some(m) => m.to_string(),
            None => "None".to_string(),
        };
        writeln!(f, "Perspective[")?;
        writeln!(f, "hand={},", fmt_cards(&self.hand))?;
        writeln!(
            f,
            "phase={}, leader_move={}, trump_suit={}, talon_size={},",
            self.phase, leader_move, self.trump_suit, self.talon_size
        )?;
        writeln!(f, "valid_moves={},", fmt_moves(&self.valid_moves))?;
        writeln!(f, "won_cards={},", fmt_cards(&self.won_cards))?;
        writeln!(f, "won_cards_opponent={},", fmt_cards(&self.opponent_won_cards))?;
        write!(
            f,
            "known_opponent_cards={}]",
            fmt_cards(&self.known_opponent_cards)
        )
    }
}
