//! Move representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank};

/// A single decision made by a seat.
///
/// Equality is structural: two marriages are equal iff they name the same queen and king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Move {
    /// Play one card to the trick.
    Regular { card: Card },
    /// Declare a queen/king pair of one suit and play the queen.
    Marriage { queen: Card, king: Card },
    /// Swap the trump jack in hand for the face-up trump card (leader only, phase one).
    TrumpExchange { jack: Card },
}

impl Move {
    pub fn regular(card: Card) -> Self {
        Move::Regular { card }
    }

    pub fn marriage(queen: Card, king: Card) -> Self {
        debug_assert_eq!(queen.rank, Rank::Queen);
        debug_assert_eq!(king.rank, Rank::King);
        Move::Marriage { queen, king }
    }

    pub fn trump_exchange(jack: Card) -> Self {
        debug_assert_eq!(jack.rank, Rank::Jack);
        Move::TrumpExchange { jack }
    }

    pub fn is_regular_move(&self) -> bool {
        matches!(self, Move::Regular { .. })
    }

    pub fn is_marriage(&self) -> bool {
        matches!(self, Move::Marriage { .. })
    }

    pub fn is_trump_exchange(&self) -> bool {
        matches!(self, Move::TrumpExchange { .. })
    }

    /// The card put on the table by this move, if any.
    ///
    /// A marriage plays its queen; a trump exchange plays nothing.
    pub fn played_card(&self) -> Option<Card> {
        match *self {
            Move::Regular { card } => Some(card),
            Move::Marriage { queen, .. } => Some(queen),
            Move::TrumpExchange { .. } => None,
        }
    }

    /// Every card this move names.
    pub fn cards(&self) -> Vec<Card> {
        match *self {
            Move::Regular { card } => vec![card],
            Move::Marriage { queen, king } => vec![queen, king],
            Move::TrumpExchange { jack } => vec![jack],
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Regular { card } => write!(f, "RegularMove({card})"),
            Move::Marriage { queen, king } => write!(f, "Marriage({queen}, {king})"),
            Move::TrumpExchange { jack } => write!(f, "TrumpExchange({jack})"),
        }
    }
}

/// Render a move list as `[RegularMove(ACE_SPADES), ...]`.
pub fn fmt_moves(moves: &[Move]) -> String {
    let names: Vec<String> = moves.iter().map(ToString::to_string).collect();
    format!("[{}]", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    #[test]
    fn marriage_plays_its_queen() {
        let q = Card::new(Rank::Queen, Suit::Clubs);
        let k = Card::new(Rank::King, Suit::Clubs);
        let m = Move::marriage(q, k);
        assert_eq!(m.played_card(), Some(q));
        assert_eq!(m.cards(), vec![q, k]);
        assert!(!m.is_regular_move());
        assert_eq!(m.to_string(), "Marriage(QUEEN_CLUBS, KING_CLUBS)");
    }

    #[test]
    fn serde_uses_type_tag() {
        let m = Move::trump_exchange(Card::new(Rank::Jack, Suit::Spades));
        let s = serde_json::to_string(&m).unwrap();
        assert_eq!(
            s,
            r#"{"type":"trump_exchange","jack":{"rank":"JACK","suit":"SPADES"}}"#
        );
        let back: Move = serde_json::from_str(&s).unwrap();
        assert_eq!(back, m);
    }
}
