//! Trick resolution and game scoring.

use crate::card::{Card, Suit};
use crate::moves::Move;
use crate::state::{GameState, PlayerId};

/// Direct points needed to win a game.
pub const POINTS_TO_WIN: u32 = 66;

/// Which side of a trick took it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrickSide {
    Leader,
    Follower,
}

pub trait TrickScorer {
    /// Side winning a trick where `led` was led and `answer` followed.
    fn trick_winner(&self, led: Card, answer: Card, trump: Suit) -> TrickSide;

    /// Points awarded for declaring `mv` (zero for non-marriages).
    fn marriage_points(&self, mv: &Move, trump: Suit) -> u32;

    /// Winner and game points if the game is over, else `None`.
    fn declare_winner(&self, state: &GameState) -> Option<(PlayerId, u32)>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchnapsenTrickScorer;

impl SchnapsenTrickScorer {
    /// Game points for the winner, graded on the loser's direct points.
    pub fn game_points(loser_direct_points: u32) -> u32 {
        if loser_direct_points == 0 {
            3
        } else if loser_direct_points < 33 {
            2
        } else {
            1
        }
    }
}

impl TrickScorer for SchnapsenTrickScorer {
    fn trick_winner(&self, led: Card, answer: Card, trump: Suit) -> TrickSide {
        if answer.suit == led.suit {
            if answer.points() > led.points() {
                TrickSide::Follower
            } else {
                TrickSide::Leader
            }
        } else if answer.suit == trump {
            TrickSide::Follower
        } else {
            TrickSide::Leader
        }
    }

    fn marriage_points(&self, mv: &Move, trump: Suit) -> u32 {
        match mv {
            Move::Marriage { queen, .. } if queen.suit == trump => 40,
            Move::Marriage { .. } => 20,
            _ => 0,
        }
    }

    fn declare_winner(&self, state: &GameState) -> Option<(PlayerId, u32)> {
        let leader = &state.leader;
        let follower = &state.follower;
        if leader.score.direct_points >= POINTS_TO_WIN {
            return Some((
                leader.player,
                Self::game_points(follower.score.direct_points),
            ));
        }
        if follower.score.direct_points >= POINTS_TO_WIN {
            return Some((
                follower.player,
                Self::game_points(leader.score.direct_points),
            ));
        }
        if state.all_cards_played() {
            // Last trick winner leads and takes the game.
            return Some((leader.player, 1));
        }
        None
    }
}
