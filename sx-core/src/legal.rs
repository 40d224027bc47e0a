//! Move legality.

use crate::card::{Card, Rank};
use crate::moves::Move;
use crate::state::{GamePhase, GameState};

/// Source of truth for which moves a seat may make.
pub trait MoveValidator {
    /// Legal leader moves, in hand order: regular plays, then marriages, then trump exchange.
    fn legal_leader_moves(&self, state: &GameState) -> Vec<Move>;

    /// Legal follower responses to `leader_move`.
    fn legal_follower_moves(&self, state: &GameState, leader_move: &Move) -> Vec<Move>;

    fn is_legal_leader_move(&self, state: &GameState, mv: &Move) -> bool {
        self.legal_leader_moves(state).contains(mv)
    }

    fn is_legal_follower_move(&self, state: &GameState, leader_move: &Move, mv: &Move) -> bool {
        self.legal_follower_moves(state, leader_move).contains(mv)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchnapsenMoveValidator;

impl MoveValidator for SchnapsenMoveValidator {
    fn legal_leader_moves(&self, state: &GameState) -> Vec<Move> {
        let hand = &state.leader.hand;
        let mut out: Vec<Move> = hand.iter().map(|&c| Move::regular(c)).collect();

        for &queen in hand.iter().filter(|c| c.rank == Rank::Queen) {
            let king = Card::new(Rank::King, queen.suit);
            if hand.contains(&king) {
                out.push(Move::marriage(queen, king));
            }
        }

        if state.phase() == GamePhase::One {
            let jack = Card::new(Rank::Jack, state.trump_suit());
            if hand.contains(&jack) {
                out.push(Move::trump_exchange(jack));
            }
        }
        out
    }

    fn legal_follower_moves(&self, state: &GameState, leader_move: &Move) -> Vec<Move> {
        let hand = &state.follower.hand;
        let all = || hand.iter().map(|&c| Move::regular(c)).collect::<Vec<_>>();

        let led = match leader_move.played_card() {
            Some(c) => c,
            None => return all(),
        };
        if state.phase() == GamePhase::One {
            return all();
        }

        let same_suit: Vec<Card> = hand.iter().copied().filter(|c| c.suit == led.suit).collect();
        let beating: Vec<Card> = same_suit
            .iter()
            .copied()
            .filter(|c| c.points() > led.points())
            .collect();
        if !beating.is_empty() {
            return beating.into_iter().map(Move::regular).collect();
        }
        if !same_suit.is_empty() {
            return same_suit.into_iter().map(Move::regular).collect();
        }

        let trump = state.trump_suit();
        let trumps: Vec<Move> = hand
            .iter()
            .copied()
            .filter(|c| c.suit == trump)
            .map(Move::regular)
            .collect();
        if !trumps.is_empty() {
            return trumps;
        }
        all()
    }
}
