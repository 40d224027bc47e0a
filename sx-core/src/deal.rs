//! Deck construction, shuffling and dealing.
//!
//! The shuffle is driven entirely by the caller's RNG, so a fixed seed reproduces the deal
//! bit-for-bit.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::card::Card;
use crate::engine::GameError;
use crate::state::{BotState, PlayerId, Talon};

/// Cards dealt to each seat.
pub const HAND_SIZE: usize = 5;

pub trait DeckGenerator {
    fn initial_deck(&self) -> Vec<Card>;
    fn shuffle(&self, deck: Vec<Card>, rng: &mut ChaCha8Rng) -> Vec<Card>;
}

pub trait HandGenerator {
    /// Split a shuffled deck into (player one, player two, talon).
    fn deal(&self, deck: Vec<Card>) -> Result<(BotState, BotState, Talon), GameError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchnapsenDeckGenerator;

impl DeckGenerator for SchnapsenDeckGenerator {
    fn initial_deck(&self) -> Vec<Card> {
        Card::deck()
    }

    fn shuffle(&self, mut deck: Vec<Card>, rng: &mut ChaCha8Rng) -> Vec<Card> {
        deck.shuffle(rng);
        deck
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchnapsenHandGenerator;

impl HandGenerator for SchnapsenHandGenerator {
    fn deal(&self, deck: Vec<Card>) -> Result<(BotState, BotState, Talon), GameError> {
        if deck.len() <= 2 * HAND_SIZE {
            return Err(GameError::InvalidState {
                msg: "deck too short to deal both hands and a trump card",
            });
        }
        let mut one = Vec::with_capacity(HAND_SIZE);
        let mut two = Vec::with_capacity(HAND_SIZE);
        for (i, &card) in deck[..2 * HAND_SIZE].iter().enumerate() {
            if i % 2 == 0 {
                one.push(card);
            } else {
                two.push(card);
            }
        }
        let talon = Talon::new(deck[2 * HAND_SIZE..].to_vec()).ok_or(GameError::InvalidState {
            msg: "talon has no trump card",
        })?;
        Ok((
            BotState::new(PlayerId::One, one),
            BotState::new(PlayerId::Two, two),
            talon,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    #[test]
    fn same_seed_same_deal() {
        let g = SchnapsenDeckGenerator;
        let a = g.shuffle(g.initial_deck(), &mut ChaCha8Rng::seed_from_u64(42));
        let b = g.shuffle(g.initial_deck(), &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
        let c = g.shuffle(g.initial_deck(), &mut ChaCha8Rng::seed_from_u64(43));
        assert_ne!(a, c);
    }

    #[test]
    fn deal_alternates_and_leaves_ten_card_talon() {
        let deck = Card::deck();
        let (one, two, talon) = SchnapsenHandGenerator.deal(deck.clone()).unwrap();
        assert_eq!(one.hand, vec![deck[0], deck[2], deck[4], deck[6], deck[8]]);
        assert_eq!(two.hand, vec![deck[1], deck[3], deck[5], deck[7], deck[9]]);
        assert_eq!(talon.size(), 10);
        assert_eq!(talon.trump_card(), Some(deck[19]));
        assert_eq!(talon.trump_suit(), deck[19].suit);
    }
}
