//! Suit order, lowest to highest: spades, hearts, clubs, diamonds.

use std::collections::HashMap;

use sx_check::Assignment;
use sx_core::{BotError, Card, Move, PlayerPerspective, Rank, Suit};

pub fn suit_order(suit: Suit) -> u8 {
    match suit {
        Suit::Spades => 1,
        Suit::Hearts => 2,
        Suit::Clubs => 3,
        Suit::Diamonds => 4,
    }
}

fn first_valid(perspective: &PlayerPerspective<'_>) -> Result<Move, BotError> {
    perspective
        .valid_moves()
        .first()
        .copied()
        .ok_or_else(|| BotError::Failed("no valid moves".to_string()))
}

fn regular_cards(perspective: &PlayerPerspective<'_>) -> Vec<Card> {
    perspective
        .valid_moves()
        .iter()
        .filter_map(|m| match *m {
            Move::Regular { card } => Some(card),
            _ => None,
        })
        .collect()
}

fn trump_pair(perspective: &PlayerPerspective<'_>) -> Option<(Card, Card)> {
    let trump = perspective.trump_suit();
    let hand = perspective.hand();
    let queen = Card::new(Rank::Queen, trump);
    let king = Card::new(Rank::King, trump);
    (hand.contains(&queen) && hand.contains(&king)).then_some((queen, king))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StudentBot;

impl Assignment for StudentBot {
    fn name(&self) -> &str {
        "StudentBot"
    }

    /// A royal marriage can be declared: leading, with the trump queen and king in hand.
    fn condition1(
        &self,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<bool, BotError> {
        Ok(leader_move.is_none() && trump_pair(perspective).is_some())
    }

    /// Neither player has won the ace of spades yet.
    fn condition2(
        &self,
        perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<bool, BotError> {
        let ace = Card::new(Rank::Ace, Suit::Spades);
        Ok(!perspective.won_cards().contains(&ace)
            && !perspective.opponent_won_cards().contains(&ace))
    }

    /// Phase two, and the opponent holds at least as many clubs as diamonds.
    fn condition3(
        &self,
        perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<bool, BotError> {
        if perspective.talon_size() != 0 {
            return Ok(false);
        }
        let known = perspective.known_cards_of_opponent_hand();
        let count = |suit: Suit| known.iter().filter(|c| c.suit == suit).count();
        Ok(count(Suit::Clubs) >= count(Suit::Diamonds))
    }

    fn action1(
        &self,
        perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        match trump_pair(perspective) {
            Some((queen, king)) => Ok(Move::marriage(queen, king)),
            None => first_valid(perspective),
        }
    }

    /// Lowest suit, then lowest points.
    fn action2(
        &self,
        perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        match regular_cards(perspective)
            .into_iter()
            .min_by_key(|c| (suit_order(c.suit), c.points()))
        {
            Some(card) => Ok(Move::regular(card)),
            None => first_valid(perspective),
        }
    }

    /// Most frequent rank among the playable cards, then highest points, then highest suit.
    fn action3(
        &self,
        perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        let cards = regular_cards(perspective);
        let mut frequency: HashMap<Rank, usize> = HashMap::new();
        for card in &cards {
            *frequency.entry(card.rank).or_insert(0) += 1;
        }
        let freq = |c: &Card| frequency.get(&c.rank).copied().unwrap_or(0);
        match cards
            .into_iter()
            .max_by_key(|c| (freq(c), c.points(), suit_order(c.suit)))
        {
            Some(card) => Ok(Move::regular(card)),
            None => first_valid(perspective),
        }
    }

    /// Median card by (points, suit); the lower one when the count is even.
    fn action4(
        &self,
        perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        let mut cards = regular_cards(perspective);
        if cards.is_empty() {
            return first_valid(perspective);
        }
        cards.sort_by_key(|c| (c.points(), suit_order(c.suit)));
        Ok(Move::regular(cards[(cards.len() - 1) / 2]))
    }
}
