//! Game play engine: the single place that advances a `GameState` through tricks.
//!
//! Deck building, dealing, legality and scoring are injected strategies; every decision is
//! routed through a [`MoveRequester`], which is the hook instrumentation plugs into.

use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::bots::{Bot, BotError};
use crate::deal::{DeckGenerator, HandGenerator, SchnapsenDeckGenerator, SchnapsenHandGenerator};
use crate::legal::{MoveValidator, SchnapsenMoveValidator};
use crate::moves::Move;
use crate::perspective::PlayerPerspective;
use crate::scoring::{SchnapsenTrickScorer, TrickScorer, TrickSide};
use crate::state::{GameState, PlayerId};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("{player} made an illegal move: {mv}")]
    IllegalMove { player: PlayerId, mv: Move },
    #[error("bot of {player} failed: {source}")]
    Bot {
        player: PlayerId,
        #[source]
        source: BotError,
    },
    #[error("game aborted by move requester: {0}")]
    Aborted(String),
    #[error("invalid state: {msg}")]
    InvalidState { msg: &'static str },
}

/// Result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: PlayerId,
    pub game_points: u32,
    pub tricks_played: u32,
    /// Every move made, in order, including trump exchanges.
    pub history: Vec<(PlayerId, Move)>,
}

/// Which bot sits in which seat.
pub enum Lineup<'a> {
    /// One bot (and one RNG stream) answers for both seats.
    Mirror(&'a mut dyn Bot),
    /// Distinct bots for player one and player two.
    Pair(&'a mut dyn Bot, &'a mut dyn Bot),
}

impl<'a> Lineup<'a> {
    pub fn seat(&mut self, player: PlayerId) -> &mut (dyn Bot + 'a) {
        match self {
            Lineup::Mirror(bot) => &mut **bot,
            Lineup::Pair(one, two) => match player {
                PlayerId::One => &mut **one,
                PlayerId::Two => &mut **two,
            },
        }
    }
}

/// Hook that obtains a move from a seat's bot.
pub trait MoveRequester {
    fn get_move(
        &mut self,
        bot: &mut dyn Bot,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<Move, GameError>;
}

impl<R: MoveRequester + ?Sized> MoveRequester for &mut R {
    fn get_move(
        &mut self,
        bot: &mut dyn Bot,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<Move, GameError> {
        (**self).get_move(bot, perspective, leader_move)
    }
}

/// Asks the bot and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMoveRequester;

impl MoveRequester for SimpleMoveRequester {
    fn get_move(
        &mut self,
        bot: &mut dyn Bot,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<Move, GameError> {
        bot.get_move(perspective, leader_move)
            .map_err(|source| GameError::Bot {
                player: perspective.player(),
                source,
            })
    }
}

pub struct GamePlayEngine<R> {
    pub deck_generator: Box<dyn DeckGenerator>,
    pub hand_generator: Box<dyn HandGenerator>,
    pub move_validator: Box<dyn MoveValidator>,
    pub trick_scorer: Box<dyn TrickScorer>,
    pub move_requester: R,
}

impl<R: MoveRequester> GamePlayEngine<R> {
    /// Engine wired with the standard Schnapsen collaborators.
    pub fn schnapsen(move_requester: R) -> Self {
        Self {
            deck_generator: Box::new(SchnapsenDeckGenerator),
            hand_generator: Box::new(SchnapsenHandGenerator),
            move_validator: Box::new(SchnapsenMoveValidator),
            trick_scorer: Box::new(SchnapsenTrickScorer),
            move_requester,
        }
    }

    pub fn into_requester(self) -> R {
        self.move_requester
    }

    /// Shuffle with `rng`, deal, and play until a winner is declared.
    pub fn play_game(
        &mut self,
        lineup: &mut Lineup<'_>,
        rng: &mut ChaCha8Rng,
    ) -> Result<GameOutcome, GameError> {
        let deck = self.deck_generator.initial_deck();
        let shuffled = self.deck_generator.shuffle(deck, rng);
        let (leader, follower, talon) = self.hand_generator.deal(shuffled)?;
        let state = GameState {
            leader,
            follower,
            talon,
            tricks_played: 0,
        };
        self.play_game_from_state(state, lineup)
    }

    pub fn play_game_from_state(
        &mut self,
        mut state: GameState,
        lineup: &mut Lineup<'_>,
    ) -> Result<GameOutcome, GameError> {
        let mut history = Vec::new();
        loop {
            if state.leader.hand.is_empty() {
                return Err(GameError::InvalidState {
                    msg: "leader has no cards but no winner was declared",
                });
            }
            self.play_trick(&mut state, lineup, &mut history)?;
            if let Some((winner, game_points)) = self.trick_scorer.declare_winner(&state) {
                return Ok(GameOutcome {
                    winner,
                    game_points,
                    tricks_played: state.tricks_played,
                    history,
                });
            }
        }
    }

    fn request(
        &mut self,
        state: &GameState,
        player: PlayerId,
        valid_moves: Vec<Move>,
        leader_move: Option<&Move>,
        lineup: &mut Lineup<'_>,
    ) -> Result<Move, GameError> {
        let perspective = PlayerPerspective::new(state, player, valid_moves);
        let mv = self
            .move_requester
            .get_move(lineup.seat(player), &perspective, leader_move)?;
        if !perspective.valid_moves().contains(&mv) {
            return Err(GameError::IllegalMove { player, mv });
        }
        Ok(mv)
    }

    fn play_trick(
        &mut self,
        state: &mut GameState,
        lineup: &mut Lineup<'_>,
        history: &mut Vec<(PlayerId, Move)>,
    ) -> Result<(), GameError> {
        let trump = state.trump_suit();
        let leader_id = state.leader.player;
        let follower_id = state.follower.player;

        // A trump exchange does not end the leader's turn: apply it and ask again.
        let leader_move = loop {
            let valid = self.move_validator.legal_leader_moves(state);
            let mv = self.request(state, leader_id, valid, None, lineup)?;
            history.push((leader_id, mv));
            match mv {
                Move::TrumpExchange { jack } => {
                    let taken = state.talon.exchange_trump(jack).ok_or(GameError::InvalidState {
                        msg: "trump exchange with an empty talon",
                    })?;
                    state.leader.remove_from_hand(jack);
                    state.leader.hand.push(taken);
                    state.leader.reveal(taken);
                }
                _ => break mv,
            }
        };

        if let Move::Marriage { king, .. } = leader_move {
            state.leader.score.pending_points += self.trick_scorer.marriage_points(&leader_move, trump);
            state.leader.reveal(king);
        }
        let led = leader_move.played_card().ok_or(GameError::InvalidState {
            msg: "leader move plays no card",
        })?;
        state.leader.remove_from_hand(led);

        let valid = self.move_validator.legal_follower_moves(state, &leader_move);
        let answer_move = self.request(state, follower_id, valid, Some(&leader_move), lineup)?;
        history.push((follower_id, answer_move));
        let answer = answer_move.played_card().ok_or(GameError::InvalidState {
            msg: "follower move plays no card",
        })?;
        state.follower.remove_from_hand(answer);

        let winner_id = match self.trick_scorer.trick_winner(led, answer, trump) {
            TrickSide::Leader => leader_id,
            TrickSide::Follower => follower_id,
        };
        state.set_leader(winner_id);
        state.leader.won_cards.push(led);
        state.leader.won_cards.push(answer);
        state.leader.score.direct_points += led.points() + answer.points();
        for seat in [&mut state.leader, &mut state.follower] {
            if !seat.won_cards.is_empty() {
                seat.score = seat.score.redeem_pending_points();
            }
        }

        // Winner draws first; the face-up trump card is always the last card drawn.
        if let Some(card) = state.talon.draw() {
            state.leader.hand.push(card);
            if let Some(card) = state.talon.draw() {
                state.follower.hand.push(card);
            }
        }
        state.tricks_played += 1;
        Ok(())
    }
}
