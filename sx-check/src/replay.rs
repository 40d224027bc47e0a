//! Replay engine: reproduce one full game from its id.

use sx_core::{
    GameError, GameOutcome, GamePlayEngine, Lineup, Move, MoveRequester, PlayerId,
    SimpleMoveRequester,
};
use sx_transcript::GameId;

use crate::seed::{deal_rng, scripted_bot};

/// Play `game_id` from the initial deal to the declared winner.
///
/// A fresh engine and deal RNG are built per call. Every decision goes through `requester`.
pub fn replay_game<R: MoveRequester>(
    game_id: GameId,
    requester: R,
    lineup: &mut Lineup<'_>,
) -> Result<GameOutcome, GameError> {
    let mut engine = GamePlayEngine::schnapsen(requester);
    let mut rng = deal_rng(game_id);
    engine.play_game(lineup, &mut rng)
}

/// Moves made when the scripted player of `game_id` sits in both seats.
pub fn decision_trace(game_id: GameId) -> Result<Vec<(PlayerId, Move)>, GameError> {
    let mut bot = scripted_bot(game_id);
    let outcome = replay_game(game_id, SimpleMoveRequester, &mut Lineup::Mirror(&mut bot))?;
    Ok(outcome.history)
}
