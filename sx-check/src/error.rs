use sx_core::GameError;
use sx_transcript::{GameId, TranscriptError};
use thiserror::Error;

use crate::unit::Unit;

/// Conditions that abort a whole assessment.
///
/// Per-decision-point divergences are never errors; they become
/// [`ErrorRecord`](crate::ErrorRecord)s.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("transcript bundle: {0}")]
    Transcript(#[from] TranscriptError),
    #[error("malformed {unit} transcript #{index} (game {game_id}): {reason}")]
    MalformedTranscript {
        unit: Unit,
        index: usize,
        game_id: GameId,
        reason: String,
    },
    #[error("replay of game {game_id} for {unit} failed: {source}")]
    Replay {
        unit: Unit,
        game_id: GameId,
        #[source]
        source: GameError,
    },
    #[error("reference implementation failed on {unit} in game {game_id}: {reason}")]
    Reference {
        unit: Unit,
        game_id: GameId,
        reason: String,
    },
}
