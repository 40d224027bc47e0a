//! Decision sources.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use thiserror::Error;

use crate::moves::Move;
use crate::perspective::PlayerPerspective;

/// Failure raised by a decision source instead of producing a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BotError {
    /// The decision logic has not been written yet. The message is shown to the user as-is.
    #[error("{0}")]
    NotImplemented(String),
    #[error("{0}")]
    Failed(String),
}

impl BotError {
    pub fn not_implemented(what: impl Into<String>) -> Self {
        BotError::NotImplemented(what.into())
    }
}

/// A seat's decision procedure.
pub trait Bot {
    fn get_move(
        &mut self,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<Move, BotError>;
}

/// Seeded scripted player: picks uniformly among the valid moves.
///
/// Two `RandBot`s built from the same seed make identical choices on identical input.
#[derive(Debug, Clone)]
pub struct RandBot {
    rng: ChaCha8Rng,
}

impl RandBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Bot for RandBot {
    fn get_move(
        &mut self,
        perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        let moves = perspective.valid_moves();
        if moves.is_empty() {
            return Err(BotError::Failed("no valid moves to choose from".to_string()));
        }
        let pick = self.rng.gen_range(0..moves.len());
        Ok(moves[pick])
    }
}
