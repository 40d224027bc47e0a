//! sx-core: Schnapsen rules, state representation, perspectives and decision sources.

pub mod bots;
pub mod card;
pub mod deal;
pub mod engine;
pub mod legal;
pub mod moves;
pub mod perspective;
pub mod scoring;
pub mod state;

pub use bots::{Bot, BotError, RandBot};
pub use card::{Card, Rank, Suit, DECK_SIZE};
pub use deal::{DeckGenerator, HandGenerator, SchnapsenDeckGenerator, SchnapsenHandGenerator};
pub use engine::{
    GameError, GameOutcome, GamePlayEngine, Lineup, MoveRequester, SimpleMoveRequester,
};
pub use legal::{MoveValidator, SchnapsenMoveValidator};
pub use moves::Move;
pub use perspective::PlayerPerspective;
pub use scoring::{SchnapsenTrickScorer, TrickScorer};
pub use state::{BotState, GamePhase, GameState, PlayerId, Score, Talon};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod legal_tests;
