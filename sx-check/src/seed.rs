//! Seeds derived from a game id.
//!
//! A replay is defined by its game id alone: the deal uses `deal_seed(id)` and the scripted
//! players use `scripted_seed(id)`. Both are pure functions; every replay builds fresh RNGs
//! from them, so nothing carries over between transcripts or units.

use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use sx_core::RandBot;
use sx_transcript::GameId;

/// Offset separating scripted-player streams from deal streams.
pub const SCRIPTED_SEED_OFFSET: u64 = 12_345_678_910;

pub fn deal_seed(game_id: GameId) -> u64 {
    game_id
}

pub fn scripted_seed(game_id: GameId) -> u64 {
    SCRIPTED_SEED_OFFSET.wrapping_add(game_id)
}

/// Fresh shuffle source for `game_id`.
pub fn deal_rng(game_id: GameId) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(deal_seed(game_id))
}

/// Fresh scripted player for `game_id`.
pub fn scripted_bot(game_id: GameId) -> RandBot {
    RandBot::new(scripted_seed(game_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn seeds_are_pure() {
        assert_eq!(deal_seed(17), deal_seed(17));
        assert_eq!(scripted_seed(17), SCRIPTED_SEED_OFFSET + 17);
        assert_ne!(deal_seed(17), scripted_seed(17));
    }

    #[test]
    fn fresh_rngs_restart_the_stream() {
        let a: u64 = deal_rng(5).gen();
        let b: u64 = deal_rng(5).gen();
        assert_eq!(a, b);
    }
}
