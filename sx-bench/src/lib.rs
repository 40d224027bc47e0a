//! Shared fixtures for the sx benchmarks.

use sx_check::{record_bundle, CheckError};
use sx_student::StudentBot;
use sx_transcript::{GameId, TranscriptBundle};

/// Deterministic spread of game ids.
pub fn game_ids(n: usize) -> Vec<GameId> {
    let mut x: u64 = 0xA5A5_A5A5_0123_4567;
    (0..n)
        .map(|_| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            x >> 16
        })
        .collect()
}

/// Bundle recorded from the student bot over `n` games.
pub fn student_bundle(n: usize) -> Result<TranscriptBundle, CheckError> {
    record_bundle(&StudentBot, &game_ids(n))
}
