//! Assignment implementations shared by the tests.

use sx_core::{BotError, Move, PlayerPerspective};

use crate::assignment::Assignment;

fn pick_by_points(
    perspective: &PlayerPerspective<'_>,
    highest: bool,
) -> Result<Move, BotError> {
    let moves = perspective.valid_moves();
    let points = |m: &Move| m.played_card().map_or(0, |c| c.points());
    let best = if highest {
        moves.iter().copied().max_by_key(points)
    } else {
        moves.iter().copied().min_by_key(points)
    };
    best.ok_or_else(|| BotError::Failed("no valid moves".to_string()))
}

/// Simple deterministic decisions over the public perspective.
pub struct ReferenceBot;

impl Assignment for ReferenceBot {
    fn name(&self) -> &str {
        "ReferenceBot"
    }

    fn condition1(&self, p: &PlayerPerspective<'_>, _m: Option<&Move>) -> Result<bool, BotError> {
        Ok(p.am_i_leader())
    }

    fn condition2(&self, p: &PlayerPerspective<'_>, _m: Option<&Move>) -> Result<bool, BotError> {
        Ok(p.talon_size() > 0)
    }

    fn condition3(&self, p: &PlayerPerspective<'_>, _m: Option<&Move>) -> Result<bool, BotError> {
        let trump = p.trump_suit();
        Ok(p.hand().iter().any(|c| c.suit == trump))
    }

    fn action1(&self, p: &PlayerPerspective<'_>, _m: Option<&Move>) -> Result<Move, BotError> {
        p.valid_moves()
            .last()
            .copied()
            .ok_or_else(|| BotError::Failed("no valid moves".to_string()))
    }

    fn action2(&self, p: &PlayerPerspective<'_>, _m: Option<&Move>) -> Result<Move, BotError> {
        pick_by_points(p, false)
    }

    fn action3(&self, p: &PlayerPerspective<'_>, _m: Option<&Move>) -> Result<Move, BotError> {
        pick_by_points(p, true)
    }

    fn action4(&self, p: &PlayerPerspective<'_>, _m: Option<&Move>) -> Result<Move, BotError> {
        p.valid_moves()
            .first()
            .copied()
            .ok_or_else(|| BotError::Failed("no valid moves".to_string()))
    }
}

/// Agrees with [`ReferenceBot`] except for the flagged defects.
#[derive(Default)]
pub struct Variant {
    pub unimplemented_action1: bool,
    pub negated_condition3: bool,
    pub failing_action3: bool,
    pub panicking_action4: bool,
}

impl Assignment for Variant {
    fn name(&self) -> &str {
        "Variant"
    }

    fn condition1(&self, p: &PlayerPerspective<'_>, m: Option<&Move>) -> Result<bool, BotError> {
        ReferenceBot.condition1(p, m)
    }

    fn condition2(&self, p: &PlayerPerspective<'_>, m: Option<&Move>) -> Result<bool, BotError> {
        ReferenceBot.condition2(p, m)
    }

    fn condition3(&self, p: &PlayerPerspective<'_>, m: Option<&Move>) -> Result<bool, BotError> {
        let v = ReferenceBot.condition3(p, m)?;
        Ok(v != self.negated_condition3)
    }

    fn action1(&self, p: &PlayerPerspective<'_>, m: Option<&Move>) -> Result<Move, BotError> {
        if self.unimplemented_action1 {
            return Err(BotError::not_implemented("action1 has not been implemented yet"));
        }
        ReferenceBot.action1(p, m)
    }

    fn action2(&self, p: &PlayerPerspective<'_>, m: Option<&Move>) -> Result<Move, BotError> {
        ReferenceBot.action2(p, m)
    }

    fn action3(&self, p: &PlayerPerspective<'_>, m: Option<&Move>) -> Result<Move, BotError> {
        if self.failing_action3 {
            return Err(BotError::Failed("index out of range".to_string()));
        }
        ReferenceBot.action3(p, m)
    }

    fn action4(&self, p: &PlayerPerspective<'_>, m: Option<&Move>) -> Result<Move, BotError> {
        if self.panicking_action4 {
            panic!("action4 exploded");
        }
        ReferenceBot.action4(p, m)
    }
}
