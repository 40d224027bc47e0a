//! The interface a student implements.

use sx_core::{Bot, BotError, Move, PlayerPerspective};

/// Three predicates and four actions wired into a fixed decision tree by [`assignment_move`].
///
/// Every method starts out unimplemented; the checker reports the `NotImplemented` message
/// verbatim for methods that were never filled in.
pub trait Assignment {
    fn name(&self) -> &str {
        "AssignmentBot"
    }

    fn condition1(
        &self,
        _perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<bool, BotError> {
        Err(BotError::not_implemented("condition1 has not been implemented yet"))
    }

    fn condition2(
        &self,
        _perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<bool, BotError> {
        Err(BotError::not_implemented("condition2 has not been implemented yet"))
    }

    fn condition3(
        &self,
        _perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<bool, BotError> {
        Err(BotError::not_implemented("condition3 has not been implemented yet"))
    }

    fn action1(
        &self,
        _perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        Err(BotError::not_implemented("action1 has not been implemented yet"))
    }

    fn action2(
        &self,
        _perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        Err(BotError::not_implemented("action2 has not been implemented yet"))
    }

    fn action3(
        &self,
        _perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        Err(BotError::not_implemented("action3 has not been implemented yet"))
    }

    fn action4(
        &self,
        _perspective: &PlayerPerspective<'_>,
        _leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        Err(BotError::not_implemented("action4 has not been implemented yet"))
    }
}

/// The fixed decision tree:
///
/// ```text
/// if condition1          -> action1
/// elif condition2
///     if condition3      -> action2
///     else               -> action3
/// else                   -> action4
/// ```
pub fn assignment_move<A: Assignment + ?Sized>(
    bot: &A,
    perspective: &PlayerPerspective<'_>,
    leader_move: Option<&Move>,
) -> Result<Move, BotError> {
    if bot.condition1(perspective, leader_move)? {
        bot.action1(perspective, leader_move)
    } else if bot.condition2(perspective, leader_move)? {
        if bot.condition3(perspective, leader_move)? {
            bot.action2(perspective, leader_move)
        } else {
            bot.action3(perspective, leader_move)
        }
    } else {
        bot.action4(perspective, leader_move)
    }
}

/// Seats an [`Assignment`] at the table.
pub struct AssignmentBot<'a, A: ?Sized>(pub &'a A);

impl<A: Assignment + ?Sized> Bot for AssignmentBot<'_, A> {
    fn get_move(
        &mut self,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<Move, BotError> {
        assignment_move(self.0, perspective, leader_move)
    }
}
