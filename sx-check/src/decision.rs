//! The function under test, as an injectable capability.

use sx_core::{BotError, Move, PlayerPerspective};

/// One observed function: a predicate (`T = bool`) or an action (`T = Move`).
pub trait DecisionFunction<T> {
    fn name(&self) -> &str;

    fn decide(
        &self,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<T, BotError>;
}

/// A named closure, e.g. `Probe::new("condition1", |p, m| bot.condition1(p, m))`.
pub struct Probe<F> {
    name: &'static str,
    f: F,
}

impl<F> Probe<F> {
    pub fn new<T>(name: &'static str, f: F) -> Self
    where
        F: Fn(&PlayerPerspective<'_>, Option<&Move>) -> Result<T, BotError>,
    {
        Self { name, f }
    }
}

impl<T, F> DecisionFunction<T> for Probe<F>
where
    F: Fn(&PlayerPerspective<'_>, Option<&Move>) -> Result<T, BotError>,
{
    fn name(&self) -> &str {
        self.name
    }

    fn decide(
        &self,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<T, BotError> {
        (self.f)(perspective, leader_move)
    }
}
