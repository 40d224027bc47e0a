//! Recording: produce a transcript bundle from a reference implementation.
//!
//! The replays are the same ones the driver performs, so a bundle recorded from a bot is
//! reproduced exactly when that bot is assessed against it.

use std::slice;

use sx_core::{Bot, BotError, GameError, Lineup, Move, MoveRequester, PlayerPerspective};
use sx_core::SimpleMoveRequester;
use sx_transcript::{
    ActionTranscript, ConditionTranscript, GameId, IntegrationTranscript, Transcript,
    TranscriptBundle,
};

use crate::assignment::{Assignment, AssignmentBot};
use crate::decision::{DecisionFunction, Probe};
use crate::driver::STUDENT_SEAT;
use crate::error::CheckError;
use crate::instrument::invoke_contained;
use crate::replay::replay_game;
use crate::seed::scripted_bot;
use crate::unit::Unit;

/// Evaluates the reference function where gated and keeps every outcome.
struct RecordingRequester<'a, T, F: ?Sized> {
    function: &'a F,
    gate: Option<slice::Iter<'a, bool>>,
    outcomes: Vec<T>,
    failure: Option<String>,
}

impl<'a, T, F> RecordingRequester<'a, T, F>
where
    F: DecisionFunction<T> + ?Sized,
{
    fn new(function: &'a F, gate: Option<&'a [bool]>) -> Self {
        Self {
            function,
            gate: gate.map(|g| g.iter()),
            outcomes: Vec::new(),
            failure: None,
        }
    }

    fn fail(&mut self, reason: String) -> GameError {
        let err = GameError::Aborted(reason.clone());
        self.failure = Some(reason);
        err
    }
}

impl<T, F> MoveRequester for RecordingRequester<'_, T, F>
where
    F: DecisionFunction<T> + ?Sized,
{
    fn get_move(
        &mut self,
        bot: &mut dyn Bot,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<Move, GameError> {
        let gated = match self.gate.as_mut() {
            None => true,
            Some(it) => match it.next() {
                Some(&g) => g,
                None => return Err(self.fail("gating sequence ran out".to_string())),
            },
        };
        if gated {
            let function = self.function;
            match invoke_contained(|| function.decide(perspective, leader_move)) {
                Ok(value) => self.outcomes.push(value),
                Err(fault) => {
                    return Err(self.fail(format!("{} failed: {fault}", function.name())))
                }
            }
        }
        SimpleMoveRequester.get_move(bot, perspective, leader_move)
    }
}

fn record<T, F>(
    unit: Unit,
    game_id: GameId,
    function: &F,
    gate: Option<&[bool]>,
) -> Result<Transcript<T>, CheckError>
where
    F: DecisionFunction<T> + ?Sized,
{
    let mut recorder = RecordingRequester::new(function, gate);
    let mut scripted = scripted_bot(game_id);
    if let Err(source) = replay_game(game_id, &mut recorder, &mut Lineup::Mirror(&mut scripted)) {
        return Err(match recorder.failure.take() {
            Some(reason) => CheckError::Reference {
                unit,
                game_id,
                reason,
            },
            None => CheckError::Replay {
                unit,
                game_id,
                source,
            },
        });
    }
    Ok(Transcript::new(game_id, recorder.outcomes))
}

fn record_integration<A: Assignment + ?Sized>(
    reference: &A,
    game_id: GameId,
) -> Result<IntegrationTranscript, CheckError> {
    let unit = Unit::Integration;
    let mut student = AssignmentBot(reference);
    let mut scripted = scripted_bot(game_id);
    let outcome = replay_game(
        game_id,
        SimpleMoveRequester,
        &mut Lineup::Pair(&mut student, &mut scripted),
    )
    .map_err(|e| match e {
        GameError::Bot { player, source } if player == STUDENT_SEAT => CheckError::Reference {
            unit,
            game_id,
            reason: reason_of(&source),
        },
        source => CheckError::Replay {
            unit,
            game_id,
            source,
        },
    })?;
    let moves = outcome
        .history
        .into_iter()
        .filter(|(player, _)| *player == STUDENT_SEAT)
        .map(|(_, mv)| mv)
        .collect();
    Ok(Transcript::new(game_id, moves))
}

fn reason_of(err: &BotError) -> String {
    match err {
        BotError::NotImplemented(m) => format!("not implemented: {m}"),
        BotError::Failed(m) => m.clone(),
    }
}

/// Replay every id in `game_ids` and record what `reference` decides.
///
/// Action 1 is recorded only where condition 1 held in the same game. The integration
/// transcripts hold the reference bot's own moves from player one's seat.
pub fn record_bundle<A: Assignment + ?Sized>(
    reference: &A,
    game_ids: &[GameId],
) -> Result<TranscriptBundle, CheckError> {
    let condition1 = Probe::new("condition1", |p, m| reference.condition1(p, m));
    let condition2 = Probe::new("condition2", |p, m| reference.condition2(p, m));
    let condition3 = Probe::new("condition3", |p, m| reference.condition3(p, m));
    let action1 = Probe::new("action1", |p, m| reference.action1(p, m));
    let action2 = Probe::new("action2", |p, m| reference.action2(p, m));
    let action3 = Probe::new("action3", |p, m| reference.action3(p, m));
    let action4 = Probe::new("action4", |p, m| reference.action4(p, m));

    let mut conditions: [Vec<ConditionTranscript>; 3] = Default::default();
    let mut actions: [Vec<ActionTranscript>; 4] = Default::default();
    let mut integration = Vec::with_capacity(game_ids.len());

    for &game_id in game_ids {
        let c1: ConditionTranscript = record(Unit::Condition(1), game_id, &condition1, None)?;
        let a1 = record(Unit::Action(1), game_id, &action1, Some(c1.outcomes.as_slice()))?;
        conditions[0].push(c1);
        actions[0].push(a1);
        conditions[1].push(record(Unit::Condition(2), game_id, &condition2, None)?);
        conditions[2].push(record(Unit::Condition(3), game_id, &condition3, None)?);
        actions[1].push(record(Unit::Action(2), game_id, &action2, None)?);
        actions[2].push(record(Unit::Action(3), game_id, &action3, None)?);
        actions[3].push(record(Unit::Action(4), game_id, &action4, None)?);
        integration.push(record_integration(reference, game_id)?);
    }

    Ok(TranscriptBundle::new(conditions, actions, integration)?)
}
