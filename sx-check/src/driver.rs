//! Assessment driver: one verdict per unit, fail-fast over its transcripts.
//!
//! Every transcript gets a fresh engine, deal RNG and scripted player, so units and
//! transcripts never influence each other.

use std::fmt;

use sx_core::{Bot, Lineup, Move, PlayerId};
use sx_transcript::{
    ActionTranscript, ConditionTranscript, GameId, IntegrationTranscript, Transcript,
    TranscriptBundle,
};

use crate::assignment::{Assignment, AssignmentBot};
use crate::decision::{DecisionFunction, Probe};
use crate::error::CheckError;
use crate::instrument::{CheckingRequester, Gate, Instrumented, IntegrationRequester};
use crate::replay::replay_game;
use crate::seed::scripted_bot;
use crate::unit::{Assessment, ErrorRecord, Unit, UnitReport};

/// Seat the graded bot occupies during integration replays.
pub const STUDENT_SEAT: PlayerId = PlayerId::One;

/// Receives each unit's report as soon as it is decided.
pub trait AssessmentObserver {
    fn on_unit(&mut self, report: &UnitReport);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AssessmentObserver for NoopObserver {
    fn on_unit(&mut self, _report: &UnitReport) {}
}

/// Replay one transcript and collect what the requester found.
fn run_transcript<R: Instrumented>(
    unit: Unit,
    game_id: GameId,
    mut requester: R,
    lineup: &mut Lineup<'_>,
) -> Result<Vec<ErrorRecord>, CheckError> {
    match replay_game(game_id, &mut requester, lineup) {
        Ok(_) => requester.finish(),
        Err(source) => Err(requester
            .take_fatal()
            .unwrap_or(CheckError::Replay {
                unit,
                game_id,
                source,
            })),
    }
}

fn assess_scripted<'a, T, F>(
    unit: Unit,
    function: &'a F,
    transcripts: &'a [Transcript<T>],
    mut gate_for: impl FnMut(usize, &Transcript<T>) -> Result<Gate<'a>, CheckError>,
) -> Result<UnitReport, CheckError>
where
    T: PartialEq + fmt::Display,
    F: DecisionFunction<T> + ?Sized,
{
    let mut report = UnitReport {
        unit,
        transcripts_total: transcripts.len(),
        transcripts_tried: 0,
        errors: Vec::new(),
    };
    for (index, transcript) in transcripts.iter().enumerate() {
        report.transcripts_tried += 1;
        let gate = gate_for(index, transcript)?;
        let requester = CheckingRequester::new(unit, index, transcript, function, gate);
        let mut scripted = scripted_bot(transcript.game_id);
        let errors = run_transcript(
            unit,
            transcript.game_id,
            requester,
            &mut Lineup::Mirror(&mut scripted),
        )?;
        // One failing transcript decides the unit.
        if !errors.is_empty() {
            report.errors = errors;
            break;
        }
    }
    Ok(report)
}

/// Check a predicate at every decision point of every transcript.
pub fn assess_condition<F>(
    unit: Unit,
    function: &F,
    transcripts: &[ConditionTranscript],
) -> Result<UnitReport, CheckError>
where
    F: DecisionFunction<bool> + ?Sized,
{
    assess_scripted(unit, function, transcripts, |_, _| Ok(Gate::Always))
}

/// Check an action. With `gating`, transcript `i` is only consulted where the outcomes of
/// `gating[i]` are `true`.
pub fn assess_action<F>(
    unit: Unit,
    function: &F,
    transcripts: &[ActionTranscript],
    gating: Option<&[ConditionTranscript]>,
) -> Result<UnitReport, CheckError>
where
    F: DecisionFunction<Move> + ?Sized,
{
    assess_scripted(unit, function, transcripts, |index, transcript| {
        let Some(gating) = gating else {
            return Ok(Gate::Always);
        };
        let malformed = |reason: String| CheckError::MalformedTranscript {
            unit,
            index,
            game_id: transcript.game_id,
            reason,
        };
        let partner = gating
            .get(index)
            .ok_or_else(|| malformed("no gating transcript at this index".to_string()))?;
        if partner.game_id != transcript.game_id {
            return Err(malformed(format!(
                "gating transcript is for game {}",
                partner.game_id
            )));
        }
        Ok(Gate::Recorded(partner.outcomes.iter()))
    })
}

/// Check a complete decision procedure, seated as player one against the scripted player.
pub fn assess_integration(
    bot: &mut dyn Bot,
    transcripts: &[IntegrationTranscript],
) -> Result<UnitReport, CheckError> {
    let unit = Unit::Integration;
    let mut report = UnitReport {
        unit,
        transcripts_total: transcripts.len(),
        transcripts_tried: 0,
        errors: Vec::new(),
    };
    for (index, transcript) in transcripts.iter().enumerate() {
        report.transcripts_tried += 1;
        let requester = IntegrationRequester::new(index, transcript, STUDENT_SEAT);
        let mut scripted = scripted_bot(transcript.game_id);
        let errors = run_transcript(
            unit,
            transcript.game_id,
            requester,
            &mut Lineup::Pair(&mut *bot, &mut scripted),
        )?;
        if !errors.is_empty() {
            report.errors = errors;
            break;
        }
    }
    Ok(report)
}

/// Grade all eight units of `bot` against `bundle`.
///
/// Units run in report order: condition 1, action 1, conditions 2 and 3, actions 2 to 4,
/// then integration. `observer` sees each report as it is produced.
pub fn assess_correctness<A: Assignment + ?Sized>(
    bot: &A,
    bundle: &TranscriptBundle,
    observer: &mut dyn AssessmentObserver,
) -> Result<Assessment, CheckError> {
    let mut observed = |report: UnitReport| {
        observer.on_unit(&report);
        report
    };
    let condition1 = Probe::new("condition1", |p, m| bot.condition1(p, m));
    let condition2 = Probe::new("condition2", |p, m| bot.condition2(p, m));
    let condition3 = Probe::new("condition3", |p, m| bot.condition3(p, m));
    let action1 = Probe::new("action1", |p, m| bot.action1(p, m));
    let action2 = Probe::new("action2", |p, m| bot.action2(p, m));
    let action3 = Probe::new("action3", |p, m| bot.action3(p, m));
    let action4 = Probe::new("action4", |p, m| bot.action4(p, m));

    let gating = bundle.condition(1).unwrap_or_default();
    let c1 = observed(assess_condition(Unit::Condition(1), &condition1, gating)?);
    let a1 = observed(assess_action(
        Unit::Action(1),
        &action1,
        bundle.action(1).unwrap_or_default(),
        Some(gating),
    )?);
    let c2 = observed(assess_condition(
        Unit::Condition(2),
        &condition2,
        bundle.condition(2).unwrap_or_default(),
    )?);
    let c3 = observed(assess_condition(
        Unit::Condition(3),
        &condition3,
        bundle.condition(3).unwrap_or_default(),
    )?);
    let a2 = observed(assess_action(
        Unit::Action(2),
        &action2,
        bundle.action(2).unwrap_or_default(),
        None,
    )?);
    let a3 = observed(assess_action(
        Unit::Action(3),
        &action3,
        bundle.action(3).unwrap_or_default(),
        None,
    )?);
    let a4 = observed(assess_action(
        Unit::Action(4),
        &action4,
        bundle.action(4).unwrap_or_default(),
        None,
    )?);
    let mut student = AssignmentBot(bot);
    let integration = observed(assess_integration(&mut student, bundle.integration())?);

    Ok(Assessment {
        conditions: vec![c1, c2, c3],
        actions: vec![a1, a2, a3, a4],
        integration,
    })
}
