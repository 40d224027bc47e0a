//! Instrumented decision sources.
//!
//! Both requesters sit between the engine and the seated bots. They consume one transcript
//! strictly in order, record at most one [`ErrorRecord`] (the transcript is abandoned after
//! it) and never let a divergence or fault of the function under test interrupt the replay.
//! Only transcript exhaustion aborts the replay, as a fatal malformed-transcript condition.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::slice;
use std::sync::Once;

use sx_core::{Bot, BotError, GameError, Move, MoveRequester, PlayerId, PlayerPerspective};
use sx_core::SimpleMoveRequester;
use sx_transcript::{GameId, Transcript};

use crate::decision::DecisionFunction;
use crate::error::CheckError;
use crate::snapshot::PerspectiveSnapshot;
use crate::unit::{ErrorKind, ErrorRecord, Unit};

/// Whether a decision point is assessed.
pub enum Gate<'a> {
    /// Every decision point.
    Always,
    /// Only points where the recorded predicate outcome is `true`.
    Recorded(slice::Iter<'a, bool>),
}

impl Gate<'_> {
    pub(crate) fn next(&mut self) -> Option<bool> {
        match self {
            Gate::Always => Some(true),
            Gate::Recorded(it) => it.next().copied(),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        match self {
            Gate::Always => 0,
            Gate::Recorded(it) => it.len(),
        }
    }
}

/// Why the function under test produced no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    NotImplemented(String),
    Failed(String),
    Panicked {
        message: String,
        /// `file:line` of the panic, when the containment hook saw it.
        location: Option<String>,
    },
}

impl Fault {
    /// Text shown to the user.
    ///
    /// `NotImplemented` messages are passed through verbatim; everything else is rendered as a
    /// one-line diagnostic naming what went wrong.
    pub fn message(&self) -> String {
        match self {
            Fault::NotImplemented(m) => m.clone(),
            Fault::Failed(m) => format!("error: {m}"),
            Fault::Panicked {
                message,
                location: Some(at),
            } => format!("panicked at {at}: {message}"),
            Fault::Panicked {
                message,
                location: None,
            } => format!("panicked: {message}"),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

thread_local! {
    static CONTAINING: Cell<bool> = const { Cell::new(false) };
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static CONTAINMENT_HOOK: Once = Once::new();

/// Chain a panic hook that stays silent for contained calls and remembers where they panicked.
///
/// Panics outside [`invoke_contained`] still reach the previously installed hook.
fn install_containment_hook() {
    CONTAINMENT_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CONTAINING.with(Cell::get) {
                let location = info.location().map(|l| format!("{}:{}", l.file(), l.line()));
                PANIC_LOCATION.with(|slot| *slot.borrow_mut() = location);
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `f`, turning both returned errors and panics into a [`Fault`].
pub fn invoke_contained<T>(f: impl FnOnce() -> Result<T, BotError>) -> Result<T, Fault> {
    install_containment_hook();
    let outer = CONTAINING.with(|c| c.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CONTAINING.with(|c| c.set(outer));
    match result {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(BotError::NotImplemented(m))) => Err(Fault::NotImplemented(m)),
        Ok(Err(BotError::Failed(m))) => Err(Fault::Failed(m)),
        Err(payload) => Err(Fault::Panicked {
            message: panic_message(payload),
            location: PANIC_LOCATION.with(|slot| slot.borrow_mut().take()),
        }),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic payload".to_string()
    }
}

/// A requester bound to one transcript.
pub trait Instrumented: MoveRequester {
    /// Close the transcript after the replay returned successfully.
    ///
    /// Unconsumed outcomes of a transcript that was not abandoned are a fatal error.
    fn finish(self) -> Result<Vec<ErrorRecord>, CheckError>
    where
        Self: Sized;

    /// The fatal condition that made this requester abort the replay, if any.
    fn take_fatal(&mut self) -> Option<CheckError>;
}

/// Per-transcript bookkeeping shared by both requesters.
struct Ledger {
    unit: Unit,
    transcript_index: usize,
    game_id: GameId,
    /// Decision points seen so far, assessed or not.
    visited: usize,
    /// Expected outcomes consumed so far.
    compared: usize,
    errors: Vec<ErrorRecord>,
    fatal: Option<CheckError>,
}

impl Ledger {
    fn new(unit: Unit, transcript_index: usize, game_id: GameId) -> Self {
        Self {
            unit,
            transcript_index,
            game_id,
            visited: 0,
            compared: 0,
            errors: Vec::new(),
            fatal: None,
        }
    }

    fn abandoned(&self) -> bool {
        !self.errors.is_empty()
    }

    fn malformed_error(&self, reason: String) -> CheckError {
        CheckError::MalformedTranscript {
            unit: self.unit,
            index: self.transcript_index,
            game_id: self.game_id,
            reason,
        }
    }

    /// Remember the fatal condition and produce the error that stops the engine.
    fn abort(&mut self, reason: String) -> GameError {
        let err = GameError::Aborted(reason.clone());
        self.fatal = Some(self.malformed_error(reason));
        err
    }

    fn record(&mut self, kind: ErrorKind, message: String, snapshot: PerspectiveSnapshot) {
        self.errors.push(ErrorRecord {
            unit: self.unit,
            kind,
            transcript_index: self.transcript_index,
            game_id: self.game_id,
            decision_point: self.compared,
            message,
            snapshot: Some(snapshot),
        });
    }

    fn finish(self, unconsumed: usize, ungated: usize) -> Result<Vec<ErrorRecord>, CheckError> {
        if let Some(fatal) = self.fatal {
            return Err(fatal);
        }
        if !self.abandoned() {
            if unconsumed > 0 {
                return Err(self.malformed_error(format!(
                    "{unconsumed} expected outcomes left after the replay ended"
                )));
            }
            if ungated > 0 {
                return Err(self.malformed_error(format!(
                    "{ungated} gating values left after the replay ended"
                )));
            }
        }
        Ok(self.errors)
    }
}

/// Checks a predicate or action while the scripted source keeps playing.
pub struct CheckingRequester<'a, T, F: ?Sized> {
    ledger: Ledger,
    function: &'a F,
    expected: slice::Iter<'a, T>,
    gate: Gate<'a>,
}

impl<'a, T, F> CheckingRequester<'a, T, F>
where
    T: PartialEq + fmt::Display,
    F: DecisionFunction<T> + ?Sized,
{
    pub fn new(
        unit: Unit,
        transcript_index: usize,
        transcript: &'a Transcript<T>,
        function: &'a F,
        gate: Gate<'a>,
    ) -> Self {
        Self {
            ledger: Ledger::new(unit, transcript_index, transcript.game_id),
            function,
            expected: transcript.outcomes.iter(),
            gate,
        }
    }

    fn assess(
        &mut self,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<(), GameError> {
        let visited = self.ledger.visited;
        let gated = match self.gate.next() {
            Some(g) => g,
            None => {
                return Err(self.ledger.abort(format!(
                    "gating sequence ran out at decision point {visited}"
                )))
            }
        };
        if !gated {
            return Ok(());
        }
        let Some(expected) = self.expected.next() else {
            return Err(self.ledger.abort(format!(
                "expected outcomes ran out after {} values (decision point {visited})",
                self.ledger.compared
            )));
        };
        self.ledger.compared += 1;
        let point = self.ledger.compared;

        let function = self.function;
        let name = function.name();
        match invoke_contained(|| function.decide(perspective, leader_move)) {
            Ok(produced) if produced == *expected => {}
            Ok(produced) => self.ledger.record(
                ErrorKind::Mismatch,
                format!(
                    "Something seems wrong in your code. At decision point {point} {name} \
                     returned {produced}, but {expected} was expected."
                ),
                PerspectiveSnapshot::capture(perspective, leader_move),
            ),
            Err(fault) => self.ledger.record(
                ErrorKind::Fault,
                format!(
                    "An error was raised from your bot's method {name} at decision point \
                     {point} with message: {fault}"
                ),
                PerspectiveSnapshot::capture(perspective, leader_move),
            ),
        }
        Ok(())
    }
}

impl<T, F> MoveRequester for CheckingRequester<'_, T, F>
where
    T: PartialEq + fmt::Display,
    F: DecisionFunction<T> + ?Sized,
{
    fn get_move(
        &mut self,
        bot: &mut dyn Bot,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<Move, GameError> {
        self.ledger.visited += 1;
        if !self.ledger.abandoned() {
            self.assess(perspective, leader_move)?;
        }
        // The scripted source alone decides the trajectory.
        SimpleMoveRequester.get_move(bot, perspective, leader_move)
    }
}

impl<T, F> Instrumented for CheckingRequester<'_, T, F>
where
    T: PartialEq + fmt::Display,
    F: DecisionFunction<T> + ?Sized,
{
    fn finish(self) -> Result<Vec<ErrorRecord>, CheckError> {
        let unconsumed = self.expected.len();
        let ungated = self.gate.remaining();
        self.ledger.finish(unconsumed, ungated)
    }

    fn take_fatal(&mut self) -> Option<CheckError> {
        self.ledger.fatal.take()
    }
}

/// Checks a complete bot seated as `student`; the other seat plays unobserved.
///
/// On a fault or a wrong move the expected move is played instead, and once the transcript is
/// abandoned every later student decision is replaced by the expected move without asking the
/// bot, so the replay stays on the recorded trajectory.
pub struct IntegrationRequester<'a> {
    ledger: Ledger,
    student: PlayerId,
    expected: slice::Iter<'a, Move>,
}

impl<'a> IntegrationRequester<'a> {
    pub fn new(
        transcript_index: usize,
        transcript: &'a Transcript<Move>,
        student: PlayerId,
    ) -> Self {
        Self {
            ledger: Ledger::new(Unit::Integration, transcript_index, transcript.game_id),
            student,
            expected: transcript.outcomes.iter(),
        }
    }
}

impl MoveRequester for IntegrationRequester<'_> {
    fn get_move(
        &mut self,
        bot: &mut dyn Bot,
        perspective: &PlayerPerspective<'_>,
        leader_move: Option<&Move>,
    ) -> Result<Move, GameError> {
        self.ledger.visited += 1;
        if perspective.player() != self.student {
            return SimpleMoveRequester.get_move(bot, perspective, leader_move);
        }
        let Some(&expected) = self.expected.next() else {
            return Err(self.ledger.abort(format!(
                "expected moves ran out after {} values (decision point {})",
                self.ledger.compared, self.ledger.visited
            )));
        };
        self.ledger.compared += 1;
        if self.ledger.abandoned() {
            return Ok(expected);
        }
        let point = self.ledger.compared;

        match invoke_contained(|| bot.get_move(perspective, leader_move)) {
            Ok(mv) if mv == expected => Ok(mv),
            Ok(mv) => {
                self.ledger.record(
                    ErrorKind::Mismatch,
                    format!(
                        "Bot played a wrong move at decision point {point}: {expected} was \
                         expected, but got {mv}."
                    ),
                    PerspectiveSnapshot::capture(perspective, leader_move),
                );
                Ok(expected)
            }
            Err(fault) => {
                self.ledger.record(
                    ErrorKind::Fault,
                    format!(
                        "An error was raised by your bot at decision point {point} with \
                         message: {fault}"
                    ),
                    PerspectiveSnapshot::capture(perspective, leader_move),
                );
                Ok(expected)
            }
        }
    }
}

impl Instrumented for IntegrationRequester<'_> {
    fn finish(self) -> Result<Vec<ErrorRecord>, CheckError> {
        let unconsumed = self.expected.len();
        self.ledger.finish(unconsumed, 0)
    }

    fn take_fatal(&mut self) -> Option<CheckError> {
        self.ledger.fatal.take()
    }
}
