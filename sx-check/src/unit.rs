//! Graded units and what is reported about them.

use std::fmt;

use serde::{Deserialize, Serialize};
use sx_transcript::GameId;

use crate::snapshot::PerspectiveSnapshot;

/// Granularity at which pass/fail is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Predicate 1..=3.
    Condition(u8),
    /// Action 1..=4.
    Action(u8),
    Integration,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Condition(n) => write!(f, "condition{n}"),
            Unit::Action(n) => write!(f, "action{n}"),
            Unit::Integration => f.write_str("integration"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The function returned a value other than the recorded one.
    Mismatch,
    /// The function failed or panicked instead of returning.
    Fault,
}

/// One divergence, with the decision-point state that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub unit: Unit,
    pub kind: ErrorKind,
    /// Position of the transcript within its unit.
    pub transcript_index: usize,
    pub game_id: GameId,
    /// 1-based index of the compared outcome within the transcript.
    pub decision_point: usize,
    pub message: String,
    pub snapshot: Option<PerspectiveSnapshot>,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(s) = &self.snapshot {
            write!(f, "\n--- For input {s}")?;
        }
        Ok(())
    }
}

/// Verdict for one unit. Empty `errors` means the unit passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    pub unit: Unit,
    pub transcripts_total: usize,
    /// Transcripts replayed before stopping (all of them when the unit passes).
    pub transcripts_tried: usize,
    pub errors: Vec<ErrorRecord>,
}

impl UnitReport {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first_error(&self) -> Option<&ErrorRecord> {
        self.errors.first()
    }
}

/// Results of one assessment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub conditions: Vec<UnitReport>,
    pub actions: Vec<UnitReport>,
    pub integration: UnitReport,
}

impl Assessment {
    pub fn condition(&self, n: usize) -> Option<&UnitReport> {
        n.checked_sub(1).and_then(|i| self.conditions.get(i))
    }

    pub fn action(&self, n: usize) -> Option<&UnitReport> {
        n.checked_sub(1).and_then(|i| self.actions.get(i))
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitReport> {
        self.conditions
            .iter()
            .chain(self.actions.iter())
            .chain(std::iter::once(&self.integration))
    }

    pub fn all_passed(&self) -> bool {
        self.units().all(UnitReport::passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sx_core::{Card, GamePhase, Move, PlayerId, Rank, Suit};

    fn passing(unit: Unit) -> UnitReport {
        UnitReport {
            unit,
            transcripts_total: 3,
            transcripts_tried: 3,
            errors: Vec::new(),
        }
    }

    #[test]
    fn failing_assessment_survives_json() {
        let queen = Card::new(Rank::Queen, Suit::Hearts);
        let king = Card::new(Rank::King, Suit::Hearts);
        let snapshot = PerspectiveSnapshot {
            player: PlayerId::Two,
            hand: vec![Card::new(Rank::Ace, Suit::Clubs), Card::new(Rank::Jack, Suit::Spades)],
            phase: GamePhase::Two,
            leader_move: Some(Move::marriage(queen, king)),
            trump_suit: Suit::Hearts,
            valid_moves: vec![Move::regular(Card::new(Rank::Ace, Suit::Clubs))],
            won_cards: vec![Card::new(Rank::Ten, Suit::Diamonds)],
            opponent_won_cards: Vec::new(),
            known_opponent_cards: vec![king],
            talon_size: 0,
        };
        let failing = UnitReport {
            unit: Unit::Condition(2),
            transcripts_total: 3,
            transcripts_tried: 2,
            errors: vec![ErrorRecord {
                unit: Unit::Condition(2),
                kind: ErrorKind::Mismatch,
                transcript_index: 1,
                game_id: 14,
                decision_point: 6,
                message: "returned true, but false was expected".to_string(),
                snapshot: Some(snapshot),
            }],
        };
        let assessment = Assessment {
            conditions: vec![passing(Unit::Condition(1)), failing, passing(Unit::Condition(3))],
            actions: (1..=4).map(|n| passing(Unit::Action(n))).collect(),
            integration: passing(Unit::Integration),
        };

        let text = serde_json::to_string(&assessment).unwrap();
        let back: Assessment = serde_json::from_str(&text).unwrap();
        assert_eq!(back, assessment);
        assert!(!back.all_passed());
        assert_eq!(back.condition(2).unwrap().first_error().unwrap().decision_point, 6);
    }

    #[test]
    fn units_display_as_method_names() {
        assert_eq!(Unit::Condition(3).to_string(), "condition3");
        assert_eq!(Unit::Action(1).to_string(), "action1");
        assert_eq!(Unit::Integration.to_string(), "integration");
    }
}
