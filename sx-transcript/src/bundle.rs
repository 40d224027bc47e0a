use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sx_core::Move;
use thiserror::Error;

use crate::schema::{FORMAT_VERSION, NUM_ACTIONS, NUM_CONDITIONS};

/// Names one recorded play; also seeds its deal and scripted players.
pub type GameId = u64;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported transcript format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("malformed transcript bundle: {0}")]
    Malformed(String),
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("server answered HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Expected outcomes of one function over one replay, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transcript<T> {
    pub game_id: GameId,
    pub outcomes: Vec<T>,
}

impl<T> Transcript<T> {
    pub fn new(game_id: GameId, outcomes: Vec<T>) -> Self {
        Self { game_id, outcomes }
    }
}

pub type ConditionTranscript = Transcript<bool>;
pub type ActionTranscript = Transcript<Move>;
/// Moves the complete decision procedure made from its own seat over one replay.
pub type IntegrationTranscript = Transcript<Move>;

/// Everything needed to grade one student: per slot, transcripts tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptBundle {
    format_version: u32,
    condition1: Vec<ConditionTranscript>,
    condition2: Vec<ConditionTranscript>,
    condition3: Vec<ConditionTranscript>,
    action1: Vec<ActionTranscript>,
    action2: Vec<ActionTranscript>,
    action3: Vec<ActionTranscript>,
    action4: Vec<ActionTranscript>,
    integration: Vec<IntegrationTranscript>,
}

impl TranscriptBundle {
    pub fn new(
        conditions: [Vec<ConditionTranscript>; NUM_CONDITIONS],
        actions: [Vec<ActionTranscript>; NUM_ACTIONS],
        integration: Vec<IntegrationTranscript>,
    ) -> Result<Self, TranscriptError> {
        let [condition1, condition2, condition3] = conditions;
        let [action1, action2, action3, action4] = actions;
        let bundle = Self {
            format_version: FORMAT_VERSION,
            condition1,
            condition2,
            condition3,
            action1,
            action2,
            action3,
            action4,
            integration,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Decode and validate a payload. Any failure is fatal for the whole assessment.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TranscriptError> {
        let bundle: TranscriptBundle = serde_json::from_slice(bytes)?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TranscriptError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, TranscriptError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Write via a temp file + rename so readers never observe a partial bundle.
    pub fn write_atomic(&self, path: impl AsRef<Path>) -> Result<(), TranscriptError> {
        let path = path.as_ref();
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, self.to_bytes()?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), TranscriptError> {
        if self.format_version != FORMAT_VERSION {
            return Err(TranscriptError::UnsupportedVersion {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }
        // Action 1 is gated by condition 1: each of its transcripts needs a partner.
        if self.action1.len() > self.condition1.len() {
            return Err(TranscriptError::Malformed(format!(
                "action1 has {} transcripts but condition1 only {}",
                self.action1.len(),
                self.condition1.len()
            )));
        }
        for (i, (action, condition)) in self.action1.iter().zip(&self.condition1).enumerate() {
            if action.game_id != condition.game_id {
                return Err(TranscriptError::Malformed(format!(
                    "action1 transcript {i} is for game {} but its gating condition1 transcript is for game {}",
                    action.game_id, condition.game_id
                )));
            }
            let gated = condition.outcomes.iter().filter(|&&b| b).count();
            if gated != action.outcomes.len() {
                return Err(TranscriptError::Malformed(format!(
                    "action1 transcript {i} has {} outcomes but condition1 holds {gated} times",
                    action.outcomes.len()
                )));
            }
        }
        Ok(())
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    /// Transcripts of condition `n` (1-based).
    pub fn condition(&self, n: usize) -> Option<&[ConditionTranscript]> {
        match n {
            1 => Some(&self.condition1),
            2 => Some(&self.condition2),
            3 => Some(&self.condition3),
            _ => None,
        }
    }

    /// Transcripts of action `n` (1-based).
    pub fn action(&self, n: usize) -> Option<&[ActionTranscript]> {
        match n {
            1 => Some(&self.action1),
            2 => Some(&self.action2),
            3 => Some(&self.action3),
            4 => Some(&self.action4),
            _ => None,
        }
    }

    pub fn integration(&self) -> &[IntegrationTranscript] {
        &self.integration
    }
}
