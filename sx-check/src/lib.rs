//! sx-check: grade an assignment bot by replaying recorded games.
//!
//! For every graded unit (three conditions, four actions, the integration suite) the driver
//! replays each recorded game id with seeded scripted players, intercepts every decision point
//! to call the function under test, and compares its results with the transcript in order.
//! The first transcript that produces an error decides the unit.

pub mod assignment;
pub mod config;
pub mod decision;
pub mod driver;
pub mod error;
pub mod instrument;
pub mod recorder;
pub mod replay;
pub mod seed;
pub mod snapshot;
pub mod status;
pub mod unit;

pub use assignment::{assignment_move, Assignment, AssignmentBot};
pub use config::{Config, ConfigError};
pub use decision::{DecisionFunction, Probe};
pub use driver::{
    assess_action, assess_condition, assess_correctness, assess_integration, AssessmentObserver,
    NoopObserver,
};
pub use error::CheckError;
pub use recorder::record_bundle;
pub use replay::{decision_trace, replay_game};
pub use seed::{deal_seed, scripted_seed, SCRIPTED_SEED_OFFSET};
pub use snapshot::PerspectiveSnapshot;
pub use status::render_status_report;
pub use unit::{Assessment, ErrorKind, ErrorRecord, Unit, UnitReport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

#[cfg(test)]
mod test_bots;
