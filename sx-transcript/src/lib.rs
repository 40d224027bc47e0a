//! sx-transcript: transcript bundles for the assignment checker.
//!
//! A bundle is fetched once per assessment (see [`source`]), decoded with
//! [`TranscriptBundle::from_bytes`], and never mutated afterwards.

pub mod bundle;
pub mod schema;
pub mod source;

pub use bundle::{
    ActionTranscript, ConditionTranscript, GameId, IntegrationTranscript, Transcript,
    TranscriptBundle, TranscriptError,
};
pub use source::{BundleSource, CachedSource, FileSource, HttpSource};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
