//! sx-logging: NDJSON events for assessment runs.
//!
//! Append-only, one JSON object per line, so a run can be inspected after the fact even when
//! the process died half-way through.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema version stamped on every event.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

/// Digest of a bundle payload, so events can name exactly which transcripts were graded.
pub fn hash_bundle_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Identifier for one run: start time plus a short digest of what was graded.
pub fn make_run_id(ts_ms: u64, bundle_hash: &str) -> String {
    let short = bundle_hash.get(..12).unwrap_or(bundle_hash);
    format!("{ts_ms}-{short}")
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, NdjsonError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice::<T>(&bytes)?)
}

/// Pretty JSON via a tmp file + rename; readers never see a partial file.
pub fn write_json_atomic<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), NdjsonError> {
    let path = path.as_ref();
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(value)?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfoV1 {
    pub event_schema_version: u32,
    pub checker_version: String,
    pub transcript_format_version: u32,
}

impl VersionInfoV1 {
    pub fn new(checker_version: &str, transcript_format_version: u32) -> Self {
        Self {
            event_schema_version: EVENT_SCHEMA_VERSION,
            checker_version: checker_version.to_string(),
            transcript_format_version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentStartEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub run_id: String,
    pub bot: String,
    pub student_id: Option<u64>,
    /// Where the bundle came from (URL, file, or cache path).
    pub source: String,
    pub bundle_hash: String,
    pub bundle_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstErrorV1 {
    /// "mismatch" | "fault"
    pub kind: String,
    pub transcript_index: u64,
    pub game_id: u64,
    pub decision_point: u64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitResultEventV1 {
    pub event: String,
    pub ts_ms: u64,

    pub run_id: String,
    pub unit: String,
    pub passed: bool,
    pub transcripts_total: u64,
    pub transcripts_tried: u64,
    pub first_error: Option<FirstErrorV1>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentEndEventV1 {
    pub event: String,
    pub ts_ms: u64,

    pub run_id: String,
    pub units_total: u32,
    pub units_passed: u32,
    pub all_passed: bool,
    pub duration_ms: u64,
    /// Set when the run aborted on a fatal error.
    pub fatal: Option<String>,
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for NdjsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NdjsonError::Io(e) => write!(f, "io: {e}"),
            NdjsonError::Json(e) => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for NdjsonError {}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

/// Parse an event log, skipping blank lines and a torn trailing line.
pub fn read_ndjson_lenient(path: impl AsRef<Path>) -> Result<Vec<serde_json::Value>, NdjsonError> {
    let s = std::fs::read_to_string(path)?;
    Ok(s.lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect())
}
