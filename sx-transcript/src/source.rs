//! Where bundle payloads come from.
//!
//! Fetching is a one-shot blocking call made before any assessment starts; every error here is
//! fatal for the run.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::bundle::{TranscriptBundle, TranscriptError};
use crate::schema::BUNDLE_FILE_NAME;

pub trait BundleSource {
    /// Raw payload for `student_id`.
    fn fetch(&self, student_id: u64) -> Result<Vec<u8>, TranscriptError>;

    /// Human-readable origin, for progress output.
    fn describe(&self, student_id: u64) -> String;
}

/// Transcript server: `GET {base_url}/{student_id}/bot.gamelog`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn url_for(&self, student_id: u64) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            student_id,
            BUNDLE_FILE_NAME
        )
    }
}

impl BundleSource for HttpSource {
    fn fetch(&self, student_id: u64) -> Result<Vec<u8>, TranscriptError> {
        let url = self.url_for(student_id);
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let resp = match agent.get(&url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, _)) => {
                return Err(TranscriptError::Status { url, status })
            }
            Err(e) => {
                return Err(TranscriptError::Transport {
                    url,
                    reason: e.to_string(),
                })
            }
        };
        // Only a plain 200 carries a bundle.
        if resp.status() != 200 {
            return Err(TranscriptError::Status {
                url,
                status: resp.status(),
            });
        }
        let mut buf = Vec::new();
        resp.into_reader().read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn describe(&self, student_id: u64) -> String {
        self.url_for(student_id)
    }
}

/// A bundle already on disk; the student id is ignored.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BundleSource for FileSource {
    fn fetch(&self, _student_id: u64) -> Result<Vec<u8>, TranscriptError> {
        Ok(fs::read(&self.path)?)
    }

    fn describe(&self, _student_id: u64) -> String {
        self.path.display().to_string()
    }
}

/// Keeps one validated payload per student id under `dir` and serves it on later runs.
#[derive(Debug, Clone)]
pub struct CachedSource<S> {
    inner: S,
    dir: PathBuf,
}

impl<S: BundleSource> CachedSource<S> {
    pub fn new(inner: S, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn cache_path(&self, student_id: u64) -> PathBuf {
        self.dir.join(format!("{student_id}.{BUNDLE_FILE_NAME}"))
    }

    fn store(&self, path: &Path, bytes: &[u8]) -> Result<(), TranscriptError> {
        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl<S: BundleSource> BundleSource for CachedSource<S> {
    fn fetch(&self, student_id: u64) -> Result<Vec<u8>, TranscriptError> {
        let path = self.cache_path(student_id);
        if path.exists() {
            return Ok(fs::read(&path)?);
        }
        let bytes = self.inner.fetch(student_id)?;
        // Never cache a payload that would fail to decode.
        TranscriptBundle::from_bytes(&bytes)?;
        self.store(&path, &bytes)?;
        Ok(bytes)
    }

    fn describe(&self, student_id: u64) -> String {
        let path = self.cache_path(student_id);
        if path.exists() {
            format!("{} (cached)", path.display())
        } else {
            self.inner.describe(student_id)
        }
    }
}
