//! Tolerant read-and-parse of the snapshot file.
//!
//! The game rewrites the export in place, so a read can land on a
//! half-written file. Empty content, unparseable JSON and I/O failures are
//! all treated as transient and retried under a [`RetryPolicy`].

use crate::snapshot::GameSnapshot;
use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 5;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    /// Effective attempt count; a zero budget still reads once.
    pub const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

/// A single failed read attempt.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum TransientReadError {
    #[error("file is empty or still being written")]
    Empty,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid game state JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The retry budget ran out; carries the last attempt's failure.
#[derive(thiserror::Error, Debug)]
#[error("could not read game state after {attempts} attempts: {source}")]
pub struct PersistentReadError {
    pub attempts: u32,
    #[source]
    pub source: TransientReadError,
}

/// Source of snapshots for the polling loop.
pub trait ReadSnapshot {
    fn read(&self, path: &Path) -> Result<GameSnapshot, PersistentReadError>;
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotReader {
    policy: RetryPolicy,
}

impl SnapshotReader {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// One attempt: read the whole file and parse it.
    pub fn read_once(path: &Path) -> Result<GameSnapshot, TransientReadError> {
        let text = fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Err(TransientReadError::Empty);
        }
        Ok(GameSnapshot::from_json(&text)?)
    }

    /// Read with retries. Transient failures never escape; only an exhausted
    /// budget is returned as an error.
    pub fn read(&self, path: &Path) -> Result<GameSnapshot, PersistentReadError> {
        let max = self.policy.attempts();
        let mut attempt = 1;
        loop {
            match Self::read_once(path) {
                Ok(snapshot) => return Ok(snapshot),
                Err(err) => {
                    log::warn!("transient read error (attempt {attempt}/{max}): {err}");
                    if attempt >= max {
                        return Err(PersistentReadError { attempts: attempt, source: err });
                    }
                }
            }
            attempt += 1;
            if !self.policy.delay.is_zero() {
                thread::sleep(self.policy.delay);
            }
        }
    }
}

impl ReadSnapshot for SnapshotReader {
    fn read(&self, path: &Path) -> Result<GameSnapshot, PersistentReadError> {
        SnapshotReader::read(self, path)
    }
}
