//! Cheap change detection for the snapshot file.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;

/// How a [`Marker`] is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerKind {
    /// Modification time plus length, from file metadata.
    #[default]
    Modified,
    /// SHA-256 of the file contents.
    Content,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MarkerParseError {
    #[error("unknown marker kind '{0}' (expected modified|content)")]
    Unknown(String),
}

impl FromStr for MarkerKind {
    type Err = MarkerParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modified" | "mtime" => Ok(MarkerKind::Modified),
            "content" | "hash" => Ok(MarkerKind::Content),
            _ => Err(MarkerParseError::Unknown(s.to_string())),
        }
    }
}

/// Opaque, comparable fingerprint of the snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Modified { at: SystemTime, len: u64 },
    Content([u8; 32]),
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Modified { at, len } => {
                let secs = at.duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
                write!(f, "mtime {}.{:09} len {len}", secs.as_secs(), secs.subsec_nanos())
            }
            Marker::Content(digest) => write!(f, "sha256 {}", hex::encode(&digest[..8])),
        }
    }
}

/// Result of probing the snapshot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The file does not exist yet. Not an error.
    Absent,
    Unchanged(Marker),
    Changed(Marker),
}

impl Probe {
    pub fn changed(&self) -> bool {
        matches!(self, Probe::Changed(_))
    }

    pub fn marker(&self) -> Option<Marker> {
        match self {
            Probe::Absent => None,
            Probe::Unchanged(m) | Probe::Changed(m) => Some(*m),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector {
    kind: MarkerKind,
}

impl ChangeDetector {
    pub fn new(kind: MarkerKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// Compute the current marker, or `None` if the file does not exist.
    pub fn marker(&self, path: &Path) -> io::Result<Option<Marker>> {
        let result = match self.kind {
            MarkerKind::Modified => fs::metadata(path)
                .and_then(|meta| Ok(Marker::Modified { at: meta.modified()?, len: meta.len() })),
            MarkerKind::Content => fs::read(path).map(|bytes| {
                let mut digest = [0u8; 32];
                digest.copy_from_slice(&Sha256::digest(&bytes));
                Marker::Content(digest)
            }),
        };
        match result {
            Ok(marker) => Ok(Some(marker)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Compare the file's current marker with the last one seen.
    pub fn probe(&self, path: &Path, last: Option<&Marker>) -> io::Result<Probe> {
        Ok(match self.marker(path)? {
            None => Probe::Absent,
            Some(marker) if last == Some(&marker) => Probe::Unchanged(marker),
            Some(marker) => Probe::Changed(marker),
        })
    }
}
