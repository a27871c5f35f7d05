#![deny(warnings)]

//! Persistence layer: profile documents on disk.
//!
//! A profile is stored as a single JSON document. [`save`] replaces the file
//! atomically (temp file + rename); [`load`] distinguishes a missing file
//! (`Ok(None)`) from an unreadable one ([`StoreError::Io`]) and from one that
//! is not a valid profile ([`StoreError::Deserialize`]).
//!
//! Concurrent saves to the same path are last-writer-wins; no locking is done.

use std::path::{Path, PathBuf};
use thiserror::Error;

mod codec;
mod store;

pub use codec::{deserialize, serialize};
pub use store::{load, load_or_default, save};

/// Default location of the profile document, relative to the working directory.
pub const DEFAULT_PROFILE_PATH: &str = "./profiles/profile.json";

/// Returns the default profile path used when the caller supplies none.
pub fn default_profile_path() -> PathBuf {
    PathBuf::from(DEFAULT_PROFILE_PATH)
}

/// Errors raised by the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The location could not be read or written.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The content exists but is not a well-formed profile.
    #[error("malformed profile{}: {source}", describe(.path))]
    Deserialize {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    /// The profile could not be encoded.
    #[error("failed to encode profile: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    /// True for failures to reach the storage location.
    pub fn is_io(&self) -> bool {
        matches!(self, StoreError::Io { .. })
    }

    /// True when the document exists but does not decode to a profile.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Deserialize { .. })
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(source: serde_json::Error) -> Self {
        StoreError::Deserialize { path: None, source }
    }

    /// Attach the file path to a decode failure.
    pub(crate) fn at(self, path: &Path) -> Self {
        match self {
            StoreError::Deserialize { source, .. } => StoreError::Deserialize {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

fn describe(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" at {}", p.display()),
        None => String::new(),
    }
}
