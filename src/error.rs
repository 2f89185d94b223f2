//! provides the error types returned by vault, index and session operations.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::encryption::IntegrityError;
use crate::encryption::SealError;

/// Rejected user input. Always recoverable by re-entering it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Wallet name cannot be empty.")]
    EmptyName,

    #[error("Wallet '{0}' already exists and was not overwritten.")]
    NameDeclined(String),

    #[error(
        "Password must be at least 8 characters and include uppercase, lowercase letters, and numbers."
    )]
    WeakPassword,

    #[error("Passphrases do not match. Please try again.")]
    PasswordMismatch,

    #[error("Seed phrase has {0} words. It must be 12, 18, or 24 words.")]
    WordCount(usize),

    #[error("Invalid selection. Please try again.")]
    UnknownSelection,
}

/// The four error kinds callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Integrity,
    Io,
    UserCancelled,
}

/// enumerates possible failures of store, retrieve, load and save
#[derive(Debug, thiserror::Error, strum::EnumIs)]
#[non_exhaustive]
pub enum StorageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Seal(#[from] SealError),

    #[error("could not access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file '{}' is truncated or is not an encrypted file", .path.display())]
    TruncatedFile { path: PathBuf },

    #[error("input unavailable: {0}")]
    Prompt(#[source] io::Error),

    #[error("could not clear the screen: {0}")]
    Screen(#[source] io::Error),

    #[error("failed to encode wallet index")]
    Encoding(#[from] serde_json::Error),

    #[error("Operation cancelled.")]
    UserCancelled,
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Collapse the variants onto the kinds the session distinguishes.
    ///
    /// Unreadable input is treated like an I/O failure; a sealing failure
    /// leaves nothing on disk, which is also reported as I/O.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::Seal(_)
            | Self::Io { .. }
            | Self::TruncatedFile { .. }
            | Self::Prompt(_)
            | Self::Screen(_)
            | Self::Encoding(_) => ErrorKind::Io,
            Self::UserCancelled => ErrorKind::UserCancelled,
        }
    }
}
