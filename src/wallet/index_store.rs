use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;
use tracing::warn;
use zeroize::Zeroizing;

use super::wallet_index::WalletIndex;
use crate::encryption::EncryptedFile;
use crate::error::StorageError;

pub const INDEX_FILE_NAME: &str = "soss_wallets.dat";

/// Which master password a save asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIs)]
pub enum MasterPassword {
    /// No index file yet. The prompt must obtain a new, validated and
    /// confirmed password.
    Create,

    /// An index file exists. The password entered must open it.
    Existing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIs)]
pub enum SaveOutcome {
    /// The index was empty; nothing was written.
    Skipped,

    /// The index file was written for the first time.
    Created,

    /// The existing index file was replaced. `merged` counts wallets that
    /// were on disk but missing from the in-memory index.
    Updated { merged: usize },
}

/// The single encrypted file holding the [`WalletIndex`].
///
/// The index is always read and written as a whole. Every write uses a
/// fresh salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletIndexStore {
    path: PathBuf,
}

impl WalletIndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there is an index file with any content.
    ///
    /// A zero-length file counts as absent.
    pub fn exists(&self) -> bool {
        fs::metadata(&self.path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }

    /// Load and decrypt the index.
    ///
    /// Without an index file this returns an empty index and `password` is
    /// never called. Otherwise it is called exactly once.
    pub fn load<F>(&self, password: F) -> Result<WalletIndex, StorageError>
    where
        F: FnOnce() -> io::Result<Zeroizing<String>>,
    {
        if !self.exists() {
            debug!("No wallet index at {}", self.path.display());
            return Ok(WalletIndex::new());
        }

        let password = password().map_err(StorageError::Prompt)?;
        let index = self.read_with(&password)?;

        info!(
            "Loaded wallet index with {} wallets from {}",
            index.len(),
            self.path.display()
        );
        Ok(index)
    }

    /// Like [`Self::load`], but any failure yields an empty index.
    ///
    /// The file on disk is left untouched. The failure is handed back so it
    /// can be reported.
    pub fn load_or_empty<F>(&self, password: F) -> (WalletIndex, Option<StorageError>)
    where
        F: FnOnce() -> io::Result<Zeroizing<String>>,
    {
        match self.load(password) {
            Ok(index) => (index, None),
            Err(error) => {
                warn!(
                    "Could not load wallet index {}: {error}. Continuing with an empty index.",
                    self.path.display()
                );
                (WalletIndex::new(), Some(error))
            }
        }
    }

    /// Encrypt and write the whole index.
    ///
    /// An empty index is never written. When a file already exists the
    /// entered password must open it, and wallets found there but missing
    /// from `index` are merged into `index` first. A failed check leaves the
    /// file as it was.
    pub fn save<F>(&self, index: &mut WalletIndex, password: F) -> Result<SaveOutcome, StorageError>
    where
        F: FnOnce(MasterPassword) -> io::Result<Zeroizing<String>>,
    {
        if index.is_empty() {
            debug!("Wallet index is empty, not saving");
            return Ok(SaveOutcome::Skipped);
        }

        let outcome = if self.exists() {
            let password = password(MasterPassword::Existing).map_err(StorageError::Prompt)?;
            let on_disk = self.read_with(&password)?;
            let merged = index.absorb_missing(on_disk);
            if merged > 0 {
                warn!("Restored {merged} wallets from the index file that were missing in memory");
            }
            self.write_with(index, &password)?;
            SaveOutcome::Updated { merged }
        } else {
            let password = password(MasterPassword::Create).map_err(StorageError::Prompt)?;
            self.write_with(index, &password)?;
            SaveOutcome::Created
        };

        info!(
            "Saved wallet index with {} wallets to {}",
            index.len(),
            self.path.display()
        );
        Ok(outcome)
    }

    fn read_with(&self, password: &str) -> Result<WalletIndex, StorageError> {
        let bytes = fs::read(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        let file = EncryptedFile::from_bytes(&bytes).ok_or_else(|| StorageError::TruncatedFile {
            path: self.path.clone(),
        })?;
        let plaintext = file.decrypt(password)?;

        Ok(WalletIndex::from_json(&plaintext)?)
    }

    fn write_with(&self, index: &WalletIndex, password: &str) -> Result<(), StorageError> {
        let plaintext = Zeroizing::new(index.to_json()?);
        EncryptedFile::encrypt(&plaintext, password)?
            .write_to_file(&self.path)
            .map_err(|e| StorageError::io(&self.path, e))
    }
}
