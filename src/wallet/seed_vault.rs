use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use super::seed_phrase::SeedPhrase;
use crate::encryption::EncryptedFile;
use crate::encryption::IntegrityError;
use crate::error::StorageError;
use crate::error::ValidationError;

pub const VAULT_FILE_EXTENSION: &str = "seed";

/// One encrypted seed phrase per file, all in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedVault {
    dir: PathBuf,
}

impl SeedVault {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a wallet name onto a file name that stays inside the vault
    /// directory.
    ///
    /// Whitespace and anything outside `[A-Za-z0-9._-]` becomes `_`, so
    /// distinct names may map to the same file.
    pub fn file_name(name: &str) -> String {
        format!("{}.{VAULT_FILE_EXTENSION}", Self::file_stem(name))
    }

    fn file_stem(name: &str) -> String {
        name.trim()
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
                _ => '_',
            })
            .collect()
    }

    pub fn vault_path(&self, name: &str) -> PathBuf {
        self.dir.join(Self::file_name(name))
    }

    /// The first of `<stem>.seed`, `<stem>-2.seed`, `<stem>-3.seed`, ...
    /// that does not exist on disk and is not claimed according to
    /// `in_use`.
    pub fn free_path(&self, name: &str, in_use: impl Fn(&Path) -> bool) -> PathBuf {
        let stem = Self::file_stem(name);
        (1u32..)
            .map(|n| match n {
                1 => self.dir.join(format!("{stem}.{VAULT_FILE_EXTENSION}")),
                n => self.dir.join(format!("{stem}-{n}.{VAULT_FILE_EXTENSION}")),
            })
            .find(|path| !path.exists() && !in_use(path))
            .unwrap_or_else(|| self.vault_path(name))
    }

    /// Encrypt `seed` under `passphrase` and write it to the wallet's file.
    ///
    /// An existing file is overwritten without asking; confirming that is
    /// up to the caller.
    pub fn store(
        &self,
        name: &str,
        seed: &SeedPhrase,
        passphrase: &str,
    ) -> Result<PathBuf, StorageError> {
        let path = self.vault_path(name);
        self.store_at(&path, name, seed, passphrase)?;
        Ok(path)
    }

    /// Like [`Self::store`], but writes to `path` instead of the file
    /// derived from the name.
    pub fn store_at(
        &self,
        path: &Path,
        name: &str,
        seed: &SeedPhrase,
        passphrase: &str,
    ) -> Result<(), StorageError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let file = EncryptedFile::encrypt(seed.as_bytes(), passphrase)?;
        file.write_to_file(path)
            .map_err(|e| StorageError::io(path, e))?;

        info!(
            "Stored {}-word seed phrase for wallet '{}' at {}",
            seed.word_count(),
            name.trim(),
            path.display()
        );
        Ok(())
    }

    /// Read and decrypt a vault file.
    ///
    /// A missing or short file is an I/O failure; every failure to decrypt
    /// is an [`IntegrityError`].
    pub fn retrieve(path: &Path, passphrase: &str) -> Result<SeedPhrase, StorageError> {
        let bytes = fs::read(path).map_err(|e| StorageError::io(path, e))?;
        let file = EncryptedFile::from_bytes(&bytes).ok_or_else(|| StorageError::TruncatedFile {
            path: path.to_path_buf(),
        })?;

        let plaintext = file.decrypt(passphrase)?;
        let words = std::str::from_utf8(&plaintext).map_err(|_| IntegrityError)?;
        let seed = SeedPhrase::parse(words)?;

        debug!("Decrypted vault file {}", path.display());
        Ok(seed)
    }
}
