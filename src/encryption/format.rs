//! On-disk container shared by vault and index files: `salt ‖ token`.

use std::fs;
use std::io;
use std::path::Path;

use zeroize::Zeroizing;

use super::cipher::IntegrityError;
use super::cipher::SealError;
use super::cipher::Token;
use super::cipher::WalletCipher;
use super::cipher::MIN_TOKEN_SIZE;
use super::key_manager::KeyManager;
use super::key_manager::Salt;
use super::key_manager::SALT_SIZE;

/// Smallest byte length a well-formed encrypted file can have.
pub const MIN_FILE_SIZE: usize = SALT_SIZE + MIN_TOKEN_SIZE;

/// A salt and the token sealed under the key derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedFile {
    pub salt: Salt,
    pub token: Token,
}

impl EncryptedFile {
    /// Encrypt `plaintext` under `passphrase` with a freshly generated salt.
    pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<Self, SealError> {
        let salt = KeyManager::generate_salt();
        let key = KeyManager::derive(passphrase.as_bytes(), &salt);
        let token = WalletCipher::new(&key).seal(plaintext)?;

        Ok(Self { salt, token })
    }

    /// Derive the key from the stored salt and open the token.
    pub fn decrypt(&self, passphrase: &str) -> Result<Zeroizing<Vec<u8>>, IntegrityError> {
        let key = KeyManager::derive(passphrase.as_bytes(), &self.salt);
        WalletCipher::new(&key).open(&self.token)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SALT_SIZE + self.token.len());
        bytes.extend_from_slice(self.salt.as_bytes());
        bytes.extend_from_slice(self.token.as_bytes());
        bytes
    }

    /// Split raw file content into salt and token.
    ///
    /// Returns `None` when the content is too short to be an encrypted file.
    /// Anything long enough is accepted here; whether it is genuine is only
    /// decided by [`Self::decrypt`].
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < MIN_FILE_SIZE {
            return None;
        }
        let salt = Salt::from_prefix(bytes)?;
        let token = Token::from_bytes(bytes[SALT_SIZE..].to_vec());
        Some(Self { salt, token })
    }

    /// Write the file, replacing any previous content.
    ///
    /// On Unix a newly created file gets mode 600.
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let bytes = self.to_bytes();

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::prelude::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(&bytes)?;
            file.sync_all()
        }
        #[cfg(not(unix))]
        {
            fs::write(path, bytes)
        }
    }
}
