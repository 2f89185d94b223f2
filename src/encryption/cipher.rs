//! AES-256-GCM authenticated tokens
//!
//! A [`Token`] is self-contained: it carries a version tag, the creation time,
//! a random nonce and the ciphertext. The GCM tag covers all of it because the
//! header is bound as associated data.
//!
//! ```text
//! version (1) ‖ created_at (8, big-endian unix seconds) ‖ nonce (12) ‖ ciphertext ‖ tag (16)
//! ```

use std::fmt;

use aead::Aead;
use aead::KeyInit;
use aead::Payload;
use aes_gcm::Aes256Gcm;
use aes_gcm::Key;
use aes_gcm::Nonce;
use chrono::DateTime;
use chrono::Utc;
use rand::Rng;
use zeroize::Zeroizing;

use super::key_manager::DerivedKey;

/// Token format version understood by this build.
pub const TOKEN_VERSION: u8 = 0x01;

pub const NONCE_SIZE: usize = 12;
pub const TAG_SIZE: usize = 16;

const TIMESTAMP_SIZE: usize = 8;
const HEADER_SIZE: usize = 1 + TIMESTAMP_SIZE + NONCE_SIZE;

/// Smallest well-formed token: header plus tag, empty plaintext.
pub const MIN_TOKEN_SIZE: usize = HEADER_SIZE + TAG_SIZE;

/// Opening a token failed.
///
/// Deliberately carries no detail: a wrong key, a flipped bit, an unknown
/// version and a truncated token all look the same to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("wrong password or corrupted data")]
pub struct IntegrityError;

/// represents a token sealing error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SealError {
    #[error("encryption failed")]
    EncryptionFailed(#[from] aead::Error),
}

/// Opaque authenticated ciphertext produced by [`WalletCipher::seal`].
#[derive(Clone, PartialEq, Eq)]
pub struct Token(Vec<u8>);

impl Token {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Creation time embedded in the header.
    ///
    /// Read without a key, so it is only trustworthy after a successful
    /// [`WalletCipher::open`].
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.get(1..1 + TIMESTAMP_SIZE)?;
        let mut secs = [0u8; TIMESTAMP_SIZE];
        secs.copy_from_slice(raw);
        let secs = i64::try_from(u64::from_be_bytes(secs)).ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({} bytes)", self.0.len())
    }
}

/// Seals and opens tokens under one derived key
pub struct WalletCipher {
    cipher: Aes256Gcm,
}

impl fmt::Debug for WalletCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WalletCipher")
    }
}

impl WalletCipher {
    pub fn new(key: &DerivedKey) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key.as_bytes());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Generate random 96-bit nonce
    pub fn generate_nonce() -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        rand::rng().fill(&mut nonce);
        nonce
    }

    /// Encrypt `plaintext` into a fresh token.
    ///
    /// Every call draws a new nonce, so sealing the same plaintext twice under
    /// the same key yields different tokens.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Token, SealError> {
        let created_at = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        self.seal_with(plaintext, created_at, Self::generate_nonce())
    }

    fn seal_with(
        &self,
        plaintext: &[u8],
        created_at: u64,
        nonce: [u8; NONCE_SIZE],
    ) -> Result<Token, SealError> {
        let mut token = Vec::with_capacity(MIN_TOKEN_SIZE + plaintext.len());
        token.push(TOKEN_VERSION);
        token.extend_from_slice(&created_at.to_be_bytes());
        token.extend_from_slice(&nonce);

        let ciphertext = self.cipher.encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &token,
            },
        )?;
        token.extend_from_slice(&ciphertext);

        Ok(Token(token))
    }

    /// Verify and decrypt a token.
    ///
    /// Fails closed: either the whole plaintext is returned or an
    /// [`IntegrityError`].
    pub fn open(&self, token: &Token) -> Result<Zeroizing<Vec<u8>>, IntegrityError> {
        let bytes = token.as_bytes();
        if bytes.len() < MIN_TOKEN_SIZE || bytes[0] != TOKEN_VERSION {
            return Err(IntegrityError);
        }

        let (header, body) = bytes.split_at(HEADER_SIZE);
        let nonce = &header[1 + TIMESTAMP_SIZE..];

        self.cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: body,
                    aad: header,
                },
            )
            .map(Zeroizing::new)
            .map_err(|_| IntegrityError)
    }
}
