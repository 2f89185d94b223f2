//! Seed and index encryption using PBKDF2-HMAC-SHA256 + AES-256-GCM
//!
//! This module provides the cryptographic protection for every file the tool
//! writes.
//!
//! ## Architecture
//!
//! ```text
//! Passphrase (UTF-8)
//!     ↓ PBKDF2-HMAC-SHA256 (100 000 iterations, fresh 16-byte salt)
//! Derived Key (256 bits)
//!     ↓ AES-256-GCM (version ‖ timestamp ‖ nonce bound as associated data)
//! Token
//!     ↓ salt ‖ token
//! Encrypted File
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use soss::encryption::EncryptedFile;
//!
//! # fn main() -> anyhow::Result<()> {
//! # let path = std::path::Path::new("cold-1.seed");
//! let file = EncryptedFile::encrypt(b"abandon ability able", "Passw0rd1")?;
//! file.write_to_file(path)?;
//!
//! let bytes = std::fs::read(path)?;
//! let file = EncryptedFile::from_bytes(&bytes).ok_or_else(|| anyhow::anyhow!("truncated"))?;
//! let plaintext = file.decrypt("Passw0rd1")?;
//! # Ok(())
//! # }
//! ```

pub use cipher::IntegrityError;
pub use cipher::SealError;
pub use cipher::Token;
pub use cipher::WalletCipher;
pub use format::EncryptedFile;
pub use format::MIN_FILE_SIZE;
pub use key_manager::DerivedKey;
pub use key_manager::KeyManager;
pub use key_manager::Salt;
pub use key_manager::PBKDF2_ITERATIONS;
pub use key_manager::SALT_SIZE;

mod cipher;
mod format;
mod key_manager;
