//! PBKDF2-HMAC-SHA256 key derivation for vault and index files
//!
//! Every encryption operation draws a fresh [`Salt`] and stretches the
//! passphrase into a 256-bit [`DerivedKey`]. The iteration count is fixed:
//! it is not stored in the files, so changing it would make every existing
//! file unreadable.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Salt length in bytes. Salts are stored in the clear in front of the token.
pub const SALT_SIZE: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// PBKDF2 iteration count. Always run in full.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Public, random, per-file salt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Interpret the first [`SALT_SIZE`] bytes of `bytes` as a salt.
    ///
    /// Returns `None` if the slice is shorter than a salt.
    pub fn from_prefix(bytes: &[u8]) -> Option<Self> {
        let prefix = bytes.get(..SALT_SIZE)?;
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(prefix);
        Some(Self(salt))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// 256-bit symmetric key, zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey(Zeroizing<[u8; KEY_SIZE]>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(Zeroizing::new(bytes))
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

/// Turns passphrases into keys.
#[derive(Debug, Clone, Copy)]
pub struct KeyManager;

impl KeyManager {
    /// Derive a key from `passphrase` and `salt`.
    ///
    /// Deterministic: identical inputs always yield the identical key. There
    /// is no cache, each call pays the full [`PBKDF2_ITERATIONS`].
    pub fn derive(passphrase: &[u8], salt: &Salt) -> DerivedKey {
        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        pbkdf2_hmac::<Sha256>(passphrase, salt.as_bytes(), PBKDF2_ITERATIONS, &mut *key);
        DerivedKey(key)
    }

    /// Generate a fresh random salt
    pub fn generate_salt() -> Salt {
        let mut salt = [0u8; SALT_SIZE];
        rand::rng().fill(&mut salt);
        Salt(salt)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prop_assert_eq;
    use proptest::prop_assert_ne;
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn deterministic_derivation() {
        let salt = Salt::from_bytes([42u8; SALT_SIZE]);

        let k1 = KeyManager::derive(b"correct-horse-battery-staple", &salt);
        let k2 = KeyManager::derive(b"correct-horse-battery-staple", &salt);

        assert_eq!(k1, k2);
    }

    #[test]
    fn key_is_not_the_passphrase() {
        let salt = Salt::from_bytes(*b"0123456789abcdef");
        let passphrase = [b'P'; KEY_SIZE];

        assert_ne!(KeyManager::derive(&passphrase, &salt).as_bytes(), &passphrase);
    }

    #[test]
    fn different_passwords_different_keys() {
        let salt = Salt::from_bytes([7u8; SALT_SIZE]);

        assert_ne!(
            KeyManager::derive(b"password1", &salt),
            KeyManager::derive(b"password2", &salt)
        );
    }

    #[test]
    fn generated_salts_differ() {
        let salt1 = KeyManager::generate_salt();
        let salt2 = KeyManager::generate_salt();

        assert_ne!(salt1, salt2);
    }

    #[test]
    fn salt_from_short_prefix_is_rejected() {
        assert!(Salt::from_prefix(&[0u8; SALT_SIZE - 1]).is_none());
        assert_eq!(
            Salt::from_prefix(&[9u8; SALT_SIZE + 4]),
            Some(Salt::from_bytes([9u8; SALT_SIZE]))
        );
    }

    #[test]
    fn debug_output_redacts_key() {
        let key = DerivedKey::from_bytes([0xAB; KEY_SIZE]);
        let rendered = format!("{:?}", key);

        assert!(!rendered.contains("171"));
        assert!(rendered.contains("redacted"));
    }

    #[proptest(cases = 8)]
    fn same_inputs_same_key(passphrase: Vec<u8>, salt: [u8; SALT_SIZE]) {
        let salt = Salt::from_bytes(salt);
        prop_assert_eq!(
            KeyManager::derive(&passphrase, &salt),
            KeyManager::derive(&passphrase, &salt)
        );
    }

    #[proptest(cases = 8)]
    fn different_salt_different_key(
        passphrase: Vec<u8>,
        salt1: [u8; SALT_SIZE],
        salt2: [u8; SALT_SIZE],
    ) {
        proptest::prop_assume!(salt1 != salt2);
        prop_assert_ne!(
            KeyManager::derive(&passphrase, &Salt::from_bytes(salt1)),
            KeyManager::derive(&passphrase, &Salt::from_bytes(salt2))
        );
    }
}
