use crate::error::ValidationError;

/// Complexity rules for any newly chosen password.
///
/// Only applied when a password is created. Existing wallet and master
/// passwords are never re-checked, they are simply tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    /// Length is counted in characters, not bytes. Only ASCII letters and
    /// digits satisfy the character class rules.
    pub fn validate(&self, password: &str) -> Result<(), ValidationError> {
        let long_enough = password.chars().count() >= self.min_length;
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());

        if long_enough && has_upper && has_lower && has_digit {
            Ok(())
        } else {
            Err(ValidationError::WeakPassword)
        }
    }

    pub fn is_valid(&self, password: &str) -> bool {
        self.validate(password).is_ok()
    }
}
