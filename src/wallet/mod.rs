//! Seed vault files, the wallet index, and validation of what goes into them.

pub mod index_store;
pub mod password;
pub mod seed_phrase;
pub mod seed_vault;
pub mod wallet_index;

pub use index_store::MasterPassword;
pub use index_store::SaveOutcome;
pub use index_store::WalletIndexStore;
pub use password::PasswordPolicy;
pub use seed_phrase::SeedPhrase;
pub use seed_phrase::WordCount;
pub use seed_vault::SeedVault;
pub use wallet_index::WalletIndex;
pub use wallet_index::WalletRecord;

pub use crate::error::ValidationError;
