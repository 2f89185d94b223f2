use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Decalarative specification of command-line arguments
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about)]
pub struct Args {
    /// Directory holding the wallet index and the encrypted seed files.
    ///
    /// Defaults to the platform data directory.
    #[clap(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Seconds of "Verifying data integrity" before a decrypted seed phrase
    /// is shown.
    #[clap(long, default_value = "5", value_name = "SECONDS")]
    pub reveal_delay: u64,

    /// Seconds a revealed seed phrase stays on screen. Any key clears it
    /// sooner.
    #[clap(long, default_value = "30", value_name = "SECONDS")]
    pub clear_after: u64,
}

impl Args {
    pub fn clear_after(&self) -> Duration {
        Duration::from_secs(self.clear_after)
    }
}

impl Default for Args {
    fn default() -> Self {
        let empty: Vec<String> = vec![];
        Self::parse_from(empty)
    }
}
