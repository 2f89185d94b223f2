use std::io;
use std::time::Duration;

use tracing::debug;
use tracing::warn;

use super::console::Console;
use crate::config_models::cli_args::Args;
use crate::wallet::SeedPhrase;

/// How a decrypted seed phrase is shown.
///
/// A progress delay comes first and the screen is cleared after a timeout.
/// Neither protects the secret; they only slow down casual shoulder
/// surfing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealPolicy {
    pub ticks: u32,
    pub tick: Duration,
    pub clear_after: Duration,
}

impl Default for RevealPolicy {
    fn default() -> Self {
        Self {
            ticks: 5,
            tick: Duration::from_secs(1),
            clear_after: Duration::from_secs(30),
        }
    }
}

impl From<&Args> for RevealPolicy {
    fn from(args: &Args) -> Self {
        Self {
            ticks: u32::try_from(args.reveal_delay).unwrap_or(u32::MAX),
            clear_after: args.clear_after(),
            ..Self::default()
        }
    }
}

impl RevealPolicy {
    /// No delay and no wait.
    pub fn immediate() -> Self {
        Self {
            ticks: 0,
            tick: Duration::ZERO,
            clear_after: Duration::ZERO,
        }
    }

    pub fn delay(&self) -> Duration {
        self.tick * self.ticks
    }

    /// Show the progress indicator, one dot per tick.
    pub fn show_progress(&self, console: &mut dyn Console) {
        console.print_inline("Verifying data integrity");
        for _ in 0..self.ticks {
            console.pause(self.tick);
            console.print_inline(".");
        }
        console.print("");
    }

    /// Delay, show the phrase, then clear the screen after the timeout or a
    /// key press.
    ///
    /// The screen is cleared even if the key wait is unavailable; the full
    /// timeout is waited out instead.
    pub fn reveal(
        &self,
        console: &mut dyn Console,
        name: &str,
        seed: &SeedPhrase,
    ) -> io::Result<()> {
        self.show_progress(console);

        console.print("");
        console.print("Access granted.");
        console.print(&format!("Wallet: {name} ({} words)", seed.word_count()));
        console.print(&format!("Your seed phrase: {}", seed.as_str()));
        console.print("");
        console.print(&format!(
            "This screen will clear in {} seconds. Press any key to clear immediately.",
            self.clear_after.as_secs()
        ));

        match console.wait_for_key(self.clear_after) {
            Ok(interrupted) => debug!("Clearing revealed seed phrase, interrupted: {interrupted}"),
            Err(e) => {
                warn!("Could not wait for a key press: {e}");
                console.pause(self.clear_after);
            }
        }
        console.clear_screen()
    }
}

#[cfg(test)]
mod tests {
    use zeroize::Zeroizing;

    use super::*;

    /// A console without a keyboard: the key wait always fails.
    #[derive(Debug, Default)]
    struct Detached {
        printed: Vec<String>,
        pauses: Vec<Duration>,
        clears: usize,
    }

    impl Console for Detached {
        fn read_password(&mut self, _prompt: &str) -> io::Result<Zeroizing<String>> {
            Err(io::ErrorKind::UnexpectedEof.into())
        }

        fn read_line(&mut self, _prompt: &str) -> io::Result<String> {
            Err(io::ErrorKind::UnexpectedEof.into())
        }

        fn print(&mut self, text: &str) {
            self.printed.push(text.to_string());
        }

        fn print_inline(&mut self, _text: &str) {}

        fn pause(&mut self, duration: Duration) {
            self.pauses.push(duration);
        }

        fn wait_for_key(&mut self, _timeout: Duration) -> io::Result<bool> {
            Err(io::Error::other("not a terminal"))
        }

        fn clear_screen(&mut self) -> io::Result<()> {
            self.clears += 1;
            Ok(())
        }
    }

    #[test]
    fn default_delay_is_five_seconds() {
        let policy = RevealPolicy::default();

        assert_eq!(Duration::from_secs(5), policy.delay());
        assert_eq!(Duration::from_secs(30), policy.clear_after);
    }

    #[test]
    fn follows_command_line() {
        let args = Args {
            reveal_delay: 2,
            clear_after: 7,
            ..Args::default()
        };

        let policy = RevealPolicy::from(&args);

        assert_eq!(Duration::from_secs(2), policy.delay());
        assert_eq!(Duration::from_secs(7), policy.clear_after);
    }

    #[test]
    fn immediate_has_no_delay() {
        assert_eq!(Duration::ZERO, RevealPolicy::immediate().delay());
    }

    #[test]
    fn failed_key_wait_still_clears_after_timeout() {
        let seed = SeedPhrase::parse(
            "abandon ability able about above absent absorb abstract absurd abuse access accident",
        )
        .unwrap();
        let policy = RevealPolicy {
            ticks: 0,
            ..RevealPolicy::default()
        };
        let mut console = Detached::default();

        policy.reveal(&mut console, "cold-1", &seed).unwrap();

        assert!(console.printed.iter().any(|line| line.contains("abandon")));
        assert_eq!(vec![Duration::from_secs(30)], console.pauses);
        assert_eq!(1, console.clears);
    }
}
