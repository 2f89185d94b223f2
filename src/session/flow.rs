use std::io;
use std::path::Path;
use std::path::PathBuf;

use strum::IntoEnumIterator;
use tracing::debug;
use tracing::info;
use tracing::warn;
use zeroize::Zeroizing;

use super::console::Console;
use super::reveal::RevealPolicy;
use super::state::MenuChoice;
use super::state::SessionEvent;
use super::state::SessionState;
use crate::error::StorageError;
use crate::error::ValidationError;
use crate::wallet::MasterPassword;
use crate::wallet::PasswordPolicy;
use crate::wallet::SaveOutcome;
use crate::wallet::SeedPhrase;
use crate::wallet::SeedVault;
use crate::wallet::WalletIndex;
use crate::wallet::WalletIndexStore;
use crate::wallet::WalletRecord;

/// Runs the interactive menu on top of the vault and the index store.
///
/// The wallet index is not owned by the flow. It is handed to each
/// operation and saved explicitly after every change.
#[derive(Debug)]
pub struct SessionFlow<C> {
    console: C,
    vault: SeedVault,
    index_store: WalletIndexStore,
    password_policy: PasswordPolicy,
    reveal: RevealPolicy,
    state: SessionState,
}

impl<C: Console> SessionFlow<C> {
    pub fn new(
        console: C,
        vault: SeedVault,
        index_store: WalletIndexStore,
        reveal: RevealPolicy,
    ) -> Self {
        Self {
            console,
            vault,
            index_store,
            password_policy: PasswordPolicy::default(),
            reveal,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Show the banner, load the index and serve the menu until the session
    /// terminates. Returns the final in-memory index.
    pub fn run(&mut self) -> WalletIndex {
        self.print_banner();
        let mut index = self.open_index();
        while !self.state.is_terminated() {
            self.step(&mut index);
        }
        index
    }

    pub fn print_banner(&mut self) {
        let c = &mut self.console;
        c.print("");
        c.print(&format!(
            "######## *** SOSS v{} *** ########",
            env!("CARGO_PKG_VERSION")
        ));
        c.print("Secure Offline Seed Storage");
        c.print("Your crypto seed phrases, securely encrypted and stored offline.");
        c.print("######## ------------------- ########");
        c.print("");
    }

    /// Load the index, asking for the master password only if an index file
    /// exists.
    ///
    /// Never fails: if the index cannot be read the session continues with
    /// an empty one and the file is left alone.
    pub fn open_index(&mut self) -> WalletIndex {
        let console = &mut self.console;
        let (index, failure) = self
            .index_store
            .load_or_empty(|| console.read_password("Enter master password to access wallets: "));

        if let Some(error) = failure {
            let message = match error {
                StorageError::Integrity(_) => "Invalid password or corrupted data file.".to_string(),
                e => format!("Error loading wallet index: {e}"),
            };
            self.console.print(&message);
        }
        index
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self, index: &mut WalletIndex) -> SessionState {
        let outcome = match self.state {
            SessionState::Idle => {
                let event = self.read_menu();
                let next = self.state.next(&event);
                match (&event, next) {
                    (SessionEvent::MenuInput(_), SessionState::Idle) => {
                        self.console.print("Invalid choice. Please try again.");
                    }
                    (_, SessionState::Terminated) => self.print_farewell(),
                    _ => {}
                }
                self.state = next;
                return next;
            }
            SessionState::CreateWallet => self.create_wallet(index).map(|_| ()),
            SessionState::AccessWallet => self.access_wallet(index),
            SessionState::ListWallets => {
                self.list_wallets(index);
                Ok(())
            }
            SessionState::Terminated => return self.state,
        };

        if let Err(error) = outcome {
            self.report(&error);
        }
        self.state = self.state.next(&SessionEvent::OperationFinished);
        self.state
    }

    fn read_menu(&mut self) -> SessionEvent {
        let c = &mut self.console;
        c.print("");
        c.print("########## ********* ##########");
        c.print("");
        c.print("Secure Offline Seed Storage - Main Menu");
        c.print("");
        for choice in MenuChoice::iter() {
            c.print(&choice.to_string());
        }
        c.print("");
        c.print("########## ********* ##########");

        match c.read_line("\nEnter your choice (1-4): ") {
            Ok(line) => SessionEvent::MenuInput(line),
            Err(e) => {
                debug!("Menu input ended: {e}");
                SessionEvent::EndOfInput
            }
        }
    }

    fn print_farewell(&mut self) {
        let c = &mut self.console;
        c.print("");
        c.print("**********************************************************");
        c.print("Exiting SOSS. Your crypto, your keys, your responsibility.");
        c.print("**********************************************************");
    }

    fn report(&mut self, error: &StorageError) {
        let message = match error {
            StorageError::Integrity(_) => "Wrong passphrase or corrupted data.".to_string(),
            StorageError::UserCancelled => "Operation cancelled.".to_string(),
            StorageError::Prompt(_) => "Input ended. Returning to the main menu.".to_string(),
            StorageError::Screen(_) => {
                "Could not clear the screen. Clear or close this terminal now.".to_string()
            }
            StorageError::Validation(e) => e.to_string(),
            e => format!("Error: {e}"),
        };
        match error {
            StorageError::UserCancelled | StorageError::Validation(_) => {
                debug!("Operation ended: {error}")
            }
            _ => warn!("Operation failed: {error}"),
        }
        self.console.print(&message);
    }

    /// Ask for a name, a seed phrase and a new wallet password, write the
    /// vault file and record it in the index.
    ///
    /// Returns the vault file path.
    pub fn create_wallet(&mut self, index: &mut WalletIndex) -> Result<PathBuf, StorageError> {
        let name = self.prompt_wallet_name(index)?;
        let seed = self.prompt_seed_phrase()?;
        let password = prompt_new_password(
            &mut self.console,
            &self.password_policy,
            "Enter new passphrase: ",
            "Confirm passphrase: ",
        )
        .map_err(StorageError::Prompt)?;

        let path = self.vault_target(index, &name);
        self.vault.store_at(&path, &name, &seed, &password)?;
        index.insert(name.as_str(), WalletRecord::new(path.clone(), seed.word_count()));
        info!("Created wallet '{name}'");

        self.save_index(index);

        self.console.print("");
        self.console.print(&format!(
            "Seed encrypted and saved as '{}' locally.",
            path.display()
        ));
        self.console.print("Move this file to your flash drive when ready!");
        Ok(path)
    }

    fn prompt_wallet_name(&mut self, index: &WalletIndex) -> Result<String, StorageError> {
        loop {
            let name = self
                .console
                .read_line("Enter a name for this wallet: ")
                .map_err(StorageError::Prompt)?
                .trim()
                .to_string();

            if name.is_empty() {
                self.console.print(&ValidationError::EmptyName.to_string());
                continue;
            }

            if index.contains(&name)
                && !self.confirm(&format!("Wallet '{name}' already exists. Overwrite? (y/n): "))?
            {
                self.console
                    .print(&ValidationError::NameDeclined(name).to_string());
                continue;
            }

            return Ok(name);
        }
    }

    /// Where to write the vault file for `name`.
    ///
    /// An existing wallet keeps its file if that lives in the vault
    /// directory. Otherwise the first file name that neither exists nor
    /// belongs to another record is used, so no other wallet's file is ever
    /// replaced.
    fn vault_target(&mut self, index: &WalletIndex, name: &str) -> PathBuf {
        if let Some(record) = index.get(name) {
            if record.file.parent() == Some(self.vault.dir()) {
                return record.file.clone();
            }
        }

        let path = self
            .vault
            .free_path(name, |path| index.owner_of(path).is_some());
        let preferred = self.vault.vault_path(name);
        if path != preferred {
            info!(
                "{} is taken, storing wallet '{name}' at {}",
                preferred.display(),
                path.display()
            );
            self.console.print(&format!(
                "File '{}' is already in use. Saving as '{}' instead.",
                preferred.display(),
                path.display()
            ));
        }
        path
    }

    fn prompt_seed_phrase(&mut self) -> Result<SeedPhrase, StorageError> {
        loop {
            let input = Zeroizing::new(
                self.console
                    .read_line("Enter your 12, 18, or 24-word seed phrase, separated by spaces: ")
                    .map_err(StorageError::Prompt)?,
            );

            match SeedPhrase::parse(&input) {
                Ok(seed) => return Ok(seed),
                Err(e) => self.console.print(&format!("Error: {e}")),
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool, StorageError> {
        let answer = self
            .console
            .read_line(question)
            .map_err(StorageError::Prompt)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }

    /// Persist the index, asking for the master password.
    ///
    /// Failures are reported and leave the in-memory index intact so that a
    /// later save can still succeed.
    pub fn save_index(&mut self, index: &mut WalletIndex) -> Option<SaveOutcome> {
        let console = &mut self.console;
        let policy = self.password_policy;

        let result = self.index_store.save(index, |kind| match kind {
            MasterPassword::Create => {
                console.print("");
                console.print("You need to create a master password to protect your wallet index.");
                console.print("This password will be used to access your list of wallets.");
                prompt_new_password(
                    console,
                    &policy,
                    "Enter new passphrase: ",
                    "Confirm passphrase: ",
                )
            }
            MasterPassword::Existing => {
                console.read_password("Enter master password to update wallet index: ")
            }
        });

        match result {
            Ok(SaveOutcome::Skipped) => Some(SaveOutcome::Skipped),
            Ok(outcome) => {
                if let SaveOutcome::Updated { merged } = outcome {
                    if merged > 0 {
                        self.console.print(&format!(
                            "Restored {merged} wallet(s) from the index file that were not loaded."
                        ));
                    }
                }
                self.console.print("");
                self.console.print("Wallet index updated successfully.");
                Some(outcome)
            }
            Err(StorageError::Integrity(_)) => {
                warn!("Master password did not open the existing wallet index");
                self.console.print(
                    "Master password does not match the existing wallet index. Wallet index not saved.",
                );
                None
            }
            Err(e) => {
                warn!("Saving the wallet index failed: {e}");
                self.console.print(&format!("Error saving wallet index: {e}"));
                None
            }
        }
    }

    /// Select a wallet, decrypt its vault file and reveal the seed phrase.
    pub fn access_wallet(&mut self, index: &mut WalletIndex) -> Result<(), StorageError> {
        if index.is_empty() {
            self.console
                .print("No wallets found. Please create a wallet first.");
            return Ok(());
        }

        self.console.print("");
        self.console.print("Available wallets:");
        for (position, (name, record)) in index.iter().enumerate() {
            self.console.print(&format!(
                "{}. {name} ({} words) - Created: {}",
                position + 1,
                record.word_count,
                record.created.format("%Y-%m-%d %H:%M:%S")
            ));
        }

        let name = self.prompt_selection(index)?;
        let file = self.locate_vault_file(index, &name)?;

        let password = self
            .console
            .read_password(&format!("Enter passphrase for '{name}': "))
            .map_err(StorageError::Prompt)?;
        let seed = SeedVault::retrieve(&file, &password)?;
        info!("Revealing wallet '{name}'");

        self.reveal
            .reveal(&mut self.console, &name, &seed)
            .map_err(StorageError::Screen)
    }

    fn prompt_selection(&mut self, index: &WalletIndex) -> Result<String, StorageError> {
        loop {
            let selection = self
                .console
                .read_line("\nEnter wallet number or name (or 'q' to quit): ")
                .map_err(StorageError::Prompt)?;

            if selection.trim().eq_ignore_ascii_case("q") {
                return Err(StorageError::UserCancelled);
            }
            match index.resolve(&selection) {
                Ok(name) => return Ok(name.to_string()),
                Err(e) => self.console.print(&e.to_string()),
            }
        }
    }

    /// The record's vault file, or a replacement path from the user if it
    /// has moved. A replacement is written to the index right away.
    fn locate_vault_file(
        &mut self,
        index: &mut WalletIndex,
        name: &str,
    ) -> Result<PathBuf, StorageError> {
        let file = index
            .get(name)
            .map(|record| record.file.clone())
            .ok_or(ValidationError::UnknownSelection)?;
        if file.exists() {
            return Ok(file);
        }

        self.console
            .print(&format!("Error: File '{}' not found.", file.display()));
        let answer = self
            .console
            .read_line("Enter the correct file path (or press Enter to cancel): ")
            .map_err(StorageError::Prompt)?;
        let new_path = Path::new(answer.trim());
        if new_path.as_os_str().is_empty() || !new_path.exists() {
            return Err(StorageError::UserCancelled);
        }

        info!(
            "Relocated wallet '{name}' from {} to {}",
            file.display(),
            new_path.display()
        );
        index.relocate(name, new_path);
        self.save_index(index);
        Ok(new_path.to_path_buf())
    }

    /// Print every wallet in the index. Never touches the disk.
    pub fn list_wallets(&mut self, index: &WalletIndex) {
        if index.is_empty() {
            self.console.print("No wallets found.");
            return;
        }

        self.console.print("");
        self.console.print("Saved wallets:");
        for (name, record) in index.iter() {
            self.console
                .print(&format!("- {name} ({} words)", record.word_count));
            self.console
                .print(&format!("  File: {}", record.file.display()));
            self.console.print(&format!(
                "  Created: {}",
                record.created.format("%Y-%m-%d %H:%M:%S")
            ));
            self.console.print("");
        }
    }
}

/// Ask for a new password until it satisfies `policy` and is entered the
/// same way twice.
pub fn prompt_new_password(
    console: &mut dyn Console,
    policy: &PasswordPolicy,
    prompt: &str,
    confirm_prompt: &str,
) -> io::Result<Zeroizing<String>> {
    loop {
        let password = console.read_password(prompt)?;

        if let Err(e) = policy.validate(&password) {
            console.print(&e.to_string());
            continue;
        }

        let confirm = console.read_password(confirm_prompt)?;
        if password != confirm {
            console.print(&ValidationError::PasswordMismatch.to_string());
            continue;
        }

        return Ok(password);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use super::*;

    /// Answers every password prompt from a queue; nothing else is used.
    #[derive(Debug, Default)]
    struct Passwords {
        answers: VecDeque<&'static str>,
        printed: Vec<String>,
    }

    impl Console for Passwords {
        fn read_password(&mut self, _prompt: &str) -> io::Result<Zeroizing<String>> {
            self.answers
                .pop_front()
                .map(|s| Zeroizing::new(s.to_string()))
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
        }

        fn read_line(&mut self, prompt: &str) -> io::Result<String> {
            unreachable!("unexpected line prompt {prompt}")
        }

        fn print(&mut self, text: &str) {
            self.printed.push(text.to_string());
        }

        fn print_inline(&mut self, _text: &str) {}

        fn pause(&mut self, _duration: Duration) {}

        fn wait_for_key(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(false)
        }

        fn clear_screen(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn new_password(answers: &[&'static str]) -> (io::Result<Zeroizing<String>>, Vec<String>) {
        let mut console = Passwords {
            answers: answers.iter().copied().collect(),
            ..Default::default()
        };
        let result = prompt_new_password(
            &mut console,
            &PasswordPolicy::default(),
            "new: ",
            "confirm: ",
        );
        (result, console.printed)
    }

    #[test]
    fn weak_password_reprompts() {
        let (result, printed) = new_password(&["short1A", "Passw0rd", "Passw0rd"]);

        assert_eq!("Passw0rd", result.unwrap().as_str());
        assert_eq!(vec![ValidationError::WeakPassword.to_string()], printed);
    }

    #[test]
    fn mismatch_starts_over() {
        let (result, printed) =
            new_password(&["Passw0rd1", "Passw0rd2", "Passw0rd3", "Passw0rd3"]);

        assert_eq!("Passw0rd3", result.unwrap().as_str());
        assert_eq!(vec![ValidationError::PasswordMismatch.to_string()], printed);
    }

    #[test]
    fn end_of_input_aborts() {
        let (result, _) = new_password(&["Passw0rd1"]);

        assert_eq!(
            io::ErrorKind::UnexpectedEof,
            result.unwrap_err().kind()
        );
    }
}
