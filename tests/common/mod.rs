#![allow(dead_code)]

pub mod logging;
pub mod scripted_console;

use std::path::Path;

use scripted_console::ScriptedConsole;
use soss::session::RevealPolicy;
use soss::session::SessionFlow;
use soss::wallet::index_store::INDEX_FILE_NAME;
use soss::wallet::SeedVault;
use soss::wallet::WalletIndexStore;

pub const COLD_WORDS: &str =
    "abandon ability able about above absent absorb abstract absurd abuse access accident";

/// A session on `dir` that answers prompts from `answers`, in order.
pub fn session(dir: &Path, answers: &[&str]) -> SessionFlow<ScriptedConsole> {
    session_with(dir, ScriptedConsole::new(answers.iter().copied()))
}

pub fn session_with(dir: &Path, console: ScriptedConsole) -> SessionFlow<ScriptedConsole> {
    SessionFlow::new(
        console,
        SeedVault::new(dir),
        index_store(dir),
        RevealPolicy::default(),
    )
}

pub fn index_store(dir: &Path) -> WalletIndexStore {
    WalletIndexStore::new(dir.join(INDEX_FILE_NAME))
}
