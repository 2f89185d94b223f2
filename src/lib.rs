//! Secure Offline Seed Storage.
//!
//! Keeps cryptocurrency seed phrases encrypted at rest, one password
//! protected file per wallet, plus an encrypted index that maps wallet names
//! to those files.

pub mod config_models;
pub mod encryption;
pub mod error;
pub mod session;
pub mod wallet;

use anyhow::Result;
use tracing::info;

use crate::config_models::cli_args::Args;
use crate::config_models::data_directory::DataDirectory;
use crate::session::RevealPolicy;
use crate::session::SessionFlow;
use crate::session::TerminalConsole;

/// Run an interactive session on the terminal until the user exits.
pub fn initialize(args: Args) -> Result<()> {
    let data_directory = DataDirectory::get(args.data_dir.clone())?;
    info!("Using data directory {data_directory}");

    let (index_store, vault) = data_directory.open_stores()?;
    let mut flow = SessionFlow::new(
        TerminalConsole::new(),
        vault,
        index_store,
        RevealPolicy::from(&args),
    );
    let index = flow.run();
    info!("Session ended with {} wallets in the index", index.len());

    Ok(())
}
