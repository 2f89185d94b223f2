use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use directories::ProjectDirs;

use crate::wallet::index_store::INDEX_FILE_NAME;
use crate::wallet::SeedVault;
use crate::wallet::WalletIndexStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirectory {
    data_dir: PathBuf,
}

impl DataDirectory {
    ///////////////////////////////////////////////////////////////////////////
    ///
    /// The directory that holds the wallet index and the vault files
    ///
    /// An explicit `root_dir` is used as is. The default varies by operating
    /// system, e.g.
    ///
    /// - Linux:   /home/alice/.local/share/soss
    /// - Windows: C:\Users\Alice\AppData\Roaming\soss\soss\data
    /// - macOS:   /Users/Alice/Library/Application Support/org.soss.soss
    pub fn get(root_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match root_dir {
            Some(dir) => dir,
            None => ProjectDirs::from("org", "soss", "soss")
                .context("Could not determine data directory")?
                .data_dir()
                .to_path_buf(),
        };

        Ok(DataDirectory { data_dir })
    }

    /// Create directory if it does not exist
    pub fn create_dir_if_not_exists(dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.to_string_lossy()))
    }

    /// The root data directory path
    pub fn root_dir_path(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// The wallet index file path
    pub fn index_file_path(&self) -> PathBuf {
        self.data_dir.join(Path::new(INDEX_FILE_NAME))
    }

    /// Ensure the directory exists, then hand out the stores rooted in it.
    pub fn open_stores(&self) -> Result<(WalletIndexStore, SeedVault)> {
        Self::create_dir_if_not_exists(&self.data_dir)?;
        Ok((
            WalletIndexStore::new(self.index_file_path()),
            SeedVault::new(self.root_dir_path()),
        ))
    }
}

impl std::fmt::Display for DataDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data_dir.display())
    }
}
