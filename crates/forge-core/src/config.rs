//! Engine configuration read from `forge.toml`
//!
//! Every key is optional; a missing file yields [`ForgeConfig::default`].

use forge_fs::{ConfigStore, NormalizedPath, Storage};
use forge_model::{DEFAULT_USERNAME, Renames};
use serde::{Deserialize, Serialize};

use crate::Result;

/// File name of the engine configuration inside the project directory.
pub const CONFIG_FILE: &str = "forge.toml";

fn default_snapshot_file() -> String {
    "metadata.json".to_string()
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

fn default_true() -> bool {
    true
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Snapshot file name; its extension picks the format.
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,

    /// Placeholder username the importer may replace.
    #[serde(default = "default_username")]
    pub default_username: String,

    /// Merge `flake.nix` instead of rewriting it.
    ///
    /// The flake outputs embed the hostname and primary user outside the
    /// managed region, so a merged flake can go stale when either changes.
    #[serde(default)]
    pub preserve_manifest_edits: bool,

    /// Write `hardware-configuration.nix` when the model carries one.
    #[serde(default = "default_true")]
    pub write_hardware_config: bool,

    /// Entries layered over the built-in rename tables.
    #[serde(default)]
    pub renames: Renames,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            snapshot_file: default_snapshot_file(),
            default_username: default_username(),
            preserve_manifest_edits: false,
            write_hardware_config: true,
            renames: Renames::default(),
        }
    }
}

impl ForgeConfig {
    /// Load `forge.toml` from `root`, or defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(storage: &impl Storage, root: &NormalizedPath) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !storage.exists(&path) {
            tracing::debug!(path = %path, "No engine configuration, using defaults");
            return Ok(Self::default());
        }
        let config = ConfigStore::new().load(storage, &path)?;
        tracing::debug!(path = %path, "Loaded engine configuration");
        Ok(config)
    }
}
