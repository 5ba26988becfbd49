//! Configuration directory resolution

use std::path::PathBuf;

use forge_core::SyncEngine;
use forge_fs::{LocalStorage, NormalizedPath};

use crate::error::{CliError, Result};

/// Directory name under the home directory used when `--dir` is absent.
const DEFAULT_DIR: &str = ".nixforge";

/// Where the CLI reads and writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub root: NormalizedPath,
}

impl Context {
    /// Use `dir` when given, `~/.nixforge` otherwise.
    pub fn resolve(dir: Option<PathBuf>) -> Result<Self> {
        let path = match dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .map(|home| home.join(DEFAULT_DIR))
                .ok_or_else(|| CliError::user("Cannot determine home directory; pass --dir"))?,
        };
        tracing::debug!(path = %path.display(), "Using configuration directory");
        Ok(Self {
            root: NormalizedPath::new(path),
        })
    }

    /// Open a sync engine on the local filesystem.
    pub fn engine(&self) -> Result<SyncEngine<LocalStorage>> {
        Ok(SyncEngine::open(LocalStorage::new(), self.root.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let ctx = Context::resolve(Some(PathBuf::from("/srv/forge"))).unwrap();
        assert_eq!(ctx.root.as_str(), "/srv/forge");
    }
}
