//! SyncEngine implementation
//!
//! The SyncEngine coordinates state between the configuration model and the
//! managed files: `configuration.nix`, `home.nix`, `flake.nix`, the verbatim
//! `hardware-configuration.nix` and the JSON snapshot.

use std::fmt;

use forge_blocks::{locate, merge};
use forge_fs::{ConfigStore, NormalizedPath, Storage, compute_content_checksum};
use forge_model::{ConfigModel, Renames};
use forge_nix::{FileKind, Importer, Renderer};
use serde::{Deserialize, Serialize};

use super::check::{CheckReport, Drift};
use crate::Result;
use crate::config::ForgeConfig;

/// Raw hardware configuration, written verbatim.
pub const HARDWARE_FILE: &str = "hardware-configuration.nix";

/// Report from a sync operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether the operation completed successfully
    pub success: bool,
    /// Actions taken during the operation
    pub actions: Vec<String>,
    /// Errors encountered during the operation
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Create a successful sync report
    pub fn success() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Add an action to the report
    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }
}

/// Options for sync operations
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// If true, simulate changes without writing anything.
    /// Actions will be prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

/// Where a loaded model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadSource {
    Snapshot,
    Imported,
    Defaults,
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadSource::Snapshot => "snapshot",
            LoadSource::Imported => "imported from Nix files",
            LoadSource::Defaults => "defaults",
        })
    }
}

/// A model together with its origin.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub model: ConfigModel,
    pub source: LoadSource,
}

/// The content a file should have after a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: NormalizedPath,
    pub content: String,
    /// Current content, `None` when the file does not exist.
    pub existing: Option<String>,
}

impl PlannedFile {
    /// Whether writing the file would change it.
    pub fn is_changed(&self) -> bool {
        self.existing.as_deref() != Some(self.content.as_str())
    }
}

/// Engine for synchronizing the model with its files
///
/// The SyncEngine provides four main operations:
/// - **load**: Obtain a model from the snapshot, the Nix files, or defaults
/// - **plan**: Compute merged content for every managed file
/// - **sync**: Write changed files and persist the snapshot
/// - **check**: Validate that the files still match the model
pub struct SyncEngine<S> {
    storage: S,
    root: NormalizedPath,
    config: ForgeConfig,
    renames: Renames,
    /// Checksum of the snapshot content last read or written.
    snapshot_checksum: Option<String>,
}

impl<S: Storage> SyncEngine<S> {
    /// Create a SyncEngine reading `forge.toml` from `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration exists but cannot be parsed.
    pub fn open(storage: S, root: NormalizedPath) -> Result<Self> {
        let config = ForgeConfig::load(&storage, &root)?;
        Ok(Self::with_config(storage, root, config))
    }

    /// Create a SyncEngine with an explicit configuration.
    pub fn with_config(storage: S, root: NormalizedPath, config: ForgeConfig) -> Self {
        let renames = Renames::with_overrides(&config.renames);
        Self {
            storage,
            root,
            config,
            renames,
            snapshot_checksum: None,
        }
    }

    /// Get the project directory
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Path of a generated Nix file
    pub fn path(&self, kind: FileKind) -> NormalizedPath {
        self.root.join(kind.file_name())
    }

    /// Get the path to the snapshot file
    pub fn snapshot_path(&self) -> NormalizedPath {
        self.root.join(&self.config.snapshot_file)
    }

    pub fn hardware_path(&self) -> NormalizedPath {
        self.root.join(HARDWARE_FILE)
    }

    /// Renderer using the configured rename tables
    pub fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.renames)
    }

    /// Importer using the configured rename tables and placeholder user
    pub fn importer(&self) -> Importer<'_> {
        Importer::new(&self.renames).with_default_username(&self.config.default_username)
    }

    /// Load the model.
    ///
    /// Prefers a readable snapshot, then falls back to importing whichever
    /// Nix files exist, then to defaults. A corrupt snapshot is logged and
    /// skipped. A non-blank hardware file on disk always replaces the
    /// snapshot's copy.
    ///
    /// # Errors
    ///
    /// Returns an error only if an existing file cannot be read.
    pub fn load(&mut self) -> Result<Loaded> {
        if let Some(mut model) = self.read_snapshot()? {
            if let Some(hardware) = self.read_hardware()? {
                model.system.hardware_config = Some(hardware);
            }
            return Ok(Loaded {
                model,
                source: LoadSource::Snapshot,
            });
        }

        let any_file = FileKind::ALL
            .iter()
            .any(|kind| self.storage.exists(&self.path(*kind)));
        if any_file {
            let model = self.import_files(ConfigModel::default())?;
            tracing::info!(root = %self.root, "Imported model from Nix files");
            return Ok(Loaded {
                model,
                source: LoadSource::Imported,
            });
        }

        tracing::info!(root = %self.root, "No snapshot or Nix files, using defaults");
        Ok(Loaded {
            model: ConfigModel::default(),
            source: LoadSource::Defaults,
        })
    }

    fn read_snapshot(&mut self) -> Result<Option<ConfigModel>> {
        let path = self.snapshot_path();
        let Some(content) = self.storage.read_optional(&path)? else {
            return Ok(None);
        };

        match ConfigStore::new().parse::<ConfigModel>(&path, &content) {
            Ok(model) => {
                tracing::info!(path = %path, "Loaded snapshot");
                self.snapshot_checksum = Some(compute_content_checksum(&content));
                Ok(Some(model))
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Ignoring unreadable snapshot");
                Ok(None)
            }
        }
    }

    /// Fold the existing Nix files into `base`.
    ///
    /// Each file is imported only if present. The hardware file is taken
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn import_files(&self, base: ConfigModel) -> Result<ConfigModel> {
        let importer = self.importer();
        let mut model = base;

        if let Some(text) = self.storage.read_optional(&self.path(FileKind::Manifest))? {
            model = importer.manifest(&text, model);
        }
        if let Some(text) = self.storage.read_optional(&self.path(FileKind::System))? {
            model = importer.system(&text, model);
        }
        if let Some(text) = self.storage.read_optional(&self.path(FileKind::Home))? {
            model = importer.home(&text, model, 0);
        }
        if let Some(hardware) = self.read_hardware()? {
            model.system.hardware_config = Some(hardware);
        }
        Ok(model)
    }

    /// The on-disk hardware file, when present and non-blank.
    ///
    /// It is regenerated outside NixForge, so the file wins over any copy
    /// held in the snapshot.
    fn read_hardware(&self) -> Result<Option<String>> {
        let text = self.storage.read_optional(&self.hardware_path())?;
        Ok(text.filter(|text| !text.trim().is_empty()))
    }

    /// Compute the content every managed file should have.
    ///
    /// The system and home files are merged with their current content so
    /// edits outside the managed region survive. The manifest is merged only
    /// when `preserve_manifest_edits` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn plan(&self, model: &ConfigModel) -> Result<Vec<PlannedFile>> {
        let renderer = self.renderer();
        let mut planned = Vec::with_capacity(FileKind::ALL.len() + 1);

        for kind in FileKind::ALL {
            let path = self.path(kind);
            let generated = renderer.render(kind, model);
            let existing = self.storage.read_optional(&path)?;

            let content = match &existing {
                Some(current) if self.merges(kind) => merge(current, &generated),
                _ => generated,
            };
            planned.push(PlannedFile {
                path,
                content,
                existing,
            });
        }

        if let Some(hardware) = self.hardware_content(model) {
            let path = self.hardware_path();
            let existing = self.storage.read_optional(&path)?;
            planned.push(PlannedFile {
                path,
                content: hardware.to_string(),
                existing,
            });
        }

        Ok(planned)
    }

    /// Synchronize the files and the snapshot with `model`.
    ///
    /// Unchanged files are not rewritten. Write failures are collected in the
    /// report rather than aborting the remaining files.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is invalid or a file cannot be read.
    pub fn sync(&mut self, model: &ConfigModel, options: SyncOptions) -> Result<SyncReport> {
        model.validate()?;
        let mut report = SyncReport::success();

        for file in self.plan(model)? {
            if !file.is_changed() {
                tracing::debug!(path = %file.path, "Unchanged");
                continue;
            }
            if options.dry_run {
                report = report.with_action(format!("[dry-run] Would write {}", file.path));
                continue;
            }
            match self.storage.write_text(&file.path, &file.content) {
                Ok(()) => {
                    tracing::info!(path = %file.path, "Wrote file");
                    report = report.with_action(format!("Wrote {}", file.path));
                }
                Err(e) => report
                    .errors
                    .push(format!("Failed to write {}: {}", file.path, e)),
            }
        }

        let snapshot = self.snapshot_path();
        if options.dry_run {
            if self.snapshot_changed(model)? {
                report = report.with_action(format!("[dry-run] Would save {snapshot}"));
            }
        } else {
            match self.save_snapshot(model) {
                Ok(true) => report = report.with_action(format!("Saved {snapshot}")),
                Ok(false) => {}
                Err(e) => report
                    .errors
                    .push(format!("Failed to save {snapshot}: {e}")),
            }
        }

        report.success = report.errors.is_empty();
        Ok(report)
    }

    /// Check the files against `model`.
    ///
    /// A file is drifted when its managed region differs from a fresh render
    /// or is absent. A manifest that is rewritten whole is compared in full.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn check(&self, model: &ConfigModel) -> Result<CheckReport> {
        let renderer = self.renderer();
        let mut report = CheckReport::default();

        for kind in FileKind::ALL {
            let path = self.path(kind);
            let drift = match self.storage.read_optional(&path)? {
                None => Some(Drift::Missing),
                Some(current) => self.file_drift(kind, &current, &renderer.render(kind, model)),
            };
            report.record(path.as_str(), drift);
        }

        if let Some(hardware) = self.hardware_content(model) {
            let path = self.hardware_path();
            let drift = match self.storage.read_optional(&path)? {
                None => Some(Drift::Missing),
                Some(current) => {
                    let expected = compute_content_checksum(hardware);
                    let actual = compute_content_checksum(&current);
                    (expected != actual).then_some(Drift::ChecksumMismatch { expected, actual })
                }
            };
            report.record(path.as_str(), drift);
        }

        let snapshot = self.snapshot_path();
        if let Some(content) = self.storage.read_optional(&snapshot)?
            && let Err(e) = ConfigStore::new().parse::<ConfigModel>(&snapshot, &content)
        {
            report.snapshot_unreadable(e.to_string());
        }

        if !report.is_healthy() {
            tracing::debug!(status = ?report.status, "Check found issues");
        }
        Ok(report)
    }

    fn file_drift(&self, kind: FileKind, current: &str, fresh: &str) -> Option<Drift> {
        if !self.merges(kind) {
            return (current != fresh).then_some(Drift::ContentDiffers);
        }
        match (locate(current), locate(fresh)) {
            (None, _) => Some(Drift::RegionMissing),
            (Some(have), Some(want)) if have.managed != want.managed => Some(Drift::RegionDiffers),
            _ => None,
        }
    }

    /// Persist the model snapshot.
    ///
    /// Skipped when the serialized snapshot matches what was last read or
    /// written. Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub fn save_snapshot(&mut self, model: &ConfigModel) -> Result<bool> {
        let path = self.snapshot_path();
        let content = ConfigStore::new().render(&path, model)?;
        let checksum = compute_content_checksum(&content);

        if self.snapshot_checksum.as_ref() == Some(&checksum) && self.storage.exists(&path) {
            tracing::debug!(path = %path, "Snapshot unchanged");
            return Ok(false);
        }

        self.storage.write_text(&path, &content)?;
        tracing::info!(path = %path, "Saved snapshot");
        self.snapshot_checksum = Some(checksum);
        Ok(true)
    }

    fn snapshot_changed(&self, model: &ConfigModel) -> Result<bool> {
        let path = self.snapshot_path();
        let content = ConfigStore::new().render(&path, model)?;
        Ok(self.snapshot_checksum.as_deref() != Some(compute_content_checksum(&content).as_str())
            || !self.storage.exists(&path))
    }

    fn merges(&self, kind: FileKind) -> bool {
        kind != FileKind::Manifest || self.config.preserve_manifest_edits
    }

    fn hardware_content<'m>(&self, model: &'m ConfigModel) -> Option<&'m str> {
        if !self.config.write_hardware_config {
            return None;
        }
        model
            .system
            .hardware_config
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}
