use forge_core::{CheckStatus, Drift, ForgeConfig, LoadSource, SyncEngine, SyncOptions};
use forge_fs::{LocalStorage, MemoryStorage, NormalizedPath, Storage};
use forge_model::{ConfigModel, PackageRef, ServiceEntry};
use forge_nix::{FileKind, Renderer};
use pretty_assertions::assert_eq;
use rstest::rstest;

const ROOT: &str = "/etc/nixforge";

fn root() -> NormalizedPath {
    NormalizedPath::new(ROOT)
}

fn file(name: &str) -> NormalizedPath {
    root().join(name)
}

fn engine(storage: MemoryStorage) -> SyncEngine<MemoryStorage> {
    SyncEngine::open(storage, root()).unwrap()
}

#[test]
fn test_first_sync_writes_everything() {
    let mut engine = engine(MemoryStorage::new());
    let model = engine.load().unwrap().model;

    let report = engine.sync(&model, SyncOptions::default()).unwrap();

    assert!(report.success);
    assert_eq!(report.actions.len(), 4);
    let paths: Vec<String> = engine
        .storage()
        .paths()
        .iter()
        .map(|p| p.as_str().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            format!("{ROOT}/configuration.nix"),
            format!("{ROOT}/flake.nix"),
            format!("{ROOT}/home.nix"),
            format!("{ROOT}/metadata.json"),
        ]
    );
}

#[test]
fn test_second_sync_is_a_no_op() {
    let mut engine = engine(MemoryStorage::new());
    let model = engine.load().unwrap().model;
    engine.sync(&model, SyncOptions::default()).unwrap();
    let writes = engine.storage().write_count();

    let report = engine.sync(&model, SyncOptions::default()).unwrap();

    assert!(report.actions.is_empty());
    assert_eq!(engine.storage().write_count(), writes);
    assert_eq!(engine.check(&model).unwrap().status, CheckStatus::Healthy);
}

#[test]
fn test_dry_run_writes_nothing() {
    let mut engine = engine(MemoryStorage::new());
    let model = engine.load().unwrap().model;

    let report = engine
        .sync(&model, SyncOptions { dry_run: true })
        .unwrap();

    assert_eq!(engine.storage().write_count(), 0);
    assert_eq!(report.actions.len(), 4);
    assert!(report.actions.iter().all(|a| a.starts_with("[dry-run] Would")));
}

#[test]
fn test_load_prefers_snapshot() {
    let mut model = ConfigModel::default();
    model.system.hostname = "from-snapshot".into();
    let snapshot = serde_json::to_string_pretty(&model).unwrap();
    let system = Renderer::default().system(&ConfigModel::default());
    let storage = MemoryStorage::new()
        .with_file(file("metadata.json"), snapshot)
        .with_file(file("configuration.nix"), system);

    let loaded = engine(storage).load().unwrap();

    assert_eq!(loaded.source, LoadSource::Snapshot);
    assert_eq!(loaded.model.system.hostname, "from-snapshot");
}

#[test]
fn test_corrupt_snapshot_falls_back_to_import() {
    let mut model = ConfigModel::default();
    model.system.hostname = "from-nix".into();
    let storage = MemoryStorage::new()
        .with_file(file("metadata.json"), "{ not json")
        .with_file(file("configuration.nix"), Renderer::default().system(&model));
    let mut engine = engine(storage);

    let loaded = engine.load().unwrap();

    assert_eq!(loaded.source, LoadSource::Imported);
    assert_eq!(loaded.model.system.hostname, "from-nix");
    assert_eq!(engine.check(&loaded.model).unwrap().status, CheckStatus::Broken);
}

#[test]
fn test_load_defaults_when_empty() {
    let loaded = engine(MemoryStorage::new()).load().unwrap();
    assert_eq!(loaded.source, LoadSource::Defaults);
    assert_eq!(loaded.model, ConfigModel::default());
}

#[test]
fn test_import_reads_hardware_verbatim() {
    let hardware = "{ ... }: { fileSystems.\"/\".device = \"/dev/sda1\"; }\n";
    let storage = MemoryStorage::new()
        .with_file(file("home.nix"), Renderer::default().render(FileKind::Home, &ConfigModel::default()))
        .with_file(file("hardware-configuration.nix"), hardware);

    let loaded = engine(storage).load().unwrap();

    assert_eq!(loaded.source, LoadSource::Imported);
    assert_eq!(loaded.model.system.hardware_config.as_deref(), Some(hardware));
}

#[test]
fn test_regenerated_hardware_file_survives_snapshot_load() {
    let mut model = ConfigModel::default();
    model.system.hardware_config = Some("# old hardware\n".into());
    let regenerated = "# regenerated by nixos-generate-config\n";
    let storage = MemoryStorage::new()
        .with_file(file("metadata.json"), serde_json::to_string_pretty(&model).unwrap())
        .with_file(file("hardware-configuration.nix"), regenerated);
    let mut engine = engine(storage);

    let loaded = engine.load().unwrap();
    assert_eq!(loaded.source, LoadSource::Snapshot);
    assert_eq!(loaded.model.system.hardware_config.as_deref(), Some(regenerated));

    let report = engine.sync(&loaded.model, SyncOptions::default()).unwrap();

    assert!(report.success);
    assert_eq!(
        engine.storage().get(&file("hardware-configuration.nix")).as_deref(),
        Some(regenerated)
    );
}

#[test]
fn test_blank_hardware_file_keeps_snapshot_copy() {
    let mut model = ConfigModel::default();
    model.system.hardware_config = Some("# snapshot hardware\n".into());
    let storage = MemoryStorage::new()
        .with_file(file("metadata.json"), serde_json::to_string_pretty(&model).unwrap())
        .with_file(file("hardware-configuration.nix"), "  \n");

    let loaded = engine(storage).load().unwrap();

    assert_eq!(
        loaded.model.system.hardware_config.as_deref(),
        Some("# snapshot hardware\n")
    );
}

#[test]
fn test_user_edits_outside_region_survive_sync() {
    let mut engine = engine(MemoryStorage::new());
    let mut model = engine.load().unwrap().model;
    engine.sync(&model, SyncOptions::default()).unwrap();

    let path = engine.path(FileKind::System);
    let edited = engine
        .storage()
        .get(&path)
        .unwrap()
        .replace("{\n  # --- BEGIN", "{\n  services.tailscale.enable = true;\n\n  # --- BEGIN");
    engine.storage().write_text(&path, &edited).unwrap();

    model.add_system_package(PackageRef::new("htop", ""));
    engine.sync(&model, SyncOptions::default()).unwrap();

    let text = engine.storage().get(&path).unwrap();
    assert!(text.contains("services.tailscale.enable = true;"));
    assert!(text.contains("    htop\n"));
    assert_eq!(engine.check(&model).unwrap().status, CheckStatus::Healthy);
}

#[test]
fn test_check_reports_missing_and_drifted() {
    let mut engine = engine(MemoryStorage::new());
    let mut model = engine.load().unwrap().model;

    assert_eq!(engine.check(&model).unwrap().status, CheckStatus::Missing);

    engine.sync(&model, SyncOptions::default()).unwrap();
    model.toggle_service(ServiceEntry::enabled("services.printing"));

    let report = engine.check(&model).unwrap();
    assert_eq!(report.status, CheckStatus::Drifted);
    let issues: Vec<(&str, &Drift)> = report.issues().collect();
    assert_eq!(issues.len(), 1);
    assert!(issues[0].0.ends_with("configuration.nix"));
    assert_eq!(issues[0].1, &Drift::RegionDiffers);
    assert_eq!(report.count(CheckStatus::Healthy), 2);
}

#[rstest]
#[case(false, false)]
#[case(true, true)]
fn test_manifest_edit_policy(#[case] preserve: bool, #[case] kept: bool) {
    let config = ForgeConfig {
        preserve_manifest_edits: preserve,
        ..ForgeConfig::default()
    };
    let mut engine = SyncEngine::with_config(MemoryStorage::new(), root(), config);
    let model = ConfigModel::default();
    engine.sync(&model, SyncOptions::default()).unwrap();

    let path = engine.path(FileKind::Manifest);
    let edited = format!("# pinned by hand\n{}", engine.storage().get(&path).unwrap());
    engine.storage().write_text(&path, &edited).unwrap();

    let mut changed = model.clone();
    changed.system.hostname = "renamed".into();
    engine.sync(&changed, SyncOptions::default()).unwrap();

    let text = engine.storage().get(&path).unwrap();
    assert_eq!(text.starts_with("# pinned by hand\n"), kept);
}

#[test]
fn test_hardware_config_written_when_enabled() {
    let mut model = ConfigModel::default();
    model.system.hardware_config = Some("{ ... }: { }\n".into());

    let mut enabled = engine(MemoryStorage::new());
    enabled.sync(&model, SyncOptions::default()).unwrap();
    assert_eq!(
        enabled.storage().get(&file("hardware-configuration.nix")).as_deref(),
        Some("{ ... }: { }\n")
    );

    let config = ForgeConfig {
        write_hardware_config: false,
        ..ForgeConfig::default()
    };
    let mut disabled = SyncEngine::with_config(MemoryStorage::new(), root(), config);
    disabled.sync(&model, SyncOptions::default()).unwrap();
    assert!(!disabled.storage().exists(&file("hardware-configuration.nix")));
}

#[test]
fn test_save_snapshot_skips_unchanged() {
    let mut engine = engine(MemoryStorage::new());
    let mut model = engine.load().unwrap().model;

    assert!(engine.save_snapshot(&model).unwrap());
    assert!(!engine.save_snapshot(&model).unwrap());

    model.system.timezone = "Europe/Berlin".into();
    assert!(engine.save_snapshot(&model).unwrap());
}

#[test]
fn test_loaded_snapshot_is_not_rewritten() {
    let snapshot = serde_json::to_string_pretty(&ConfigModel::default()).unwrap();
    let mut engine = engine(MemoryStorage::new().with_file(file("metadata.json"), snapshot));
    let model = engine.load().unwrap().model;

    assert!(!engine.save_snapshot(&model).unwrap());
    assert_eq!(engine.storage().write_count(), 0);
}

#[test]
fn test_sync_rejects_invalid_model() {
    let mut engine = engine(MemoryStorage::new());
    let mut model = ConfigModel::default();
    model.users.clear();
    assert!(engine.sync(&model, SyncOptions::default()).is_err());
}

#[test]
fn test_forge_toml_renames_apply() {
    let storage = MemoryStorage::new().with_file(
        file("forge.toml"),
        "[renames.packages]\nexa = \"eza\"\n",
    );
    let mut engine = engine(storage);
    let mut model = ConfigModel::default();
    model.add_system_package(PackageRef::new("exa", ""));

    engine.sync(&model, SyncOptions::default()).unwrap();

    let text = engine.storage().get(&engine.path(FileKind::System)).unwrap();
    assert!(text.contains("    eza\n"));
}

#[test]
fn test_local_storage_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let root = NormalizedPath::new(dir.path());
    let mut engine = SyncEngine::open(LocalStorage::new(), root.clone()).unwrap();
    let mut model = engine.load().unwrap().model;
    model.system.hostname = "disk-host".into();

    let report = engine.sync(&model, SyncOptions::default()).unwrap();
    assert!(report.success, "{:?}", report.errors);
    assert!(dir.path().join("flake.nix").is_file());

    std::fs::remove_file(dir.path().join("metadata.json")).unwrap();
    let mut reopened = SyncEngine::open(LocalStorage::new(), root).unwrap();
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded.source, LoadSource::Imported);
    assert_eq!(loaded.model.system.hostname, "disk-host");
}
