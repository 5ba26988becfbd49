//! Configuration model types and their defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::option::OptionMetadata;
use crate::value::NixValue;

/// Username of the placeholder user created with the default model.
pub const DEFAULT_USERNAME: &str = "nixuser";

/// Root aggregate of everything NixForge manages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigModel {
    /// Channel identifier, e.g. `nixos-unstable` or `nixos-24.05`.
    pub nix_version: String,
    /// Extra flake inputs declared by the user.
    #[serde(rename = "flakeInputs", default)]
    pub sources: Vec<SourceInput>,
    pub system: SystemProfile,
    pub users: Vec<UserProfile>,
}

/// An external flake input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInput {
    pub name: String,
    pub url: String,
}

/// Supported boot loaders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bootloader {
    #[default]
    #[serde(rename = "systemd-boot")]
    SystemdBoot,
    #[serde(rename = "grub")]
    Grub,
}

/// Machine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemProfile {
    pub hostname: String,
    pub timezone: String,
    pub locale: String,
    pub keyboard_layout: String,
    #[serde(default)]
    pub experimental_features: Vec<String>,
    #[serde(default)]
    pub bootloader: Bootloader,
    /// Swap file size in GiB, `0` disables swap.
    #[serde(default)]
    pub swap_size: u32,
    /// nixos-hardware module name.
    #[serde(rename = "hardwareProfile", default, deserialize_with = "empty_as_none")]
    pub hardware_preset: Option<String>,
    /// Raw `hardware-configuration.nix`, passed through untouched.
    #[serde(rename = "hardwareConfigContent", default, deserialize_with = "empty_as_none")]
    pub hardware_config: Option<String>,
    #[serde(default)]
    pub system_packages: Vec<PackageRef>,
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
}

/// A user account and its home-manager settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub description: String,
    /// Shell expression, e.g. `pkgs.zsh`.
    pub shell: String,
    #[serde(default)]
    pub extra_groups: Vec<String>,
    #[serde(default)]
    pub packages: Vec<PackageRef>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub git_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub git_email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub hashed_password: Option<String>,
}

/// A package reference. Only `name` carries identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRef {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A toggleable NixOS service and its option overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    /// Full option path, e.g. `services.openssh`.
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub options: BTreeMap<String, NixValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cached option hints; never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_options: Option<Vec<OptionMetadata>>,
}

impl PackageRef {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl ServiceEntry {
    /// An enabled service without option overrides.
    pub fn enabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            options: BTreeMap::new(),
            description: None,
            known_options: None,
        }
    }

    /// Builder-style option assignment.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<NixValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

impl UserProfile {
    /// A normal user with a bash shell and no extras.
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            description: username.clone(),
            username,
            shell: "pkgs.bash".to_string(),
            extra_groups: Vec::new(),
            packages: Vec::new(),
            git_name: None,
            git_email: None,
            hashed_password: None,
        }
    }
}

impl Default for SystemProfile {
    fn default() -> Self {
        Self {
            hostname: "nixos-machine".to_string(),
            timezone: "UTC".to_string(),
            locale: "en_US.UTF-8".to_string(),
            keyboard_layout: "us".to_string(),
            experimental_features: vec!["nix-command".to_string(), "flakes".to_string()],
            bootloader: Bootloader::SystemdBoot,
            swap_size: 0,
            hardware_preset: None,
            hardware_config: None,
            system_packages: vec![
                PackageRef::new("vim", "The ubiquitous text editor"),
                PackageRef::new("git", "Distributed version control system"),
                PackageRef::new(
                    "wget",
                    "Tool for retrieving files using HTTP, HTTPS, and FTP",
                ),
            ],
            services: vec![ServiceEntry {
                description: Some("Secure Shell daemon".to_string()),
                ..ServiceEntry::enabled("services.openssh")
                    .with_option("settings.PasswordAuthentication", false)
                    .with_option("settings.PermitRootLogin", "no")
            }],
        }
    }
}

impl Default for ConfigModel {
    fn default() -> Self {
        Self {
            nix_version: "nixos-unstable".to_string(),
            sources: Vec::new(),
            system: SystemProfile::default(),
            users: vec![UserProfile {
                description: "Primary User".to_string(),
                extra_groups: vec!["networkmanager".to_string(), "wheel".to_string()],
                ..UserProfile::new(DEFAULT_USERNAME)
            }],
        }
    }
}

/// Older snapshots store absent optionals as empty strings.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
