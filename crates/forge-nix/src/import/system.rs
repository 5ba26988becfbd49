use std::sync::LazyLock;

use forge_model::{Bootloader, ConfigModel, ServiceEntry};
use regex::Regex;

use super::{Importer, Line, assigned, claim_user, list_opening, region_lines};
use crate::value::{parse_list, parse_value, unquote};

static HARDWARE_PRESET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"inputs\.nixos-hardware\.nixosModules\.([A-Za-z0-9_-]+)")
        .expect("Invalid hardware preset regex")
});

static USER_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^users\.users\.([A-Za-z0-9_-]+)\s*=\s*\{$").expect("Invalid user block regex")
});

static SERVICE_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(services\.[A-Za-z0-9_.-]+)\s*=\s*\{$").expect("Invalid service block regex")
});

static ENABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_.-]+)\s*=\s*true$").expect("Invalid enable regex")
});

static OPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z0-9_."-]+)\s*=\s*(.+)$"#).expect("Invalid option assignment regex")
});

/// Smallest swap `size` (MiB) read back as a GiB count.
const MIN_SWAP_MIB: u64 = 1024;

/// A recognized top-level statement shape.
#[derive(Debug, Clone, PartialEq)]
enum Statement<'a> {
    Hostname(String),
    TimeZone(String),
    Locale(String),
    KeyboardLayout(String),
    HardwarePreset(&'a str),
    ExperimentalFeatures(Vec<String>),
    SwapSize(u32),
    UserStart(&'a str),
    ServiceStart(&'a str),
    PackagesStart,
    ServiceEnable(&'a str),
    Bootloader(Bootloader),
    BlockEnd,
    Ignored,
}

/// Where the fold currently is.
#[derive(Debug)]
enum Context {
    TopLevel,
    Packages,
    /// `index` is `None` for a repeated block whose fields are discarded.
    User { index: Option<usize>, depth: usize },
    Service { index: usize, depth: usize },
}

fn classify(clean: &str) -> Statement<'_> {
    let string_of = |key: &str| assigned(clean, key).and_then(unquote);

    if let Some(v) = string_of("networking.hostName") {
        return Statement::Hostname(v);
    }
    if let Some(v) = string_of("time.timeZone") {
        return Statement::TimeZone(v);
    }
    if let Some(v) = string_of("i18n.defaultLocale") {
        return Statement::Locale(v);
    }
    if let Some(v) =
        string_of("services.xserver.xkb.layout").or_else(|| string_of("services.xserver.layout"))
    {
        return Statement::KeyboardLayout(v);
    }
    if let Some(caps) = HARDWARE_PRESET_REGEX.captures(clean)
        && let Some(preset) = caps.get(1)
    {
        return Statement::HardwarePreset(preset.as_str());
    }
    if let Some(features) =
        assigned(clean, "nix.settings.experimental-features").and_then(parse_list)
    {
        return Statement::ExperimentalFeatures(features);
    }
    if let Some(mib) = assigned(clean, "size").and_then(|v| v.parse::<u64>().ok()) {
        return if mib >= MIN_SWAP_MIB {
            let gib = (mib + MIN_SWAP_MIB / 2) / MIN_SWAP_MIB;
            Statement::SwapSize(u32::try_from(gib).unwrap_or(u32::MAX))
        } else {
            Statement::Ignored
        };
    }
    if let Some(caps) = USER_START_REGEX.captures(clean)
        && let Some(name) = caps.get(1)
    {
        return Statement::UserStart(name.as_str());
    }
    if let Some(caps) = SERVICE_START_REGEX.captures(clean)
        && let Some(name) = caps.get(1)
    {
        return Statement::ServiceStart(name.as_str());
    }
    if clean.starts_with("environment.systemPackages") {
        return Statement::PackagesStart;
    }
    if let Some(caps) = ENABLE_REGEX.captures(clean)
        && let Some(key) = caps.get(1)
    {
        return match key.as_str() {
            "boot.loader.systemd-boot.enable" => Statement::Bootloader(Bootloader::SystemdBoot),
            "boot.loader.grub.enable" => Statement::Bootloader(Bootloader::Grub),
            key => match key.strip_suffix(".enable") {
                Some(service) if service.starts_with("services.") => {
                    Statement::ServiceEnable(service)
                }
                _ => Statement::Ignored,
            },
        };
    }
    if clean.starts_with('}') {
        return Statement::BlockEnd;
    }
    Statement::Ignored
}

impl Importer<'_> {
    /// Folds the managed region of a `configuration.nix` into `model`.
    ///
    /// Users seen for the first time are appended, or replace the untouched
    /// placeholder user. A username declared twice keeps its first block.
    pub fn system(&self, text: &str, mut model: ConfigModel) -> ConfigModel {
        let mut context = Context::TopLevel;
        let mut seen_users: Vec<String> = Vec::new();

        for line in region_lines(text) {
            context = match context {
                Context::Packages => self.packages_line(&mut model, line),
                Context::User { index, depth } => user_line(&mut model, index, depth, line),
                Context::Service { index, depth } => service_line(&mut model, index, depth, line),
                Context::TopLevel => self.top_level_line(&mut model, &mut seen_users, line),
            };
        }
        model
    }

    fn packages_line(&self, model: &mut ConfigModel, line: Line<'_>) -> Context {
        match line.raw.split_once(']') {
            Some((inside, _)) => {
                self.collect_packages(&mut model.system.system_packages, inside);
                Context::TopLevel
            }
            None => {
                self.collect_packages(&mut model.system.system_packages, line.raw);
                Context::Packages
            }
        }
    }

    fn top_level_line(
        &self,
        model: &mut ConfigModel,
        seen_users: &mut Vec<String>,
        line: Line<'_>,
    ) -> Context {
        let system = &mut model.system;
        match classify(line.clean) {
            Statement::Hostname(v) => system.hostname = v,
            Statement::TimeZone(v) => system.timezone = v,
            Statement::Locale(v) => system.locale = v,
            Statement::KeyboardLayout(v) => system.keyboard_layout = v,
            Statement::HardwarePreset(preset) => system.hardware_preset = Some(preset.to_string()),
            Statement::ExperimentalFeatures(features) => system.experimental_features = features,
            Statement::SwapSize(gib) => system.swap_size = gib,
            Statement::Bootloader(bootloader) => system.bootloader = bootloader,
            Statement::ServiceEnable(name) => {
                let index = service_index(model, name);
                model.system.services[index].enabled = true;
            }
            Statement::ServiceStart(name) => {
                let index = service_index(model, name);
                return Context::Service { index, depth: 0 };
            }
            Statement::PackagesStart => {
                let (inside, closed) = list_opening(line.raw);
                self.collect_packages(&mut model.system.system_packages, inside);
                if !closed {
                    return Context::Packages;
                }
            }
            Statement::UserStart(name) => {
                if seen_users.iter().any(|seen| seen == name) {
                    tracing::debug!(user = name, "Ignoring repeated user block");
                    return Context::User {
                        index: None,
                        depth: 0,
                    };
                }
                seen_users.push(name.to_string());
                let index = claim_user(model, name, self.default_username);
                return Context::User {
                    index: Some(index),
                    depth: 0,
                };
            }
            Statement::BlockEnd | Statement::Ignored => {}
        }
        Context::TopLevel
    }
}

/// Index of the service called `name`, appending a disabled entry if new.
fn service_index(model: &mut ConfigModel, name: &str) -> usize {
    let services = &mut model.system.services;
    if let Some(index) = services.iter().position(|s| s.name == name) {
        return index;
    }
    services.push(ServiceEntry {
        enabled: false,
        ..ServiceEntry::enabled(name)
    });
    services.len() - 1
}

fn user_line(model: &mut ConfigModel, index: Option<usize>, depth: usize, line: Line<'_>) -> Context {
    let clean = line.clean;
    if clean.starts_with('}') {
        return match depth {
            0 => Context::TopLevel,
            _ => Context::User {
                index,
                depth: depth - 1,
            },
        };
    }
    if clean.ends_with('{') {
        return Context::User {
            index,
            depth: depth + 1,
        };
    }

    if depth == 0
        && let Some(user) = index.and_then(|i| model.users.get_mut(i))
    {
        if let Some(description) = assigned(clean, "description").and_then(unquote) {
            user.description = description;
        } else if let Some(hash) = assigned(clean, "hashedPassword")
            .or_else(|| assigned(clean, "initialPassword"))
            .and_then(unquote)
        {
            user.hashed_password = Some(hash);
        } else if let Some(groups) = assigned(clean, "extraGroups").and_then(parse_list) {
            user.extra_groups = groups;
        } else if let Some(shell) = assigned(clean, "shell") {
            user.shell = shell.to_string();
        }
    }
    Context::User { index, depth }
}

fn service_line(model: &mut ConfigModel, index: usize, depth: usize, line: Line<'_>) -> Context {
    let clean = line.clean;
    if clean.starts_with('}') {
        return match depth {
            0 => Context::TopLevel,
            _ => Context::Service {
                index,
                depth: depth - 1,
            },
        };
    }
    if clean.ends_with('{') {
        return Context::Service {
            index,
            depth: depth + 1,
        };
    }

    if depth == 0
        && let Some(service) = model.system.services.get_mut(index)
        && let Some(caps) = OPTION_REGEX.captures(clean)
    {
        let key = &caps[1];
        let raw = &caps[2];
        if key == "enable" {
            service.enabled = raw.trim() == "true";
        } else {
            match parse_value(raw) {
                Some(value) => {
                    service.options.insert(key.to_string(), value);
                }
                None => {
                    tracing::debug!(service = %service.name, key, raw, "Skipping non-literal option");
                }
            }
        }
    }
    Context::Service { index, depth }
}
