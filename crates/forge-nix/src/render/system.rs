use std::collections::BTreeSet;

use forge_model::{Bootloader, ConfigModel, ServiceEntry, UserProfile};

use super::{Lines, Renderer, shell_program};
use crate::channel::state_version;
use crate::value::{format_list, format_value, quote};

const LAYOUT_OPTION: &str = "services.xserver.layout";

/// Shells that need no `programs.<shell>.enable` line.
const IMPLICIT_SHELLS: [&str; 2] = ["bash", "sh"];

impl Renderer<'_> {
    /// Renders `configuration.nix`.
    pub fn system(&self, model: &ConfigModel) -> String {
        let mut l = Lines::new();
        l.line("{ config, pkgs, inputs, ... }:");
        l.blank();
        l.block("{", "}", |l| {
            l.region(|l| self.system_region(l, model));
            l.blank();
            l.line(format!(
                "system.stateVersion = {};",
                quote(state_version(&model.nix_version))
            ));
        });
        l.finish()
    }

    fn system_region(&self, l: &mut Lines, model: &ConfigModel) {
        let system = &model.system;

        l.block("imports = [", "];", |l| {
            l.line("./hardware-configuration.nix");
            if let Some(preset) = &system.hardware_preset {
                l.line(format!("inputs.nixos-hardware.nixosModules.{preset}"));
            }
        });
        l.blank();

        match system.bootloader {
            Bootloader::SystemdBoot => {
                l.line("boot.loader.systemd-boot.enable = true;");
            }
            Bootloader::Grub => {
                l.line("boot.loader.grub.enable = true;");
                l.line("boot.loader.grub.device = \"/dev/sda\";");
            }
        }
        l.line("boot.loader.efi.canTouchEfiVariables = true;");
        l.blank();

        l.line(format!("networking.hostName = {};", quote(&system.hostname)));
        l.line(format!("time.timeZone = {};", quote(&system.timezone)));
        l.line(format!("i18n.defaultLocale = {};", quote(&system.locale)));
        l.line(format!(
            "{} = {};",
            self.renames.option_path(LAYOUT_OPTION),
            quote(&system.keyboard_layout)
        ));
        l.blank();

        l.line(format!(
            "nix.settings.experimental-features = {};",
            format_list(&system.experimental_features)
        ));
        l.line("nixpkgs.config.allowUnfree = true;");

        if system.swap_size > 0 {
            l.blank();
            l.block("swapDevices = [ {", "} ];", |l| {
                l.line("device = \"/var/lib/swapfile\";");
                l.line(format!("size = {};", u64::from(system.swap_size) * 1024));
            });
        }

        let users = distinct_users(&model.users);
        for user in &users {
            l.blank();
            render_user(l, user);
        }

        let shells: BTreeSet<&str> = users
            .iter()
            .filter_map(|u| shell_program(&u.shell))
            .filter(|s| !IMPLICIT_SHELLS.contains(s))
            .collect();
        if !shells.is_empty() {
            l.blank();
            for shell in shells {
                l.line(format!("programs.{shell}.enable = true;"));
            }
        }

        l.blank();
        l.block("environment.systemPackages = with pkgs; [", "];", |l| {
            for package in &system.system_packages {
                l.line(self.renames.package(&package.name));
            }
        });

        for service in system.services.iter().filter(|s| s.enabled) {
            l.blank();
            self.render_service(l, service);
        }
    }

    fn render_service(&self, l: &mut Lines, service: &ServiceEntry) {
        let name = self.renames.service(&service.name);
        if service.options.is_empty() {
            l.line(format!("{name}.enable = true;"));
            return;
        }
        l.block(format!("{name} = {{"), "};", |l| {
            l.line("enable = true;");
            for (key, value) in &service.options {
                let key = self.renames.option(&service.name, key);
                l.line(format!("{key} = {};", format_value(value)));
            }
        });
    }
}

/// First declaration of each username wins.
fn distinct_users(users: &[UserProfile]) -> Vec<&UserProfile> {
    let mut seen = BTreeSet::new();
    users
        .iter()
        .filter(|u| seen.insert(u.username.as_str()))
        .collect()
}

fn render_user(l: &mut Lines, user: &UserProfile) {
    l.block(format!("users.users.{} = {{", user.username), "};", |l| {
        l.line("isNormalUser = true;");
        l.line(format!("description = {};", quote(&user.description)));
        l.line(format!("extraGroups = {};", format_list(&user.extra_groups)));
        l.line(format!("shell = {};", user.shell));
        if let Some(hash) = &user.hashed_password {
            l.line(format!("hashedPassword = {};", quote(hash)));
        }
    });
}
