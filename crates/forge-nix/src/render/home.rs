use forge_model::UserProfile;

use super::{Lines, Renderer, shell_program};
use crate::channel::state_version;
use crate::value::quote;

impl Renderer<'_> {
    /// Renders `home.nix` for one user.
    pub fn home(&self, user: &UserProfile, nix_version: &str) -> String {
        let mut l = Lines::new();
        l.line("{ config, pkgs, ... }:");
        l.blank();
        l.block("{", "}", |l| {
            l.region(|l| self.home_region(l, user));
            l.blank();
            l.line(format!(
                "home.stateVersion = {};",
                quote(state_version(nix_version))
            ));
        });
        l.finish()
    }

    fn home_region(&self, l: &mut Lines, user: &UserProfile) {
        l.line(format!("home.username = {};", quote(&user.username)));
        l.line(format!(
            "home.homeDirectory = {};",
            quote(&format!("/home/{}", user.username))
        ));
        l.blank();

        l.block("home.packages = with pkgs; [", "];", |l| {
            for package in &user.packages {
                l.line(self.renames.package(&package.name));
            }
        });
        l.blank();

        if user.git_name.is_some() || user.git_email.is_some() {
            l.block("programs.git = {", "};", |l| {
                l.line("enable = true;");
                if let Some(name) = &user.git_name {
                    l.line(format!("userName = {};", quote(name)));
                }
                if let Some(email) = &user.git_email {
                    l.line(format!("userEmail = {};", quote(email)));
                }
            });
        } else {
            l.line("programs.git.enable = true;");
        }

        let shell = shell_program(&user.shell).unwrap_or("bash");
        l.line(format!("programs.{shell}.enable = true;"));
    }
}
