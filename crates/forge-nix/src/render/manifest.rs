use forge_model::ConfigModel;

use super::{Lines, Renderer};
use crate::channel::{home_manager_branch, nixpkgs_branch};
use crate::value::quote;

impl Renderer<'_> {
    /// Renders `flake.nix`.
    ///
    /// Only the input declarations sit inside the managed region; the outputs
    /// are derived from the hostname and primary user.
    pub fn manifest(&self, model: &ConfigModel) -> String {
        let hostname = &model.system.hostname;
        let primary = model
            .users
            .first()
            .map(|u| u.username.as_str())
            .unwrap_or("user");

        let mut l = Lines::new();
        l.block("{", "}", |l| {
            l.line(format!(
                "description = {};",
                quote(&format!("NixOS configuration for {hostname}"))
            ));
            l.blank();
            l.block("inputs = {", "};", |l| {
                l.region(|l| self.manifest_inputs(l, model));
            });
            l.blank();
            l.block(
                "outputs = { self, nixpkgs, home-manager, ... }@inputs: {",
                "};",
                |l| {
                    l.block(
                        format!("nixosConfigurations.{hostname} = nixpkgs.lib.nixosSystem {{"),
                        "};",
                        |l| {
                            l.line("specialArgs = { inherit inputs; };");
                            l.block("modules = [", "];", |l| {
                                l.line("./configuration.nix");
                                l.line("home-manager.nixosModules.home-manager");
                                l.block("{", "}", |l| {
                                    l.line("home-manager.useGlobalPkgs = true;");
                                    l.line("home-manager.useUserPackages = true;");
                                    l.line(format!(
                                        "home-manager.users.{primary} = import ./home.nix;"
                                    ));
                                });
                            });
                        },
                    );
                },
            );
        });
        l.finish()
    }

    fn manifest_inputs(&self, l: &mut Lines, model: &ConfigModel) {
        let version = &model.nix_version;
        l.line(format!(
            "nixpkgs.url = {};",
            quote(&format!("github:nixos/nixpkgs/{}", nixpkgs_branch(version)))
        ));
        l.line(format!(
            "home-manager.url = {};",
            quote(&format!(
                "github:nix-community/home-manager/{}",
                home_manager_branch(version)
            ))
        ));
        l.line("home-manager.inputs.nixpkgs.follows = \"nixpkgs\";");
        if model.system.hardware_preset.is_some() {
            l.line("nixos-hardware.url = \"github:NixOS/nixos-hardware/master\";");
        }
        for source in &model.sources {
            l.line(format!("{}.url = {};", source.name, quote(&source.url)));
            l.line(format!("{}.inputs.nixpkgs.follows = \"nixpkgs\";", source.name));
        }
    }
}
