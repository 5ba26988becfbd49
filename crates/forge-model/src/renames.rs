//! Identifier migrations applied at render and import time.
//!
//! NixOS renames packages, services and options between releases. The tables
//! map deprecated identifiers to current ones and are plain data: hosts can
//! layer their own entries over [`Renames::builtin`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Namespace prefix stripped from package names.
const PACKAGE_PREFIX: &str = "pkgs.";

static BUILTIN: LazyLock<Renames> = LazyLock::new(|| {
    let packages = [
        ("noto-fonts-cjk", "noto-fonts-cjk-sans"),
        ("noto-fonts-emoji", "noto-fonts-color-emoji"),
        ("nerdfonts", "nerd-fonts.symbols-only"),
        ("nerd-fonts", "nerd-fonts.symbols-only"),
    ];
    let services = [
        (
            "services.xserver.desktopManager.gnome",
            "services.desktopManager.gnome",
        ),
        (
            "services.xserver.displayManager.gdm",
            "services.displayManager.gdm",
        ),
        (
            "services.xserver.desktopManager.plasma5",
            "services.desktopManager.plasma5",
        ),
        (
            "services.xserver.displayManager.sddm",
            "services.displayManager.sddm",
        ),
        (
            "services.xserver.desktopManager.plasma6",
            "services.desktopManager.plasma6",
        ),
    ];
    let options = [("services.xserver.layout", "services.xserver.xkb.layout")];

    Renames {
        packages: to_table(&packages),
        services: to_table(&services),
        options: to_table(&options),
    }
});

fn to_table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
        .collect()
}

/// Deprecated-to-current identifier tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Renames {
    /// Package attribute names, without the `pkgs.` prefix.
    pub packages: BTreeMap<String, String>,
    /// Service option paths.
    pub services: BTreeMap<String, String>,
    /// Full option paths.
    pub options: BTreeMap<String, String>,
}

impl Renames {
    /// The tables shipped with NixForge.
    pub fn builtin() -> &'static Renames {
        &BUILTIN
    }

    /// Built-in tables with `overrides` layered on top.
    pub fn with_overrides(overrides: &Renames) -> Renames {
        let mut renames = BUILTIN.clone();
        renames.extend(overrides);
        renames
    }

    /// Adds or replaces entries from `other`.
    pub fn extend(&mut self, other: &Renames) {
        self.packages
            .extend(other.packages.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.services
            .extend(other.services.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.options
            .extend(other.options.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Normalizes a package name: strips `pkgs.` and applies the table.
    pub fn package(&self, name: &str) -> String {
        let bare = name.strip_prefix(PACKAGE_PREFIX).unwrap_or(name);
        self.packages
            .get(bare)
            .cloned()
            .unwrap_or_else(|| bare.to_string())
    }

    /// Current option path of a service.
    pub fn service<'a>(&'a self, name: &'a str) -> &'a str {
        self.services.get(name).map_or(name, String::as_str)
    }

    /// Current form of a full option path.
    pub fn option_path<'a>(&'a self, path: &'a str) -> &'a str {
        self.options.get(path).map_or(path, String::as_str)
    }

    /// Current sub-key for option `key` of `service`.
    ///
    /// Renames are looked up by full option path. A renamed path that no
    /// longer lives under the service (old or new name) keeps the old key,
    /// since it cannot be expressed inside the service block.
    pub fn option(&self, service: &str, key: &str) -> String {
        let full = format!("{service}.{key}");
        let Some(renamed) = self.options.get(&full) else {
            return key.to_string();
        };

        [service, self.service(service)]
            .iter()
            .find_map(|prefix| renamed.strip_prefix(&format!("{prefix}.")))
            .map_or_else(|| key.to_string(), str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("noto-fonts-cjk", "noto-fonts-cjk-sans")]
    #[case("pkgs.noto-fonts-cjk", "noto-fonts-cjk-sans")]
    #[case("pkgs.nerdfonts", "nerd-fonts.symbols-only")]
    #[case("pkgs.firefox", "firefox")]
    #[case("ripgrep", "ripgrep")]
    fn test_package_normalization(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Renames::builtin().package(input), expected);
    }

    #[test]
    fn test_package_rename_is_idempotent() {
        let renames = Renames::builtin();
        for name in renames.packages.keys() {
            let once = renames.package(name);
            assert_eq!(renames.package(&once), once);
        }
    }

    #[test]
    fn test_service_rename() {
        let renames = Renames::builtin();
        assert_eq!(
            renames.service("services.xserver.displayManager.gdm"),
            "services.displayManager.gdm"
        );
        assert_eq!(renames.service("services.openssh"), "services.openssh");
    }

    #[test]
    fn test_option_rename_within_service() {
        let renames = Renames::builtin();
        assert_eq!(renames.option("services.xserver", "layout"), "xkb.layout");
        assert_eq!(renames.option("services.xserver", "enable"), "enable");
    }

    #[test]
    fn test_option_rename_leaving_service_keeps_key() {
        let mut overrides = Renames::default();
        overrides
            .options
            .insert("services.foo.port".into(), "networking.foo.port".into());
        let renames = Renames::with_overrides(&overrides);
        assert_eq!(renames.option("services.foo", "port"), "port");
    }

    #[test]
    fn test_overrides_layer_over_builtin() {
        let mut overrides = Renames::default();
        overrides
            .packages
            .insert("exa".into(), "eza".into());
        let renames = Renames::with_overrides(&overrides);
        assert_eq!(renames.package("exa"), "eza");
        assert_eq!(renames.package("noto-fonts-emoji"), "noto-fonts-color-emoji");
    }
}
