use std::sync::LazyLock;

use forge_model::{ConfigModel, SourceInput};
use regex::Regex;

use super::{Importer, region_lines};
use crate::channel::channel_from_url;

static INPUT_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([a-zA-Z0-9_-]+)\.url\s*=\s*"(.*)"$"#).expect("Invalid input url regex")
});

/// Inputs the manifest always manages itself.
const BUILTIN_INPUTS: [&str; 2] = ["home-manager", "nixos-hardware"];

impl Importer<'_> {
    /// Folds the managed region of a `flake.nix` into `model`.
    ///
    /// The nixpkgs URL sets the channel. Every other non-builtin input
    /// replaces the model's source list, in declaration order.
    pub fn manifest(&self, text: &str, mut model: ConfigModel) -> ConfigModel {
        let mut sources: Vec<SourceInput> = Vec::new();
        let mut found_region = false;

        for line in region_lines(text) {
            found_region = true;
            let Some(caps) = INPUT_URL_REGEX.captures(line.clean) else {
                continue;
            };
            let (name, url) = (&caps[1], &caps[2]);
            match name {
                "nixpkgs" => model.nix_version = channel_from_url(url),
                name if BUILTIN_INPUTS.contains(&name) => {}
                name => {
                    if !sources.iter().any(|s| s.name == name) {
                        sources.push(SourceInput {
                            name: name.to_string(),
                            url: url.to_string(),
                        });
                    }
                }
            }
        }

        if found_region {
            model.sources = sources;
        }
        model
    }
}
