//! Managed-region text → model updates.
//!
//! The importer is a line classifier, not a Nix parser. Each non-comment
//! line of the managed region is matched against a fixed set of statement
//! shapes, with a small context stack for package lists, user blocks and
//! service blocks. Anything unrecognized is ignored, and a file without a
//! managed region leaves the model untouched.

mod home;
mod manifest;
mod system;

use forge_blocks::locate;
use forge_model::{ConfigModel, DEFAULT_USERNAME, PackageRef, Renames, ops::add_package};

/// Text → model transformation, the inverse of [`crate::Renderer`] over the
/// managed region.
#[derive(Debug, Clone, Copy)]
pub struct Importer<'a> {
    renames: &'a Renames,
    default_username: &'a str,
}

impl Default for Importer<'static> {
    fn default() -> Self {
        Self::new(Renames::builtin())
    }
}

impl<'a> Importer<'a> {
    pub fn new(renames: &'a Renames) -> Self {
        Self {
            renames,
            default_username: DEFAULT_USERNAME,
        }
    }

    /// Username treated as the replaceable placeholder user.
    pub fn with_default_username(self, default_username: &'a str) -> Self {
        Self {
            default_username,
            ..self
        }
    }

    /// Normalizes and appends every package token on a list line.
    fn collect_packages(&self, packages: &mut Vec<PackageRef>, text: &str) {
        for token in package_tokens(text) {
            let name = self.renames.package(token);
            if add_package(packages, PackageRef::new(name, "Imported")) {
                tracing::trace!(package = token, "Imported package");
            }
        }
    }
}

/// A trimmed region line and its form without the trailing `;`.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    raw: &'a str,
    clean: &'a str,
}

/// Non-empty, non-comment lines of the managed region in `text`.
///
/// Yields nothing when `text` has no managed region.
fn region_lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    locate(text)
        .map(|region| region.body())
        .unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|raw| !raw.is_empty() && !raw.starts_with('#') && !raw.starts_with("/*"))
        .map(|raw| Line {
            raw,
            clean: raw.strip_suffix(';').unwrap_or(raw).trim_end(),
        })
}

/// Right-hand side of `key = value` when the line assigns exactly `key`.
fn assigned<'l>(line: &'l str, key: &str) -> Option<&'l str> {
    let rest = line.strip_prefix(key)?.trim_start();
    Some(rest.strip_prefix('=')?.trim())
}

/// Package identifiers on a list line, stopping at a comment.
fn package_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .take_while(|t| !t.starts_with('#'))
        .filter(|t| !matches!(*t, "with" | "pkgs;" | "[" | "]" | "];"))
        .map(|t| t.trim_end_matches(';').trim_end_matches(']').trim_start_matches('['))
        .filter(|t| !t.is_empty())
}

/// Packages after the opening `[` of a list statement, and whether the list
/// closed on the same line.
fn list_opening(raw: &str) -> (&str, bool) {
    let Some((_, after)) = raw.split_once('[') else {
        return ("", false);
    };
    match after.split_once(']') {
        Some((inside, _)) => (inside, true),
        None => (after, false),
    }
}

/// Ensures a user named `name` exists, reusing the untouched placeholder.
///
/// Returns the user's index.
fn claim_user(model: &mut ConfigModel, name: &str, placeholder: &str) -> usize {
    if let Some(index) = model.users.iter().position(|u| u.username == name) {
        return index;
    }
    if let [only] = model.users.as_mut_slice()
        && only.username == placeholder
    {
        tracing::debug!(from = placeholder, to = name, "Replacing placeholder user");
        only.username = name.to_string();
        only.description = name.to_string();
        return 0;
    }
    model.users.push(forge_model::UserProfile::new(name));
    model.users.len() - 1
}
