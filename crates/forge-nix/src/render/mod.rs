//! Canonical Nix text for each managed file.
//!
//! Every renderer wraps its generated statements in a managed region so
//! [`forge_blocks::merge`] can later splice fresh output into a user-edited
//! file. Region contents are what the importer reads back; anything placed
//! outside the region (state versions, the flake outputs) is derived data.

mod home;
mod manifest;
mod system;

use std::fmt;

use forge_blocks::{BEGIN_MARKER, END_MARKER};
use forge_model::{ConfigModel, DEFAULT_USERNAME, Renames, UserProfile};

const REGION_NOTICE: &str =
    "# Managed by NixForge. Edits inside this section are replaced on the next sync.";

/// The files NixForge generates from a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKind {
    /// `flake.nix`
    Manifest,
    /// `configuration.nix`
    System,
    /// `home.nix` of the primary user
    Home,
}

impl FileKind {
    pub const ALL: [FileKind; 3] = [FileKind::Manifest, FileKind::System, FileKind::Home];

    /// Default file name inside the configuration directory.
    pub fn file_name(self) -> &'static str {
        match self {
            FileKind::Manifest => "flake.nix",
            FileKind::System => "configuration.nix",
            FileKind::Home => "home.nix",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileKind::Manifest => "manifest",
            FileKind::System => "system",
            FileKind::Home => "home",
        })
    }
}

/// Pure model → text transformation.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    renames: &'a Renames,
}

impl Default for Renderer<'static> {
    fn default() -> Self {
        Self::new(Renames::builtin())
    }
}

impl<'a> Renderer<'a> {
    pub fn new(renames: &'a Renames) -> Self {
        Self { renames }
    }

    /// Renders one file kind. The home file is rendered for the first user.
    pub fn render(&self, kind: FileKind, model: &ConfigModel) -> String {
        match kind {
            FileKind::Manifest => self.manifest(model),
            FileKind::System => self.system(model),
            FileKind::Home => match model.users.first() {
                Some(user) => self.home(user, &model.nix_version),
                None => self.home(&UserProfile::new(DEFAULT_USERNAME), &model.nix_version),
            },
        }
    }
}

/// Indented line buffer used by the renderers.
struct Lines {
    out: String,
    depth: usize,
}

impl Lines {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str("  ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// Writes `open`, runs `body` one level deeper, then writes `close`.
    fn block(&mut self, open: impl AsRef<str>, close: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(open);
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.line(close)
    }

    /// Writes the managed region around `body` at the current depth.
    fn region(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(BEGIN_MARKER);
        self.line(REGION_NOTICE);
        body(self);
        self.line(END_MARKER)
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Program name for a shell expression: `pkgs.zsh` → `zsh`,
/// `${pkgs.fish}/bin/fish` → `fish`.
pub(crate) fn shell_program(shell: &str) -> Option<&str> {
    let tail = shell.rsplit('.').next()?;
    let name = tail.rsplit('/').next()?;
    (!name.is_empty()).then_some(name)
}
