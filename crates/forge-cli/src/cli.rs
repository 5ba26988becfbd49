//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use forge_nix::FileKind;

/// NixForge - Manage a NixOS flake configuration from a structured model
#[derive(Parser, Debug)]
#[command(name = "nixforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration directory (defaults to ~/.nixforge)
    #[arg(short, long, global = true, env = "NIXFORGE_DIR")]
    pub dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the model summary and file health
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the generated content of one file
    Render {
        /// Which file to render
        #[arg(value_enum)]
        kind: RenderKind,
    },

    /// Write the Nix files and snapshot
    Sync {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },

    /// Check the Nix files for drift from the model
    Check {
        /// Output as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the snapshot from the Nix files, ignoring the current snapshot
    Import,

    /// List option declarations found in a Nix module
    ///
    /// Examples:
    ///   nixforge scan-options openssh.nix --prefix services.openssh
    ScanOptions {
        /// Nix module source file
        file: PathBuf,

        /// Prefix joined to every option name
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Add or remove packages
    Package {
        #[command(subcommand)]
        action: PackageAction,
    },

    /// Enable, disable and configure services
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },

    /// Manage extra flake inputs
    Source {
        #[command(subcommand)]
        action: SourceAction,
    },
}

/// Package actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PackageAction {
    /// Add a package to the system, or to a user's home
    Add {
        name: String,

        /// Add to this user's home packages instead
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Remove a package
    Remove {
        name: String,

        #[arg(short, long)]
        user: Option<String>,
    },
}

/// Service actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ServiceAction {
    /// Flip a service on or off, adding it when unknown
    ///
    /// Examples:
    ///   nixforge service toggle services.printing
    Toggle { name: String },

    /// Set a service option to a Nix literal
    ///
    /// Values are read as Nix literals (`true`, `22`, `"text"`, `[ "a" ]`);
    /// anything else is stored as a string.
    Set {
        name: String,
        key: String,
        value: String,
    },

    /// Remove a service option
    Unset { name: String, key: String },
}

/// Source actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SourceAction {
    /// Add a flake input
    Add { name: String, url: String },

    /// Remove a flake input
    Remove { name: String },
}

/// Files that can be rendered
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// flake.nix
    Manifest,
    /// configuration.nix
    System,
    /// home.nix
    Home,
}

impl From<RenderKind> for FileKind {
    fn from(kind: RenderKind) -> Self {
        match kind {
            RenderKind::Manifest => FileKind::Manifest,
            RenderKind::System => FileKind::System,
            RenderKind::Home => FileKind::Home,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_add_for_user() {
        let cli = Cli::parse_from(["nixforge", "package", "add", "ripgrep", "--user", "alice"]);
        assert_eq!(
            cli.command,
            Some(Commands::Package {
                action: PackageAction::Add {
                    name: "ripgrep".into(),
                    user: Some("alice".into()),
                }
            })
        );
    }

    #[test]
    fn test_parse_global_dir_after_subcommand() {
        let cli = Cli::parse_from(["nixforge", "sync", "--dry-run", "--dir", "/tmp/cfg"]);
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/cfg")));
        assert_eq!(
            cli.command,
            Some(Commands::Sync {
                dry_run: true,
                json: false
            })
        );
    }

    #[test]
    fn test_parse_render_kind() {
        let cli = Cli::parse_from(["nixforge", "render", "home"]);
        assert_eq!(
            cli.command,
            Some(Commands::Render {
                kind: RenderKind::Home
            })
        );
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
