//! NixForge CLI
//!
//! Edits the NixForge configuration model and keeps the generated Nix files
//! in sync with it.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, PackageAction, ServiceAction, SourceAction};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init()?;
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} NixOS configuration manager", "nixforge".green().bold());
        println!();
        println!("Run {} for available commands.", "nixforge --help".cyan());
        return Ok(());
    };

    let ctx = Context::resolve(cli.dir)?;
    execute_command(&ctx, command)
}

fn execute_command(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Status { json } => commands::run_status(ctx, json),
        Commands::Render { kind } => commands::run_render(ctx, kind.into()),
        Commands::Sync { dry_run, json } => commands::run_sync(ctx, dry_run, json),
        Commands::Check { json } => commands::run_check(ctx, json),
        Commands::Import => commands::run_import(ctx),
        Commands::ScanOptions { file, prefix, json } => {
            commands::run_scan_options(&file, &prefix, json)
        }
        Commands::Package { action } => match action {
            PackageAction::Add { name, user } => {
                commands::run_package_add(ctx, &name, user.as_deref())
            }
            PackageAction::Remove { name, user } => {
                commands::run_package_remove(ctx, &name, user.as_deref())
            }
        },
        Commands::Service { action } => match action {
            ServiceAction::Toggle { name } => commands::run_service_toggle(ctx, &name),
            ServiceAction::Set { name, key, value } => {
                commands::run_service_set(ctx, &name, &key, &value)
            }
            ServiceAction::Unset { name, key } => commands::run_service_unset(ctx, &name, &key),
        },
        Commands::Source { action } => match action {
            SourceAction::Add { name, url } => commands::run_source_add(ctx, &name, &url),
            SourceAction::Remove { name } => commands::run_source_remove(ctx, &name),
        },
    }
}
