//! Sync, check and import command implementations

use colored::Colorize;
use forge_core::{CheckStatus, SyncOptions, SyncReport};
use forge_model::ConfigModel;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the sync command
pub fn run_sync(ctx: &Context, dry_run: bool, json: bool) -> Result<()> {
    let mut engine = ctx.engine()?;
    let model = engine.load()?.model;
    let report = engine.sync(&model, SyncOptions { dry_run })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return sync_outcome(&report);
    }

    if dry_run {
        println!("{} Dry run, nothing was written.", "=>".blue().bold());
    }

    if report.success {
        if report.actions.is_empty() {
            println!(
                "{} Already synchronized. No changes needed.",
                "OK".green().bold()
            );
        } else {
            println!("{} Synchronization complete:", "OK".green().bold());
            for action in &report.actions {
                println!("   {} {}", "+".green(), action);
            }
        }
    } else {
        println!("{} Synchronization failed:", "ERROR".red().bold());
        for error in &report.errors {
            println!("   {} {}", "!".red(), error);
        }
    }

    sync_outcome(&report)
}

fn sync_outcome(report: &SyncReport) -> Result<()> {
    if report.success {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "Sync finished with {} error(s)",
            report.errors.len()
        )))
    }
}

/// Run the check command
pub fn run_check(ctx: &Context, json: bool) -> Result<()> {
    let mut engine = ctx.engine()?;
    let model = engine.load()?.model;
    let report = engine.check(&model)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report.status {
        CheckStatus::Healthy => {
            println!("{} Files match the model.", "OK".green().bold());
        }
        CheckStatus::Missing | CheckStatus::Drifted => {
            for (path, drift) in report.issues() {
                let marker = match drift.status() {
                    CheckStatus::Missing => "-".yellow(),
                    _ => "!".red(),
                };
                println!("   {} {}: {}", marker, path.cyan(), drift);
            }
            println!();
            println!("Run {} to repair.", "nixforge sync".cyan());
        }
        CheckStatus::Broken => {
            println!("{} Snapshot is unreadable:", "BROKEN".red().bold());
            if let Some(message) = &report.snapshot_error {
                println!("   {} {}", "!".red(), message);
            }
        }
    }

    Ok(())
}

/// Run the import command
///
/// Rebuilds the model from the Nix files on top of the defaults and
/// overwrites the snapshot.
pub fn run_import(ctx: &Context) -> Result<()> {
    let mut engine = ctx.engine()?;
    let model = engine.import_files(ConfigModel::default())?;
    model.validate()?;
    engine.save_snapshot(&model)?;

    println!(
        "{} Imported {} ({} users, {} packages, {} services).",
        "OK".green().bold(),
        model.system.hostname.cyan(),
        model.users.len(),
        model.system.system_packages.len(),
        model.system.services.iter().filter(|s| s.enabled).count()
    );
    Ok(())
}
