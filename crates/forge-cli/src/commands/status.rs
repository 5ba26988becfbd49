//! Status command implementation

use colored::Colorize;
use forge_core::CheckStatus;
use serde::Serialize;

use crate::context::Context;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct StatusSummary<'a> {
    root: &'a str,
    source: String,
    hostname: &'a str,
    nix_version: &'a str,
    users: Vec<&'a str>,
    system_packages: usize,
    enabled_services: Vec<&'a str>,
    sources: Vec<&'a str>,
    status: CheckStatus,
}

/// Run the status command
pub fn run_status(ctx: &Context, json: bool) -> Result<()> {
    let mut engine = ctx.engine()?;
    let loaded = engine.load()?;
    let model = &loaded.model;
    let report = engine.check(model)?;

    let summary = StatusSummary {
        root: ctx.root.as_str(),
        source: loaded.source.to_string(),
        hostname: &model.system.hostname,
        nix_version: &model.nix_version,
        users: model.users.iter().map(|u| u.username.as_str()).collect(),
        system_packages: model.system.system_packages.len(),
        enabled_services: model
            .system
            .services
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.name.as_str())
            .collect(),
        sources: model.sources.iter().map(|s| s.name.as_str()).collect(),
        status: report.status,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "NixForge Status".bold());
    println!();
    println!("{}:      {}", "Path".dimmed(), summary.root);
    println!("{}:    {}", "Loaded".dimmed(), summary.source);
    println!("{}:  {}", "Hostname".dimmed(), summary.hostname.cyan());
    println!("{}:   {}", "Channel".dimmed(), summary.nix_version.cyan());
    println!("{}:     {}", "Users".dimmed(), summary.users.join(", "));
    println!("{}:  {}", "Packages".dimmed(), summary.system_packages);
    println!();

    println!("{}:", "Enabled Services".bold());
    if summary.enabled_services.is_empty() {
        println!(
            "  {} (use {} to add)",
            "None".dimmed(),
            "nixforge service toggle".cyan()
        );
    } else {
        for name in &summary.enabled_services {
            println!("  {} {}", "+".green(), name.cyan());
        }
    }
    println!();

    let files = match summary.status {
        CheckStatus::Healthy => "in sync".green(),
        CheckStatus::Missing => "not written yet".yellow(),
        CheckStatus::Drifted => "drifted".red(),
        CheckStatus::Broken => "snapshot unreadable".red(),
    };
    println!("{}:     {}", "Files".dimmed(), files);

    Ok(())
}
