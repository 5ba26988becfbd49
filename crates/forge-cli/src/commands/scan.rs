//! Option scanning command implementation

use std::path::Path;

use colored::Colorize;
use forge_fs::{NormalizedPath, io};
use forge_nix::scan_options;

use crate::error::Result;

/// Print option declarations found in a Nix module.
pub fn run_scan_options(file: &Path, prefix: &str, json: bool) -> Result<()> {
    let source = io::read_text(&NormalizedPath::new(file))?;
    let options = scan_options(&source, prefix);

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    if options.is_empty() {
        println!("{} No option declarations found.", "=>".blue().bold());
        return Ok(());
    }

    for option in &options {
        let option_type = serde_json::to_value(&option.option_type)?;
        println!(
            "{} {}",
            option.name.cyan(),
            format!("({})", option_type.as_str().unwrap_or("other")).dimmed()
        );
        if !option.description.is_empty() {
            println!("    {}", option.description);
        }
        if let Some(example) = &option.example {
            println!("    {} {}", "example:".dimmed(), example);
        }
    }
    Ok(())
}
