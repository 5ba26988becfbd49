//! Model editing commands
//!
//! Each command loads the model, applies one edit and persists the snapshot.
//! The Nix files are only written by `nixforge sync`.

use colored::Colorize;
use forge_model::{ConfigModel, NixValue, PackageRef, ServiceEntry, SourceInput};
use forge_nix::parse_value;

use crate::context::Context;
use crate::error::{CliError, Result};

fn edit(ctx: &Context, apply: impl FnOnce(&mut ConfigModel) -> Result<String>) -> Result<()> {
    let mut engine = ctx.engine()?;
    let mut model = engine.load()?.model;

    let message = apply(&mut model)?;
    model.validate()?;
    engine.save_snapshot(&model)?;

    println!("{} {}", "OK".green().bold(), message);
    println!("Run {} to write the Nix files.", "nixforge sync".cyan());
    Ok(())
}

pub fn run_package_add(ctx: &Context, name: &str, user: Option<&str>) -> Result<()> {
    edit(ctx, |model| {
        let package = PackageRef::new(name, "");
        let added = match user {
            Some(user) => model.add_user_package(user, package)?,
            None => model.add_system_package(package),
        };
        Ok(if added {
            format!("Added package {}", name.cyan())
        } else {
            format!("Package {} already present", name.cyan())
        })
    })
}

pub fn run_package_remove(ctx: &Context, name: &str, user: Option<&str>) -> Result<()> {
    edit(ctx, |model| {
        let removed = match user {
            Some(user) => model.remove_user_package(user, name)?,
            None => model.remove_system_package(name),
        };
        if !removed {
            return Err(CliError::user(format!("Package {name} is not installed")));
        }
        Ok(format!("Removed package {}", name.cyan()))
    })
}

pub fn run_service_toggle(ctx: &Context, name: &str) -> Result<()> {
    edit(ctx, |model| {
        let enabled = model.toggle_service(ServiceEntry::enabled(name));
        let state = if enabled { "enabled" } else { "disabled" };
        Ok(format!("Service {} {}", name.cyan(), state))
    })
}

/// Reads `raw` as a Nix literal, keeping it as a plain string otherwise.
fn option_value(raw: &str) -> NixValue {
    parse_value(raw).unwrap_or_else(|| NixValue::String(raw.to_string()))
}

pub fn run_service_set(ctx: &Context, name: &str, key: &str, value: &str) -> Result<()> {
    edit(ctx, |model| {
        model.set_service_option(name, key, option_value(value))?;
        Ok(format!("Set {}.{} = {}", name.cyan(), key, value))
    })
}

pub fn run_service_unset(ctx: &Context, name: &str, key: &str) -> Result<()> {
    edit(ctx, |model| {
        if !model.remove_service_option(name, key)? {
            return Err(CliError::user(format!("{name} has no option {key}")));
        }
        Ok(format!("Removed {}.{}", name.cyan(), key))
    })
}

pub fn run_source_add(ctx: &Context, name: &str, url: &str) -> Result<()> {
    edit(ctx, |model| {
        model.add_source(SourceInput {
            name: name.to_string(),
            url: url.to_string(),
        })?;
        Ok(format!("Added source {}", name.cyan()))
    })
}

pub fn run_source_remove(ctx: &Context, name: &str) -> Result<()> {
    edit(ctx, |model| {
        if !model.remove_source(name) {
            return Err(CliError::user(format!("No source named {name}")));
        }
        Ok(format!("Removed source {}", name.cyan()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_value_falls_back_to_string() {
        assert_eq!(option_value("22"), NixValue::Int(22));
        assert_eq!(option_value("false"), NixValue::Bool(false));
        assert_eq!(option_value("\"no\""), NixValue::String("no".into()));
        assert_eq!(option_value("prohibit-password"), NixValue::String("prohibit-password".into()));
    }
}
