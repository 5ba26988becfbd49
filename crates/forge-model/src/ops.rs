//! Name-keyed mutation operations.
//!
//! Adds are no-ops when the name is already present; removals filter by
//! name. Operations that would break a model invariant return an error and
//! leave the model untouched.

use crate::error::{Error, Result};
use crate::model::{ConfigModel, PackageRef, ServiceEntry, SourceInput, UserProfile};
use crate::value::NixValue;

/// Flake inputs the generator always declares itself.
pub const RESERVED_SOURCES: [&str; 3] = ["nixpkgs", "home-manager", "nixos-hardware"];

/// Service option written from `ServiceEntry::enabled`, never from options.
pub const ENABLE_OPTION: &str = "enable";

/// Description given to users that have not been described yet.
const PLACEHOLDER_DESCRIPTION: &str = "Primary User";

/// Appends `package` unless a package with the same name exists.
///
/// Returns `true` when the list changed.
pub fn add_package(list: &mut Vec<PackageRef>, package: PackageRef) -> bool {
    if list.iter().any(|p| p.name == package.name) {
        return false;
    }
    list.push(package);
    true
}

/// Removes packages named `name`. Returns `true` when the list changed.
pub fn remove_package(list: &mut Vec<PackageRef>, name: &str) -> bool {
    let before = list.len();
    list.retain(|p| p.name != name);
    list.len() != before
}

impl ConfigModel {
    /// Checks the model invariants.
    pub fn validate(&self) -> Result<()> {
        if self.users.is_empty() {
            return Err(Error::NoUsers);
        }
        if self.users.iter().any(|u| u.username.is_empty()) {
            return Err(Error::EmptyUsername);
        }
        for service in &self.system.services {
            check_option_key(&service.name, service.options.keys())?;
        }
        for (index, source) in self.sources.iter().enumerate() {
            if self.sources[..index].iter().any(|s| s.name == source.name) {
                return Err(Error::DuplicateSource {
                    name: source.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn add_system_package(&mut self, package: PackageRef) -> bool {
        add_package(&mut self.system.system_packages, package)
    }

    pub fn remove_system_package(&mut self, name: &str) -> bool {
        remove_package(&mut self.system.system_packages, name)
    }

    pub fn add_user_package(&mut self, username: &str, package: PackageRef) -> Result<bool> {
        let user = self.user_mut(username)?;
        Ok(add_package(&mut user.packages, package))
    }

    pub fn remove_user_package(&mut self, username: &str, name: &str) -> Result<bool> {
        let user = self.user_mut(username)?;
        Ok(remove_package(&mut user.packages, name))
    }

    /// Flips an existing service, or appends `service` enabled.
    ///
    /// Returns the resulting enabled state.
    pub fn toggle_service(&mut self, service: ServiceEntry) -> bool {
        if let Some(existing) = self
            .system
            .services
            .iter_mut()
            .find(|s| s.name == service.name)
        {
            existing.enabled = !existing.enabled;
            return existing.enabled;
        }

        tracing::debug!(service = %service.name, "Adding service");
        self.system.services.push(ServiceEntry {
            enabled: true,
            ..service
        });
        true
    }

    /// Replaces the service with the same name.
    pub fn update_service(&mut self, service: ServiceEntry) -> Result<()> {
        check_option_key(&service.name, service.options.keys())?;
        let existing = self.service_mut(&service.name)?;
        *existing = service;
        Ok(())
    }

    pub fn set_service_option(
        &mut self,
        name: &str,
        key: impl Into<String>,
        value: NixValue,
    ) -> Result<()> {
        let key = key.into();
        check_option_key(name, [&key])?;
        self.service_mut(name)?.options.insert(key, value);
        Ok(())
    }

    pub fn remove_service_option(&mut self, name: &str, key: &str) -> Result<bool> {
        Ok(self.service_mut(name)?.options.remove(key).is_some())
    }

    /// Declares a custom flake input.
    pub fn add_source(&mut self, source: SourceInput) -> Result<()> {
        if RESERVED_SOURCES.contains(&source.name.as_str()) {
            return Err(Error::ReservedSource { name: source.name });
        }
        if self.sources.iter().any(|s| s.name == source.name) {
            return Err(Error::DuplicateSource { name: source.name });
        }
        self.sources.push(source);
        Ok(())
    }

    pub fn remove_source(&mut self, name: &str) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.name != name);
        self.sources.len() != before
    }

    /// Appends a user unless the username is taken. Returns `true` when added.
    pub fn add_user(&mut self, user: UserProfile) -> Result<bool> {
        if user.username.is_empty() {
            return Err(Error::EmptyUsername);
        }
        if self.users.iter().any(|u| u.username == user.username) {
            return Ok(false);
        }
        self.users.push(user);
        Ok(true)
    }

    /// Removes a user, refusing to remove the last one.
    pub fn remove_user(&mut self, username: &str) -> Result<()> {
        if !self.users.iter().any(|u| u.username == username) {
            return Err(Error::UserNotFound {
                username: username.to_string(),
            });
        }
        if self.users.len() == 1 {
            return Err(Error::NoUsers);
        }
        self.users.retain(|u| u.username != username);
        Ok(())
    }

    /// Renames a user. A blank or placeholder description becomes the
    /// capitalised new username.
    pub fn rename_user(&mut self, from: &str, to: &str) -> Result<()> {
        if to.is_empty() {
            return Err(Error::EmptyUsername);
        }
        if from != to && self.users.iter().any(|u| u.username == to) {
            return Err(Error::DuplicateUser {
                username: to.to_string(),
            });
        }

        let user = self.user_mut(from)?;
        if user.description.is_empty() || user.description == PLACEHOLDER_DESCRIPTION {
            user.description = capitalize(to);
        }
        user.username = to.to_string();
        Ok(())
    }

    /// Replaces the experimental feature list, dropping duplicates.
    pub fn set_experimental_features<I, S>(&mut self, features: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for feature in features {
            let feature = feature.into();
            if !feature.is_empty() && !unique.contains(&feature) {
                unique.push(feature);
            }
        }
        self.system.experimental_features = unique;
    }

    pub fn user(&self, username: &str) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn service(&self, name: &str) -> Option<&ServiceEntry> {
        self.system.services.iter().find(|s| s.name == name)
    }

    fn user_mut(&mut self, username: &str) -> Result<&mut UserProfile> {
        self.users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| Error::UserNotFound {
                username: username.to_string(),
            })
    }

    fn service_mut(&mut self, name: &str) -> Result<&mut ServiceEntry> {
        self.system
            .services
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::ServiceNotFound {
                name: name.to_string(),
            })
    }
}

fn check_option_key<'k>(
    service: &str,
    keys: impl IntoIterator<Item = &'k String>,
) -> Result<()> {
    match keys.into_iter().find(|key| key.as_str() == ENABLE_OPTION) {
        Some(key) => Err(Error::ReservedOption {
            service: service.to_string(),
            key: key.clone(),
        }),
        None => Ok(()),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
