use std::sync::LazyLock;

use forge_model::ConfigModel;
use regex::Regex;

use super::{Importer, Line, assigned, list_opening, region_lines};
use crate::value::unquote;

static SHELL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^programs\.(bash|fish|zsh)\.enable\s*=\s*true$").expect("Invalid shell regex")
});

#[derive(Debug, Clone, Copy)]
enum Context {
    TopLevel,
    Packages,
    Git,
}

impl Importer<'_> {
    /// Folds the managed region of a `home.nix` into the user at `user_index`.
    ///
    /// An out-of-range index leaves the model unchanged.
    pub fn home(&self, text: &str, mut model: ConfigModel, user_index: usize) -> ConfigModel {
        if user_index >= model.users.len() {
            tracing::debug!(user_index, "No user to import home settings into");
            return model;
        }

        let mut context = Context::TopLevel;
        for line in region_lines(text) {
            context = self.home_line(&mut model, user_index, context, line);
        }
        model
    }

    fn home_line(
        &self,
        model: &mut ConfigModel,
        user_index: usize,
        context: Context,
        line: Line<'_>,
    ) -> Context {
        let user = &mut model.users[user_index];
        let clean = line.clean;

        match context {
            Context::Packages => match line.raw.split_once(']') {
                Some((inside, _)) => {
                    self.collect_packages(&mut user.packages, inside);
                    Context::TopLevel
                }
                None => {
                    self.collect_packages(&mut user.packages, line.raw);
                    Context::Packages
                }
            },
            Context::Git => {
                if clean.starts_with('}') {
                    return Context::TopLevel;
                }
                if let Some(name) = assigned(clean, "userName").and_then(unquote) {
                    user.git_name = Some(name);
                } else if let Some(email) = assigned(clean, "userEmail").and_then(unquote) {
                    user.git_email = Some(email);
                }
                Context::Git
            }
            Context::TopLevel => {
                if clean.starts_with("home.packages") {
                    let (inside, closed) = list_opening(line.raw);
                    self.collect_packages(&mut user.packages, inside);
                    return if closed {
                        Context::TopLevel
                    } else {
                        Context::Packages
                    };
                }
                if assigned(clean, "programs.git").is_some_and(|v| v == "{") {
                    return Context::Git;
                }
                if let Some(name) = assigned(clean, "programs.git.userName").and_then(unquote) {
                    user.git_name = Some(name);
                } else if let Some(email) =
                    assigned(clean, "programs.git.userEmail").and_then(unquote)
                {
                    user.git_email = Some(email);
                } else if let Some(caps) = SHELL_REGEX.captures(clean) {
                    let program = &caps[1];
                    if crate::render::shell_program(&user.shell) != Some(program) {
                        user.shell = format!("pkgs.{program}");
                    }
                }
                Context::TopLevel
            }
        }
    }
}
