//! Merging freshly generated files into existing ones.
//!
//! The managed region of the existing file is replaced with the generated
//! one; the suffix is kept verbatim and the prefix is kept after removing
//! user definitions that the new region now owns.

use std::sync::LazyLock;

use regex::Regex;

use crate::extract::extract_block;
use crate::region::locate;

/// Matches `users.users.<name> =` definitions.
static USER_DEFINITION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"users\.users\.([A-Za-z0-9_-]+)\s*=").expect("Invalid user definition regex")
});

/// Three or more line breaks separated only by whitespace.
static BLANK_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n").expect("Invalid blank run regex"));

/// Merges a freshly generated file into the existing file content.
///
/// - Generated text without a region is returned unchanged.
/// - Existing text without a region is overwritten by the generated text.
/// - Otherwise the result is the scrubbed existing prefix, the generated
///   region and the existing suffix.
///
/// # Example
/// ```
/// use forge_blocks::merge::merge;
/// use forge_blocks::region::{BEGIN_MARKER, END_MARKER};
///
/// let existing = format!("mine\n{BEGIN_MARKER}\nold\n{END_MARKER}\nalso mine\n");
/// let generated = format!("{BEGIN_MARKER}\nnew\n{END_MARKER}\n");
/// let merged = merge(&existing, &generated);
/// assert_eq!(merged, format!("mine\n{BEGIN_MARKER}\nnew\n{END_MARKER}\nalso mine\n"));
/// ```
pub fn merge(existing: &str, generated: &str) -> String {
    let Some(fresh) = locate(generated) else {
        tracing::warn!("Generated text has no managed region, writing it unmerged");
        return generated.to_string();
    };

    let Some(current) = locate(existing) else {
        tracing::debug!("Existing file has no managed region, overwriting");
        return generated.to_string();
    };

    let mut prefix = current.prefix.to_string();
    for username in defined_users(fresh.managed) {
        prefix = remove_user_block(&prefix, &username);
    }
    let prefix = collapse_blank_lines(&prefix);

    let mut merged = String::with_capacity(prefix.len() + fresh.managed.len() + current.suffix.len());
    merged.push_str(&prefix);
    merged.push_str(fresh.managed);
    merged.push_str(current.suffix);
    merged
}

/// Usernames defined with `users.users.<name> =`, in order, without duplicates.
pub fn defined_users(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in USER_DEFINITION_REGEX.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Removes every `users.users.<username> = { ... };` block from `text`.
///
/// A block is removed from the start of its first line through the closing
/// brace, an optional `;` and the end of that line. Blocks whose braces never
/// balance are left alone.
pub fn remove_user_block(text: &str, username: &str) -> String {
    let pattern = format!(
        r"(?m)^[ \t]*users\.users\.{}\s*=\s*\{{",
        regex::escape(username)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return text.to_string();
    };

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(found) = re.find_at(text, cursor) {
        let body_start = found.end();
        let Some(body) = extract_block(text, body_start) else {
            tracing::debug!(username, "Unbalanced user block left in place");
            break;
        };

        let end = line_end_after_close(text, body_start + body.len() + 1);
        result.push_str(&text[cursor..found.start()]);
        cursor = end;
        tracing::debug!(username, "Removed stale user block outside managed region");
    }

    result.push_str(&text[cursor..]);
    result
}

/// Collapses runs of blank lines left behind by block removal.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN_REGEX.replace_all(text, "\n\n").into_owned()
}

/// Skips an optional `;`, trailing blanks and one line break after `index`.
fn line_end_after_close(text: &str, index: usize) -> usize {
    let bytes = text.as_bytes();
    let mut end = index;

    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t') {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b';' {
        end += 1;
    }
    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t' | b'\r') {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'\n' {
        end += 1;
    }
    end
}
