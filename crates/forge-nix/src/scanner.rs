//! Option metadata extraction from Nix module source.
//!
//! Recognizes `name = mkEnableOption "…";` and `name = mkOption { … };`
//! declarations (with or without the `lib.` qualifier) anywhere in the
//! text. Declarations whose braces never balance are skipped.

use std::sync::LazyLock;

use forge_blocks::extract_block;
use forge_model::{OptionMetadata, OptionType};
use regex::Regex;

static ENABLE_OPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z0-9_.]+)\s*=\s*(?:lib\.)?mkEnableOption\s*"(.*?)";"#)
        .expect("Invalid mkEnableOption regex")
});

static OPTION_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z0-9_.]+)\s*=\s*(?:lib\.)?mkOption\s*\{")
        .expect("Invalid mkOption regex")
});

static TYPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"type\s*=\s*([^;]+);").expect("Invalid type regex"));

static LONG_DESCRIPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)description\s*=\s*''(.*?)'';").expect("Invalid description regex")
});

static DESCRIPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"description\s*=\s*"(.*?)";"#).expect("Invalid description regex")
});

static EXAMPLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"example\s*=\s*([^;]+);").expect("Invalid example regex"));

static DEFAULT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"default\s*=\s*([^;]+);").expect("Invalid default regex"));

/// Extracts option declarations from `source`, in source order.
///
/// A non-empty `prefix` is joined to every name with a dot.
///
/// # Example
/// ```
/// use forge_model::OptionType;
/// use forge_nix::scan_options;
///
/// let source = r#"
///   enable = lib.mkEnableOption "the frobnicator";
///   port = mkOption { type = types.port; default = 8080; };
/// "#;
/// let options = scan_options(source, "services.frob");
/// assert_eq!(options[0].name, "services.frob.enable");
/// assert_eq!(options[1].option_type, OptionType::Int);
/// assert_eq!(options[1].example.as_deref(), Some("8080"));
/// ```
pub fn scan_options(source: &str, prefix: &str) -> Vec<OptionMetadata> {
    let mut found: Vec<(usize, OptionMetadata)> = Vec::new();

    for caps in ENABLE_OPTION_REGEX.captures_iter(source) {
        let (Some(whole), Some(name), Some(text)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        found.push((
            whole.start(),
            OptionMetadata {
                name: qualify(prefix, name.as_str()),
                description: text.as_str().to_string(),
                option_type: OptionType::Boolean,
                example: Some("true".to_string()),
            },
        ));
    }

    for caps in OPTION_START_REGEX.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(body) = extract_block(source, whole.end()) else {
            tracing::debug!(option = name.as_str(), "Skipping option with unbalanced braces");
            continue;
        };
        found.push((whole.start(), describe(&qualify(prefix, name.as_str()), body)));
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, option)| option).collect()
}

fn describe(name: &str, body: &str) -> OptionMetadata {
    let capture = |regex: &Regex| {
        regex
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    };

    let raw_type = capture(&TYPE_REGEX).unwrap_or_default();
    let description = capture(&LONG_DESCRIPTION_REGEX)
        .or_else(|| capture(&DESCRIPTION_REGEX))
        .unwrap_or_default();
    let example = capture(&EXAMPLE_REGEX).or_else(|| capture(&DEFAULT_REGEX));

    OptionMetadata {
        name: name.to_string(),
        description,
        option_type: OptionType::classify(&raw_type),
        example,
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
