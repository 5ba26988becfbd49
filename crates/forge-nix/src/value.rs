//! Nix literal formatting and reading.
//!
//! Only double quotes are escaped. Backslashes and newlines pass through
//! untouched, so strings containing them do not survive a round trip.

use std::sync::LazyLock;

use forge_model::NixValue;
use regex::Regex;

static QUOTED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("Invalid quoted string regex"));

/// Renders a value as a Nix literal.
///
/// ```
/// use forge_model::NixValue;
/// use forge_nix::format_value;
///
/// assert_eq!(format_value(&NixValue::Bool(false)), "false");
/// assert_eq!(format_value(&NixValue::List(vec!["a".into(), "b".into()])), r#"[ "a" "b" ]"#);
/// assert_eq!(format_value(&NixValue::String(r#"say "hi""#.into())), r#""say \"hi\"""#);
/// ```
pub fn format_value(value: &NixValue) -> String {
    match value {
        NixValue::Bool(b) => b.to_string(),
        NixValue::Int(n) => n.to_string(),
        NixValue::Float(f) => f.to_string(),
        NixValue::List(items) => format_list(items),
        NixValue::String(s) => quote(s),
    }
}

/// Double-quotes a string, escaping embedded quotes.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

/// Renders `[ "a" "b" ]`, or `[ ]` when empty.
pub fn format_list<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "[ ]".to_string();
    }
    let quoted: Vec<String> = items.iter().map(|i| quote(i.as_ref())).collect();
    format!("[ {} ]", quoted.join(" "))
}

/// Reads a Nix literal back into a value.
///
/// Returns `None` for anything that is not a bool, number, quoted string or
/// list of quoted strings, e.g. `pkgs.hello` or `lib.mkForce true`.
pub fn parse_value(raw: &str) -> Option<NixValue> {
    let raw = raw.trim();
    match raw {
        "true" => return Some(NixValue::Bool(true)),
        "false" => return Some(NixValue::Bool(false)),
        _ => {}
    }

    if let Ok(n) = raw.parse::<i64>() {
        return Some(NixValue::Int(n));
    }
    if is_decimal(raw)
        && let Ok(f) = raw.parse::<f64>()
    {
        return Some(NixValue::Float(f));
    }
    if raw.starts_with('[') {
        return parse_list(raw).map(NixValue::List);
    }
    unquote(raw).map(NixValue::String)
}

/// Reads `[ "a" "b" ]` into its elements.
///
/// Every element must be a quoted string.
pub fn parse_list(raw: &str) -> Option<Vec<String>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?;

    let leftover = QUOTED_REGEX.replace_all(inner, "");
    if !leftover.trim().is_empty() {
        return None;
    }

    Some(
        QUOTED_REGEX
            .captures_iter(inner)
            .map(|caps| unescape(&caps[1]))
            .collect(),
    )
}

/// Strips the quotes from a single double-quoted string literal.
pub fn unquote(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;

    let bytes = inner.as_bytes();
    let stray_quote = bytes
        .iter()
        .enumerate()
        .any(|(i, &b)| b == b'"' && (i == 0 || bytes[i - 1] != b'\\'));
    if stray_quote {
        return None;
    }

    Some(unescape(inner))
}

fn unescape(s: &str) -> String {
    s.replace("\\\"", "\"")
}

fn is_decimal(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    digits.contains('.')
        && !digits.starts_with('.')
        && !digits.ends_with('.')
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NixValue::Bool(true), "true")]
    #[case(NixValue::Int(-22), "-22")]
    #[case(NixValue::Float(1.5), "1.5")]
    #[case(NixValue::List(vec![]), "[ ]")]
    #[case(NixValue::List(vec!["wheel".into(), "audio".into()]), r#"[ "wheel" "audio" ]"#)]
    #[case(NixValue::String("no".into()), r#""no""#)]
    #[case(NixValue::String("a\\b".into()), r#""a\b""#)]
    fn test_format(#[case] value: NixValue, #[case] expected: &str) {
        assert_eq!(format_value(&value), expected);
    }

    #[rstest]
    #[case("true", Some(NixValue::Bool(true)))]
    #[case("false", Some(NixValue::Bool(false)))]
    #[case("2048", Some(NixValue::Int(2048)))]
    #[case("-1", Some(NixValue::Int(-1)))]
    #[case("0.25", Some(NixValue::Float(0.25)))]
    #[case(r#""prohibit-password""#, Some(NixValue::String("prohibit-password".into())))]
    #[case(r#""a \"b\"""#, Some(NixValue::String("a \"b\"".into())))]
    #[case(r#"[ "22" "2222" ]"#, Some(NixValue::List(vec!["22".into(), "2222".into()])))]
    #[case("[ ]", Some(NixValue::List(vec![])))]
    #[case("[ 22 ]", None)]
    #[case("pkgs.hello", None)]
    #[case(r#""a" + "b""#, None)]
    #[case("1.", None)]
    fn test_parse(#[case] raw: &str, #[case] expected: Option<NixValue>) {
        assert_eq!(parse_value(raw), expected);
    }

    #[test]
    fn test_string_with_spaces_in_list() {
        assert_eq!(
            parse_list(r#"[ "Alice Liddell" "x" ]"#),
            Some(vec!["Alice Liddell".to_string(), "x".to_string()])
        );
    }
}
