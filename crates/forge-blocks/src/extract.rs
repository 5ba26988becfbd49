//! Balanced-brace block extraction.
//!
//! A depth counter plus a double-quote toggle is enough for the Nix we care
//! about. Braces inside `''` indented strings are still counted; that form is
//! not handled.

/// Returns the text between `start` and the brace that closes the block.
///
/// `start` must point just past an opening `{`. Braces inside double-quoted
/// strings are ignored, and a quote preceded by a backslash does not toggle
/// the string state. Returns `None` when the input ends before the block
/// closes or `start` is not a valid char boundary.
///
/// # Example
/// ```
/// use forge_blocks::extract::extract_block;
///
/// let text = r#"{ a = "}"; b = { c = 1; }; } rest"#;
/// assert_eq!(extract_block(text, 1), Some(r#" a = "}"; b = { c = 1; }; "#));
/// ```
pub fn extract_block(text: &str, start: usize) -> Option<&str> {
    if start > text.len() || !text.is_char_boundary(start) {
        return None;
    }

    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut in_string = false;

    for (index, &byte) in bytes.iter().enumerate().skip(start) {
        match byte {
            b'"' if index == 0 || bytes[index - 1] != b'\\' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..index]);
                }
            }
            _ => {}
        }
    }

    None
}
