//! Managed-region location.
//!
//! A region runs from the first begin marker through the first end marker,
//! both inclusive. Anything before it is the prefix, anything after it the
//! suffix.

/// Sentinel line opening a generator-owned region.
pub const BEGIN_MARKER: &str = "# --- BEGIN NIXFORGE GENERATED ---";

/// Sentinel line closing a generator-owned region.
pub const END_MARKER: &str = "# --- END NIXFORGE GENERATED ---";

/// A text blob split around its managed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    /// Text before the begin marker.
    pub prefix: &'a str,
    /// The begin marker, the region body and the end marker.
    pub managed: &'a str,
    /// Text after the end marker.
    pub suffix: &'a str,
}

impl<'a> Region<'a> {
    /// The region body without its two marker lines.
    pub fn body(&self) -> &'a str {
        let managed = self.managed;
        let start = BEGIN_MARKER.len();
        let end = managed.len() - END_MARKER.len();
        &managed[start..end]
    }
}

/// Locates the managed region.
///
/// Returns `None` when either marker is missing or the end marker only
/// occurs before the begin marker.
///
/// # Example
/// ```
/// use forge_blocks::region::locate;
///
/// let text = "head\n# --- BEGIN NIXFORGE GENERATED ---\nx = 1;\n# --- END NIXFORGE GENERATED ---\ntail";
/// let region = locate(text).unwrap();
/// assert_eq!(region.prefix, "head\n");
/// assert_eq!(region.suffix, "\ntail");
/// assert_eq!(region.body(), "\nx = 1;\n");
/// ```
pub fn locate(text: &str) -> Option<Region<'_>> {
    let start = text.find(BEGIN_MARKER)?;
    let end_marker = text.find(END_MARKER)?;
    if end_marker < start + BEGIN_MARKER.len() {
        return None;
    }
    let end = end_marker + END_MARKER.len();

    Some(Region {
        prefix: &text[..start],
        managed: &text[start..end],
        suffix: &text[end..],
    })
}

/// Checks whether the text carries a managed region.
pub fn has_region(text: &str) -> bool {
    locate(text).is_some()
}
