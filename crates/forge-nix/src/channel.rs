//! Channel identifier ↔ branch name mapping.
//!
//! nixpkgs release branches are spelled `release-YY.MM` in flake URLs while
//! the channel identifier is `nixos-YY.MM`; home-manager tracks `master` for
//! unstable.

const UNSTABLE: &str = "nixos-unstable";
const FALLBACK_STATE_VERSION: &str = "23.11";

/// Branch of nixpkgs to pin for a channel identifier.
pub fn nixpkgs_branch(version: &str) -> String {
    if version == UNSTABLE || version == "unstable" {
        return UNSTABLE.to_string();
    }
    let release = version.strip_prefix("nixos-").unwrap_or(version);
    if is_release(release) {
        format!("release-{release}")
    } else {
        version.to_string()
    }
}

/// Branch of home-manager matching a channel identifier.
pub fn home_manager_branch(version: &str) -> String {
    let branch = nixpkgs_branch(version);
    if branch == UNSTABLE {
        "master".to_string()
    } else {
        branch
    }
}

/// Channel identifier for the last path segment of a nixpkgs URL.
pub fn channel_from_url(url: &str) -> String {
    let branch = url.rsplit('/').next().unwrap_or(url);
    match branch.strip_prefix("release-") {
        Some(release) => format!("nixos-{release}"),
        None => branch.to_string(),
    }
}

/// `system.stateVersion` for a channel identifier.
pub fn state_version(version: &str) -> &str {
    (0..version.len())
        .filter_map(|start| version.get(start..start + 5))
        .find(|candidate| is_release(candidate))
        .unwrap_or(FALLBACK_STATE_VERSION)
}

/// `YY.MM`
fn is_release(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 5
        && bytes[2] == b'.'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit())
}
