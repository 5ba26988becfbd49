//! Integration tests for region location and merging.

use forge_blocks::{BEGIN_MARKER, END_MARKER, locate, merge};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn region(body: &str) -> String {
    format!("{BEGIN_MARKER}{body}{END_MARKER}")
}

fn system_file(body: &str) -> String {
    format!(
        "{{ config, pkgs, ... }}:\n\n{{\n  {}\n\n  system.stateVersion = \"24.05\";\n}}\n",
        region(body)
    )
}

#[test]
fn test_merge_with_itself_is_fixed_point() {
    let text = system_file("\n  networking.hostName = \"box\";\n  ");
    assert_eq!(merge(&text, &text), text);
}

#[test]
fn test_first_run_overwrites_unmanaged_file() {
    let existing = "{ ... }:\n{\n  networking.hostName = \"hand-written\";\n}\n";
    let generated = system_file("\n  networking.hostName = \"box\";\n  ");
    assert_eq!(merge(existing, &generated), generated);
}

#[test]
fn test_generated_without_region_is_returned_unchanged() {
    let existing = system_file("\n  old\n  ");
    let generated = "{ }\n";
    assert_eq!(merge(&existing, generated), generated);
}

#[test]
fn test_user_content_outside_region_survives() {
    let existing = format!(
        "{{ config, pkgs, ... }}:\n\n{{\n  # my own module\n  services.tailscale.enable = true;\n  {}\n\n  programs.steam.enable = true;\n  system.stateVersion = \"23.11\";\n}}\n",
        region("\n  networking.hostName = \"old\";\n  ")
    );
    let generated = system_file("\n  networking.hostName = \"new\";\n  ");

    let merged = merge(&existing, &generated);

    assert!(merged.contains("services.tailscale.enable = true;"));
    assert!(merged.contains("programs.steam.enable = true;"));
    assert!(merged.contains("system.stateVersion = \"23.11\";"));
    assert!(merged.contains("networking.hostName = \"new\";"));
    assert!(!merged.contains("networking.hostName = \"old\";"));
    // Regenerating again changes nothing
    assert_eq!(merge(&merged, &generated), merged);
}

#[test]
fn test_user_definition_removed_only_from_prefix() {
    let existing = format!(
        "{{\n  users.users.alice = {{\n    isNormalUser = true;\n  }};\n  {}\n  users.users.alice.packages = [ ];\n}}\n",
        region("\n  ")
    );
    let generated = format!(
        "{{\n  {}\n}}\n",
        region("\n  users.users.alice = {\n    isNormalUser = true;\n  };\n  ")
    );

    let merged = merge(&existing, &generated);
    let found = locate(&merged).unwrap();

    assert!(!found.prefix.contains("users.users.alice"));
    assert_eq!(found.suffix, "\n  users.users.alice.packages = [ ];\n}\n");
    assert_eq!(merged.matches("users.users.alice = {").count(), 1);
}

fn outside_text() -> impl Strategy<Value = String> {
    // No '#', so markers can never appear by accident
    "[a-z ={};\n]{0,40}"
}

proptest! {
    #[test]
    fn prop_suffix_preserved_and_region_replaced(
        prefix in outside_text(),
        suffix in outside_text(),
        old_body in "[a-z =;\n]{0,30}",
        new_body in "[a-z =;\n]{0,30}",
    ) {
        let existing = format!("{prefix}{}{suffix}", region(&old_body));
        let generated = format!("{{\n{}\n}}\n", region(&new_body));

        let merged = merge(&existing, &generated);
        let expected_tail = format!("{}{suffix}", region(&new_body));

        prop_assert!(merged.ends_with(&expected_tail));
        let found = locate(&merged).unwrap();
        prop_assert_eq!(found.managed, region(&new_body));
        prop_assert_eq!(found.suffix, suffix.as_str());
    }

    #[test]
    fn prop_unmanaged_existing_is_overwritten(
        existing in outside_text(),
        body in "[a-z =;\n]{0,30}",
    ) {
        let generated = format!("{{\n{}\n}}\n", region(&body));
        prop_assert_eq!(merge(&existing, &generated), generated);
    }

    #[test]
    fn prop_merge_is_idempotent(
        prefix in "[a-z ={};]{0,20}\n",
        suffix in outside_text(),
        body in "[a-z =;\n]{0,30}",
    ) {
        let text = format!("{prefix}{}{suffix}", region(&body));
        let once = merge(&text, &text);
        prop_assert_eq!(merge(&once, &text), once.clone());
        prop_assert_eq!(once, text);
    }
}
