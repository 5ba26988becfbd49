use forge_model::{OptionMetadata, OptionType};
use forge_nix::scan_options;
use pretty_assertions::assert_eq;
use rstest::rstest;

const MODULE: &str = r#"
{ config, lib, pkgs, ... }:
with lib;
{
  options.services.frob = {
    enable = mkEnableOption "the frobnicator";

    port = mkOption {
      type = types.port;
      default = 8080;
      description = "Port to listen on.";
    };

    extraConfig = lib.mkOption {
      type = types.lines;
      example = "log_level = debug";
      description = ''
        Extra lines appended to the config.
        Supports { braces } in prose.
      '';
    };

    settings = mkOption {
      type = types.attrsOf types.anything;
      default = { };
      description = "Free-form settings with a } brace.";
    };

    users = mkOption { type = types.listOf types.package; };
  };
}
"#;

#[test]
fn test_scan_full_module() {
    let options = scan_options(MODULE, "");
    let names: Vec<&str> = options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["enable", "port", "extraConfig", "settings", "users"]);

    assert_eq!(
        options[0],
        OptionMetadata {
            name: "enable".into(),
            description: "the frobnicator".into(),
            option_type: OptionType::Boolean,
            example: Some("true".into()),
        }
    );
    assert_eq!(options[1].option_type, OptionType::Int);
    assert_eq!(options[1].description, "Port to listen on.");
    assert_eq!(options[1].example.as_deref(), Some("8080"));

    assert_eq!(options[2].option_type, OptionType::String);
    assert!(options[2].description.starts_with("Extra lines appended"));
    assert_eq!(options[2].example.as_deref(), Some("\"log_level = debug\""));

    assert_eq!(options[3].option_type, OptionType::Other);
    assert_eq!(options[3].description, "Free-form settings with a } brace.");
    assert_eq!(options[4].option_type, OptionType::List);
}

#[test]
fn test_prefix_is_joined() {
    let options = scan_options(MODULE, "services.frob");
    assert_eq!(options[1].name, "services.frob.port");
}

#[rstest]
#[case("broken = mkOption { type = types.str;", 0)]
#[case("x = mkOption { type = types.bool; }; y = mkOption { type = types.str;", 1)]
#[case("nothing to see here", 0)]
#[case("", 0)]
fn test_unbalanced_blocks_are_skipped(#[case] source: &str, #[case] expected: usize) {
    assert_eq!(scan_options(source, "").len(), expected);
}

#[test]
fn test_nested_option_blocks_stay_in_order() {
    let source = r#"
      a = mkOption { type = types.submodule { options = { inner = mkOption { type = types.int; }; }; }; };
      b = mkEnableOption "b";
    "#;
    let names: Vec<String> = scan_options(source, "").into_iter().map(|o| o.name).collect();
    assert_eq!(names, vec!["a", "inner", "b"]);
}

#[test]
fn test_enable_option_is_boolean_with_true_example() {
    let options = scan_options(r#"enable = lib.mkEnableOption "the frobnicator";"#, "");
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].option_type, OptionType::Boolean);
    assert_eq!(options[0].description, "the frobnicator");
    assert_eq!(options[0].example.as_deref(), Some("true"));
}
