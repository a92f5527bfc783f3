use clap::Parser;
use std::path::Path;

use super::args::{CliArgs, Emit};

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["jsm"]).expect("default args should parse");

    assert!(args.mode.is_none());
    assert!(args.sets.is_none());
    assert!(args.project.is_none());
    assert!(args.emit.is_none());
    assert!(args.out.is_none());
    assert!(args.set_roots.is_empty());
    assert!(args.exclusions.is_empty());
    assert!(!args.pretty);
    assert!(!args.list_sets);
    assert!(!args.show_config);
    assert!(!args.profile);
    assert!(!args.no_index_audit);
}

#[test]
fn parses_surface_flags() {
    let args = CliArgs::try_parse_from([
        "jsm",
        "--mode",
        "host-native",
        "--sets",
        "base,host-native",
        "--emit",
        "json",
        "--out",
        "out/surface.json",
        "-p",
        "configs/jsmconfig.json",
        "--exclude",
        "eval,Proxy",
        "--set-root",
        "decls",
        "--set-root",
        "vendor/decls",
        "--no-index-audit",
        "--pretty",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.mode.as_deref(), Some("host-native"));
    assert_eq!(args.sets, Some(vec!["base".to_string(), "host-native".to_string()]));
    assert_eq!(args.emit, Some(Emit::Json));
    assert_eq!(args.out.as_deref(), Some(Path::new("out/surface.json")));
    assert_eq!(args.project.as_deref(), Some(Path::new("configs/jsmconfig.json")));
    assert_eq!(args.exclusions, vec!["eval".to_string(), "Proxy".to_string()]);
    assert_eq!(args.set_roots.len(), 2);
    assert!(args.no_index_audit);
    assert!(args.pretty);
}

#[test]
fn emit_is_case_insensitive() {
    let args = CliArgs::try_parse_from(["jsm", "--emit", "DTS"]).expect("emit should parse");
    assert_eq!(args.emit, Some(Emit::Dts));
}

#[test]
fn rejects_unknown_emit_kind() {
    assert!(CliArgs::try_parse_from(["jsm", "--emit", "yaml"]).is_err());
}

#[test]
fn accepts_camel_case_aliases() {
    let args = CliArgs::try_parse_from(["jsm", "--showConfig", "--listSets"]).expect("aliases should parse");
    assert!(args.show_config);
    assert!(args.list_sets);
}
