use jsm_common::{DefectKind, diagnostic_codes};

use crate::decl::DeclarationSet;
use crate::error::SurfaceError;
use crate::mode::{Mode, ModeConfig, ModeSet, select_mode};
use crate::pipeline::Stage;
use crate::test_support::set_with;

fn installed(specs: &[(&str, Option<&str>)]) -> Vec<DeclarationSet> {
    specs.iter().map(|(id, mode)| set_with(id, *mode, "")).collect()
}

fn codes(err: &SurfaceError) -> Vec<u32> {
    err.diagnostics().iter().map(|d| d.code).collect()
}

#[test]
fn test_mode_text() {
    assert_eq!("js".parse::<Mode>(), Ok(Mode::Js));
    assert_eq!(" Host-Native ".parse::<Mode>(), Ok(Mode::HostNative));
    assert!("node".parse::<Mode>().is_err());
    assert_eq!(Mode::HostNative.to_string(), "host-native");
    assert_eq!(Mode::expected_list(), "js, host-native");
    assert_eq!(serde_json::to_string(&Mode::HostNative).unwrap(), "\"host-native\"");
}

#[test]
fn test_selects_base_and_the_mode_set() {
    let sets = installed(&[("js", Some("js")), ("base", None)]);
    let selection = select_mode(&ModeConfig::new(Mode::Js), &sets).unwrap();
    assert_eq!(selection.mode(), Mode::Js);
    assert!(matches!(selection.extension, ModeSet::Js(_)));
    let ids: Vec<&str> = selection.sets().iter().map(|set| set.id.as_str()).collect();
    assert_eq!(ids, vec!["base", "js"]);
}

#[test]
fn test_two_mode_sets_are_ambiguous() {
    let sets = installed(&[("base", None), ("js", Some("js")), ("native", Some("host-native"))]);
    for mode in [Mode::Js, Mode::HostNative] {
        let err = select_mode(&ModeConfig::new(mode), &sets).unwrap_err();
        assert_eq!(codes(&err), vec![diagnostic_codes::AMBIGUOUS_MODE]);
        assert!(err.has_kind(DefectKind::AmbiguousMode));
        assert!(err.diagnostics()[0].message_text.contains("'js', 'native'"));
        assert_eq!(err.stage(), Stage::Unconfigured);
    }
}

#[test]
fn test_two_sets_for_the_same_mode_are_ambiguous() {
    let sets = installed(&[("base", None), ("js", Some("js")), ("js.legacy", Some("js"))]);
    let err = select_mode(&ModeConfig::new(Mode::Js), &sets).unwrap_err();
    assert_eq!(codes(&err), vec![diagnostic_codes::AMBIGUOUS_MODE]);
}

#[test]
fn test_base_set_count() {
    let none = installed(&[("js", Some("js"))]);
    let err = select_mode(&ModeConfig::new(Mode::Js), &none).unwrap_err();
    assert_eq!(codes(&err), vec![diagnostic_codes::MISSING_BASE_SET]);

    let two = installed(&[("a", None), ("b", None), ("js", Some("js"))]);
    let err = select_mode(&ModeConfig::new(Mode::Js), &two).unwrap_err();
    assert_eq!(codes(&err), vec![diagnostic_codes::DUPLICATE_BASE_SET]);
    assert!(err.diagnostics()[0].message_text.ends_with("found 'a', 'b'."));
}

#[test]
fn test_missing_and_mismatched_mode_sets() {
    let base_only = installed(&[("base", None)]);
    let err = select_mode(&ModeConfig::new(Mode::HostNative), &base_only).unwrap_err();
    assert_eq!(codes(&err), vec![diagnostic_codes::MISSING_MODE_SET]);
    assert_eq!(err.diagnostics()[0].message_text, "No declaration set is installed for mode 'host-native'.");

    let wrong = installed(&[("base", None), ("native", Some("host-native"))]);
    let err = select_mode(&ModeConfig::new(Mode::Js), &wrong).unwrap_err();
    assert_eq!(codes(&err), vec![diagnostic_codes::MODE_MISMATCH]);
    assert_eq!(
        err.diagnostics()[0].message_text,
        "Mode 'js' is configured but declaration set 'native' realizes mode 'host-native'."
    );
}

#[test]
fn test_all_configuration_defects_are_reported_together() {
    let err = select_mode(&ModeConfig::new(Mode::Js), &[]).unwrap_err();
    assert_eq!(codes(&err), vec![diagnostic_codes::MISSING_BASE_SET, diagnostic_codes::MISSING_MODE_SET]);
    assert!(err.diagnostics().iter().all(|d| d.kind() != DefectKind::Note));
}
