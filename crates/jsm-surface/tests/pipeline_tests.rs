//! End-to-end pipeline behaviour over small inline declaration sets.

use jsm_common::{DefectKind, diagnostic_codes};
use jsm_surface::{
    CapabilityProfile, DeclarationSet, Mode, ModeConfig, Pipeline, PipelineOptions, Stage, SurfaceError,
    build_surface, parse_declaration_set,
};

const BASE: &str = r#"/// <set id="base" version="1.0.0" />
type int = number;
interface Array<T> {
    length: int;
    [n: int]: T;
}
interface Console { log(...data: any[]): void; }
declare var console: Console;
"#;

const JS: &str = r#"/// <set id="js" version="2.0.0" mode="js" />
/// <reference set="base" />
interface Array<T> {
    map<U>(callbackfn: (value: T, index: int, array: T[]) => U): U[];
    indexOf(searchElement: T, fromIndex?: int): int;
}
"#;

const NATIVE: &str = r#"/// <set id="native" version="1.0.0" mode="host-native" />
interface Array<T> {
    push(...items: T[]): int;
}
"#;

fn parse(source: &str) -> DeclarationSet {
    parse_declaration_set("inline.d.ts", source).unwrap_or_else(|diagnostics| panic!("{diagnostics:#?}"))
}

fn js_profile() -> CapabilityProfile {
    CapabilityProfile::new(Mode::Js)
        .require_members("Array", &["length", "map", "indexOf"])
        .require_globals(&["console"])
}

fn native_profile() -> CapabilityProfile {
    CapabilityProfile::new(Mode::HostNative).exclude(["fetch", "window"])
}

#[test]
fn test_js_surface_builds_and_publishes() {
    let validated = build_surface(
        &ModeConfig::new(Mode::Js),
        vec![parse(BASE), parse(JS)],
        &js_profile(),
        PipelineOptions::default(),
    )
    .unwrap();
    assert_eq!(validated.stage(), Stage::Validated);
    assert!(validated.warnings().is_empty());

    let surface = validated.publish();
    assert_eq!(surface.mode(), Mode::Js);
    let array = surface.interface("Array").unwrap();
    let keys: Vec<String> = array.members.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["length", "[number]", "map", "indexOf"]);
    let ids: Vec<&str> = surface.sets().iter().map(|set| set.id.as_str()).collect();
    assert_eq!(ids, vec!["base", "js"]);
}

#[test]
fn test_stages_advance_one_at_a_time() {
    let pipeline = Pipeline::new().with_set(parse(BASE)).with_set(parse(JS));
    assert_eq!(pipeline.stage(), Stage::Unconfigured);
    let selected = pipeline.select_mode(&ModeConfig::new(Mode::Js)).unwrap();
    assert_eq!(selected.stage(), Stage::ModeSelected);
    let merged = selected.merge();
    assert_eq!(merged.stage(), Stage::Merged);
    assert!(merged.conflicts().is_empty());
    let validated = merged.validate(&js_profile()).unwrap();
    assert_eq!(validated.stage(), Stage::Validated);
}

#[test]
fn test_output_is_deterministic() {
    let build = || {
        build_surface(
            &ModeConfig::new(Mode::Js),
            vec![parse(BASE), parse(JS)],
            &js_profile(),
            PipelineOptions::default(),
        )
        .unwrap()
        .publish()
    };
    let (a, b) = (build(), build());
    assert_eq!(a.to_declaration_text(), b.to_declaration_text());
    assert_eq!(a.to_json(true).unwrap(), b.to_json(true).unwrap());
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn test_both_mode_sets_installed_is_ambiguous() {
    let err = build_surface(
        &ModeConfig::new(Mode::Js),
        vec![parse(BASE), parse(JS), parse(NATIVE)],
        &js_profile(),
        PipelineOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SurfaceError::Configuration(_)));
    assert!(err.has_code(diagnostic_codes::AMBIGUOUS_MODE));
    assert!(err.diagnostics()[0].message_text.contains("'js', 'native'"));
}

#[test]
fn test_merge_conflict_stops_at_merged() {
    let bad_js = JS.replace("interface Array<T> {", "interface Array<T> {\n    length: string;");
    let err = build_surface(
        &ModeConfig::new(Mode::Js),
        vec![parse(BASE), parse(&bad_js)],
        &js_profile(),
        PipelineOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SurfaceError::Merge(_)));
    assert_eq!(err.stage(), Stage::Merged);
    assert_eq!(err.diagnostics().len(), 1);
    assert!(err.has_kind(DefectKind::IncompatibleMerge));
    assert!(err.diagnostics()[0].message_text.contains("'length: int' in 'base'"));
    assert!(err.diagnostics()[0].message_text.contains("'length: string' in 'js'"));
}

#[test]
fn test_declared_fetch_is_a_capability_violation() {
    let native = format!("{NATIVE}declare function fetch(input: string): any;\n");
    let err = build_surface(
        &ModeConfig::new(Mode::HostNative),
        vec![parse(BASE), parse(&native)],
        &native_profile(),
        PipelineOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SurfaceError::Validation(_)));
    assert_eq!(err.stage(), Stage::Merged);
    assert!(err.has_code(diagnostic_codes::CAPABILITY_VIOLATION));
    assert!(err.diagnostics()[0].message_text.contains("'fetch'"));
}

#[test]
fn test_validation_collects_every_profile_defect() {
    let js = JS.replace("fromIndex?: int): int", "fromIndex?: number): number");
    let profile = js_profile().require_members("Array", &["filter"]).exclude(["Console"]);
    let sets = vec![parse(BASE), parse(&js)];
    let err = build_surface(&ModeConfig::new(Mode::Js), sets, &profile, PipelineOptions::default()).unwrap_err();
    let kinds: Vec<DefectKind> = err.diagnostics().iter().map(|d| d.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            DefectKind::IncompleteMode,
            DefectKind::CapabilityViolation,
            DefectKind::CapabilityViolation,
            DefectKind::IndexInconsistency,
            DefectKind::IndexInconsistency,
        ]
    );
}

#[test]
fn test_index_audit_can_be_disabled_and_exclusions_extended() {
    let js = JS.replace("fromIndex?: int): int", "fromIndex?: number): number");
    let options = PipelineOptions { index_audit: false, extra_exclusions: vec!["console".to_string()] };
    let err = build_surface(&ModeConfig::new(Mode::Js), vec![parse(BASE), parse(&js)], &js_profile(), options)
        .unwrap_err();
    let codes: Vec<u32> = err.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![diagnostic_codes::CAPABILITY_VIOLATION]);
}

#[test]
fn test_deprecated_set_warns_but_builds() {
    let js = JS.replace("mode=\"js\"", "mode=\"js\" deprecated=\"true\"");
    let sets = vec![parse(BASE), parse(&js)];
    let validated = build_surface(&ModeConfig::new(Mode::Js), sets, &js_profile(), PipelineOptions::default()).unwrap();
    assert_eq!(validated.warnings().len(), 1);
    assert_eq!(validated.warnings()[0].code, diagnostic_codes::DEPRECATED_DECLARATION_SET);
    assert!(!validated.warnings()[0].is_error());
}

#[test]
fn test_profile_for_another_mode_is_rejected() {
    let err = build_surface(
        &ModeConfig::new(Mode::Js),
        vec![parse(BASE), parse(JS)],
        &native_profile(),
        PipelineOptions::default(),
    )
    .unwrap_err();
    assert!(err.has_code(diagnostic_codes::MODE_MISMATCH));
}
