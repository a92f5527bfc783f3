use jsm_common::diagnostic_codes;

use crate::capability::{CapabilityProfile, Requirement, check_exclusions, coverage_diagnostics, validate_coverage};
use crate::mode::Mode;
use crate::test_support::set_with;

#[test]
fn test_coverage_reports_each_missing_requirement() {
    let set = set_with(
        "js",
        Some("js"),
        "interface Array<T> { length: int; map<U>(f: (value: T) => U): U[]; }\ndeclare var console: Console;",
    );
    let profile = CapabilityProfile::new(Mode::Js)
        .require_members("Array", &["length", "map", "filter"])
        .require_members("Map", &["get"])
        .require_globals(&["console", "Math"]);

    let missing = validate_coverage(&profile, &set.declarations).unwrap_err();
    let text: Vec<String> = missing.iter().map(ToString::to_string).collect();
    assert_eq!(text, vec!["Array.filter", "Map.get", "Math"]);

    let diagnostics = coverage_diagnostics(&profile, &missing);
    assert_eq!(diagnostics[0].code, diagnostic_codes::MISSING_REQUIRED_MEMBER);
    assert_eq!(
        diagnostics[0].message_text,
        "Mode 'js' requires member 'filter' on 'Array', but the merged surface does not declare it."
    );
    assert_eq!(diagnostics[2].code, diagnostic_codes::MISSING_REQUIRED_GLOBAL);
}

#[test]
fn test_inherited_members_count_and_cycles_terminate() {
    let set = set_with(
        "js",
        Some("js"),
        "interface Error { message: string; }\ninterface TypeError extends Error {}\n\
         interface A extends B {}\ninterface B extends A {}",
    );
    let profile = CapabilityProfile::new(Mode::Js)
        .require_members("TypeError", &["message"])
        .require_members("A", &["x"]);
    let missing = validate_coverage(&profile, &set.declarations).unwrap_err();
    assert_eq!(
        missing,
        vec![Requirement::Member { interface: "A".to_string(), member: "x".to_string() }]
    );
}

#[test]
fn test_types_satisfy_global_requirements() {
    let set = set_with("js", Some("js"), "interface PropertyKey {}\ntype Partial<T> = T;");
    let profile = CapabilityProfile::new(Mode::Js).require_globals(&["PropertyKey", "Partial"]);
    assert!(validate_coverage(&profile, &set.declarations).is_ok());
}

#[test]
fn test_exclude_deduplicates() {
    let profile = CapabilityProfile::new(Mode::HostNative).exclude(["fetch", "window", "fetch"]);
    assert_eq!(profile.excluded, vec!["fetch", "window"]);
    assert!(profile.is_excluded("window"));
    assert!(!profile.is_excluded("Window"));
}

#[test]
fn test_declared_excluded_name_is_a_violation() {
    let set = set_with(
        "native",
        Some("host-native"),
        "interface Response { ok: boolean; }\ndeclare function fetch(url: string): Promise<Response>;",
    );
    let profile = CapabilityProfile::new(Mode::HostNative).exclude(["fetch", "Response"]);
    let diagnostics = check_exclusions(&profile, &set.declarations);
    let codes: Vec<u32> = diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![
            diagnostic_codes::CAPABILITY_VIOLATION,
            diagnostic_codes::CAPABILITY_VIOLATION,
            diagnostic_codes::CAPABILITY_REACHABLE,
        ]
    );
    assert_eq!(
        diagnostics[0].message_text,
        "Capability violation: 'fetch' is excluded from mode 'host-native' but is declared by 'native'."
    );
    assert_eq!(diagnostics[0].file, "native.d.ts");
    assert_eq!(
        diagnostics[2].message_text,
        "Capability violation: 'Response' is excluded from mode 'host-native' but is reachable through 'fetch'."
    );
}

#[test]
fn test_excluded_name_reachable_through_members() {
    let set = set_with(
        "native",
        Some("host-native"),
        "interface Globals { win: Window; all(): Window[]; host: NodeJS.Process; }\n\
         interface Array<T> { length: int; }",
    );
    let profile = CapabilityProfile::new(Mode::HostNative).exclude(["Window", "NodeJS"]);
    let diagnostics = check_exclusions(&profile, &set.declarations);
    let messages: Vec<&str> = diagnostics.iter().map(|d| d.message_text.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Capability violation: 'Window' is excluded from mode 'host-native' but is reachable through 'Globals.win'.",
            "Capability violation: 'NodeJS' is excluded from mode 'host-native' but is reachable through 'Globals.host'.",
        ]
    );
}

#[test]
fn test_empty_exclusions_check_nothing() {
    let set = set_with("js", Some("js"), "declare function fetch(url: string): any;");
    assert!(check_exclusions(&CapabilityProfile::new(Mode::Js), &set.declarations).is_empty());
}
