use jsm_common::diagnostic_codes;

use crate::bind::parse_declaration_set;
use crate::decl::{MemberKey, MemberKind, SetKind, TypeDecl, ValueDecl};
use crate::mode::Mode;
use crate::test_support::{interface, set};

#[test]
fn test_header_is_read() {
    let set = set(r#"/// <set id="js" version="2.0.0" mode="js" deprecated="true" />
/// <reference set="base" />
interface A {}"#);
    assert_eq!(set.id, "js");
    assert_eq!(set.version, "2.0.0");
    assert_eq!(set.kind, SetKind::Mode(Mode::Js));
    assert!(set.deprecated);
    assert_eq!(set.references, vec!["base".to_string()]);
    assert_eq!(set.label(), "js@2.0.0");
}

#[test]
fn test_set_without_mode_is_base() {
    let set = set("/// <set id=\"base\" />\ntype int = number;");
    assert!(set.is_base());
    assert_eq!(set.mode(), None);
    assert_eq!(set.version, "0.0.0");
}

#[test]
fn test_missing_header_and_unknown_mode() {
    let err = parse_declaration_set("a.d.ts", "interface A {}").unwrap_err();
    assert_eq!(err[0].code, diagnostic_codes::MISSING_SET_HEADER);

    let err = parse_declaration_set("b.d.ts", "/// <set id=\"b\" mode=\"browser\" />").unwrap_err();
    assert_eq!(err[0].code, diagnostic_codes::UNKNOWN_MODE);
    assert!(err[0].message_text.contains("js, host-native"));
}

#[test]
fn test_syntax_errors_are_returned() {
    let err = parse_declaration_set("c.d.ts", "/// <set id=\"c\" />\ninterface A { a: ; }").unwrap_err();
    assert!(err.iter().any(|d| d.code == diagnostic_codes::TYPE_EXPECTED), "{err:?}");
}

#[test]
fn test_namespaces_are_separate() {
    let set = set(r#"/// <set id="base" />
interface Array<T> { length: int; }
interface ArrayConstructor { isArray(arg: any): arg is any[]; }
declare var Array: ArrayConstructor;
"#);
    assert!(matches!(set.declarations.types.get("Array"), Some(TypeDecl::Interface(_))));
    assert!(matches!(set.declarations.values.get("Array"), Some(ValueDecl::Variable(_))));
    let names: Vec<&str> = set.global_names().collect();
    assert_eq!(names, vec!["Array", "ArrayConstructor", "Array"]);
}

#[test]
fn test_repeated_methods_gather_overloads() {
    let set = set(r#"/// <set id="base" />
interface A {
    f(x: int): int;
    f(x: string): string;
}
interface A {
    g(): void;
    f(x: boolean): boolean;
}
declare function parse(x: string): int;
declare function parse(x: string, radix: int): int;
"#);
    let a = interface(&set, "A");
    let keys: Vec<String> = a.members.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["f", "g"]);
    assert_eq!(a.member("f").unwrap().kind.overloads().unwrap().len(), 3);
    let Some(ValueDecl::Function(parse)) = set.declarations.values.get("parse") else {
        panic!("expected function");
    };
    assert_eq!(parse.overloads.len(), 2);
}

#[test]
fn test_index_signature_keys() {
    let set = set("/// <set id=\"base\" />\ninterface A { [n: int]: string; [k: string]: any; }");
    let a = interface(&set, "A");
    assert_eq!(a.members.len(), 2);
    let first = a.members.get_index(0).unwrap().0;
    assert_eq!(first.to_string(), "[number]");
    assert!(matches!(a.members.get_index(1).unwrap().1.kind, MemberKind::Index { .. }));
    assert!(a.members.contains_key(&MemberKey::Index(crate::decl::IndexKeyKind::String)));
}

#[test]
fn test_conflicting_redeclarations_in_one_file() {
    let err = parse_declaration_set(
        "d.d.ts",
        "/// <set id=\"d\" />\ntype N = int;\ntype N = string;\ninterface V {}\ndeclare var V: V;\ntype V = int;",
    )
    .unwrap_err();
    let codes: Vec<u32> = err.iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![diagnostic_codes::CONFLICTING_TYPE_ALIAS, diagnostic_codes::DECLARATION_KIND_CONFLICT]
    );
}
