use indexmap::IndexMap;

use crate::decl::TypeDecl;
use crate::relate::{AssignabilityChecker, expand_alias, is_assignable};
use crate::test_support::{set_with, ty};

fn assignable(source: &str, target: &str) -> bool {
    is_assignable(&ty(source), &ty(target))
}

#[test]
fn test_int_and_number_are_interchangeable() {
    assert!(assignable("int", "number"));
    assert!(assignable("number", "int"));
    assert!(assignable("int[]", "number[]"));
}

#[test]
fn test_numeric_literals_against_int() {
    assert!(assignable("-1", "int"));
    assert!(assignable("0 | -1", "int"));
    assert!(!assignable("1.5", "int"));
    assert!(assignable("1.5", "number"));
    assert!(!assignable("string", "int"));
}

#[test]
fn test_top_and_bottom_types() {
    assert!(assignable("string", "any"));
    assert!(assignable("Foo<T>", "unknown"));
    assert!(assignable("never", "string"));
    assert!(assignable("any", "int"));
    assert!(!assignable("unknown", "string"));
}

#[test]
fn test_unions_and_intersections() {
    assert!(assignable("string", "string | undefined"));
    assert!(!assignable("string | undefined", "string"));
    assert!(assignable("A & B", "A"));
    assert!(!assignable("A", "A & B"));
}

#[test]
fn test_array_spellings() {
    assert!(assignable("Array<int>", "number[]"));
    assert!(assignable("T[]", "ReadonlyArray<T>"));
    assert!(assignable("T[]", "readonly T[]"));
    assert!(!assignable("readonly T[]", "T[]"));
    assert!(assignable("[int, int]", "number[]"));
}

#[test]
fn test_function_types() {
    assert!(assignable("(value: T) => int", "(value: T, index: int) => number"));
    assert!(!assignable("(value: T, index: int) => void", "(value: T) => void"));
    assert!(assignable("(value: T) => string", "(value: T) => void"));
    assert!(assignable("(value: T) => value is S", "(value: T) => boolean"));
}

#[test]
fn test_object_literal_types() {
    assert!(assignable("{ a: int; b: string; }", "{ a: number; }"));
    assert!(assignable("{ a: int; }", "{ a: int; b?: string; }"));
    assert!(!assignable("{ a: string; }", "{ a: int; }"));
    assert!(assignable("{ a: int; }", "object"));
    assert!(!assignable("string", "object"));
}

#[test]
fn test_aliases_are_expanded_with_type_information() {
    let set = set_with("base", None, "type Count = int;\ntype Label = string;");
    let aliases: IndexMap<String, TypeDecl> = set.declarations.types.clone();
    let mut checker = AssignabilityChecker::with_types(&aliases);
    assert!(checker.is_assignable(&ty("Count"), &ty("number")));
    assert!(!checker.is_assignable(&ty("Label"), &ty("number")));
    assert!(!is_assignable(&ty("Count"), &ty("number")));
}

#[test]
fn test_expand_alias_skips_generic_aliases_and_int() {
    let set = set_with("base", None, "type int = number;\ntype Num = number;\ntype Box<T> = T[];");
    let types = &set.declarations.types;
    assert_eq!(expand_alias(types, &ty("Num")), Some(&ty("number")));
    assert_eq!(expand_alias(types, &ty("int")), None);
    assert_eq!(expand_alias(types, &ty("Box")), None);
    assert_eq!(expand_alias(types, &ty("Missing")), None);
}

#[test]
fn test_generic_signatures_compare_up_to_renaming() {
    let base = set_with("base", None, "interface A<T> { map<U>(f: (value: T) => U): U[]; }");
    let ext = set_with("ext", Some("js"), "interface A<T> { map<V>(f: (value: T) => V): V[]; }");
    let wanted = &base.interface("A").unwrap().member("map").unwrap().kind;
    let offered = &ext.interface("A").unwrap().member("map").unwrap().kind;
    let mut checker = AssignabilityChecker::new();
    assert!(checker.overloads_cover(offered.overloads().unwrap(), wanted.overloads().unwrap()));
}

#[test]
fn test_signature_arity_coverage() {
    let base = set_with("base", None, "interface A { f(a: int, b?: int): void; g(...xs: int[]): int; }");
    let ext = set_with(
        "ext",
        Some("js"),
        "interface A { f(a: int): void; g(x: int): int; }",
    );
    let mut checker = AssignabilityChecker::new();
    let member = |set: &crate::decl::DeclarationSet, name: &str| {
        set.interface("A").unwrap().member(name).unwrap().kind.overloads().unwrap().clone()
    };
    // Dropping an optional parameter loses callers passing two arguments.
    assert!(!checker.overloads_cover(&member(&ext, "f"), &member(&base, "f")));
    // A bounded signature cannot serve a rest signature.
    assert!(!checker.overloads_cover(&member(&ext, "g"), &member(&base, "g")));
    // Adding an optional parameter is fine.
    assert!(checker.overloads_cover(&member(&base, "f"), &member(&ext, "f")));
}
