use crate::parse_source_file;
use crate::ast::{Statement, TypeNode};

fn alias_type(source: &str) -> TypeNode {
    let file = parse_source_file("test.d.ts", source);
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    match file.statements.into_iter().next() {
        Some(Statement::TypeAlias(alias)) => alias.ty,
        other => panic!("expected type alias, got {other:?}"),
    }
}

fn roundtrip(text: &str) -> String {
    alias_type(&format!("type X = {text};")).to_string()
}

#[test]
fn test_canonical_spacing() {
    assert_eq!(roundtrip("Map<string,int>"), "Map<string, int>");
    assert_eq!(roundtrip("|'a'|'b'"), "\"a\" | \"b\"");
    assert_eq!(roundtrip("{a:int,b?:string}"), "{ a: int; b?: string; }");
}

#[test]
fn test_parens_are_kept_where_needed() {
    assert_eq!(roundtrip("(string | number)[]"), "(string | number)[]");
    assert_eq!(roundtrip("(() => void) | null"), "(() => void) | null");
    assert_eq!(roundtrip("(A | B) & C"), "(A | B) & C");
    assert_eq!(roundtrip("readonly T[]"), "readonly T[]");
}

#[test]
fn test_signatures_and_tuples() {
    assert_eq!(
        roundtrip("<U>(value: T, index: int, ...rest: any[]) => U"),
        "<U>(value: T, index: int, ...rest: any[]) => U"
    );
    assert_eq!(roundtrip("new (x?: int) => Foo"), "new (x?: int) => Foo");
    assert_eq!(roundtrip("[int, string?, ...boolean[]]"), "[int, string?, ...boolean[]]");
    assert_eq!(roundtrip("-1 | 0"), "-1 | 0");
}
