use jsm_common::{DefectKind, diagnostic_codes};

use crate::audit::audit_index_types;
use crate::test_support::set_with;

fn messages(body: &str) -> Vec<String> {
    let set = set_with("js", Some("js"), body);
    audit_index_types(&set.declarations)
        .into_iter()
        .inspect(|d| {
            assert_eq!(d.code, diagnostic_codes::INDEX_TYPE_INCONSISTENCY);
            assert_eq!(d.kind(), DefectKind::IndexInconsistency);
        })
        .map(|d| d.message_text)
        .collect()
}

#[test]
fn test_index_typed_surface_is_clean() {
    let found = messages(
        r#"interface Array<T> {
    readonly length: int;
    [n: int]: T;
    indexOf(searchElement: T, fromIndex?: int): int;
    findIndex(predicate: (value: T, index: int, obj: T[]) => unknown): int;
    slice(start?: int, end?: int): T[];
    push(...items: T[]): int;
}
interface String { charCodeAt(index: int): number; search(regexp: string): int; }
interface Map<K, V> { readonly size: int; }
declare function parseFloat(string: string): number;
"#,
    );
    assert!(found.is_empty(), "{found:#?}");
}

#[test]
fn test_number_typed_positions_are_reported() {
    let found = messages(
        r#"interface Array<T> {
    length: number;
    [n: number]: T;
    indexOf(searchElement: T, fromIndex?: number): number | -1;
    map<U>(f: (value: T, index: number) => U): U[];
}
"#,
    );
    assert_eq!(
        found,
        vec![
            "'length' of 'Array' denotes an index, length or position and must use 'int', found 'number'.",
            "'[n: number]: T' of 'Array' denotes an index, length or position and must use 'int', found 'number'.",
            "'return type' of 'Array.indexOf' denotes an index, length or position and must use 'int', found 'number | -1'.",
            "'parameter fromIndex' of 'Array.indexOf' denotes an index, length or position and must use 'int', found 'number'.",
            "'parameter index' of 'Array.map callback' denotes an index, length or position and must use 'int', found 'number'.",
        ]
    );
}

#[test]
fn test_global_functions_and_function_typed_properties() {
    let found = messages(
        "interface Ops { splice: (start: number) => void; }\ndeclare function setLength(count: number): void;",
    );
    assert_eq!(found.len(), 2);
    assert!(found[0].contains("'Ops.splice'"));
    assert!(found[1].contains("'parameter count' of 'setLength'"));
}

#[test]
fn test_unrelated_numbers_are_left_alone() {
    let found = messages("interface Math { PI: number; max(...values: number[]): number; }");
    assert!(found.is_empty(), "{found:#?}");
}

#[test]
fn test_aliases_are_expanded_before_classifying() {
    let found = messages(
        r#"type int = number;
type Num = number;
type Pos = int;
interface Foo { length: Num; size: Pos; }
interface Baz { indexOf(x: string): Num; }
"#,
    );
    assert_eq!(
        found,
        vec![
            "'length' of 'Foo' denotes an index, length or position and must use 'int', found 'Num'.",
            "'return type' of 'Baz.indexOf' denotes an index, length or position and must use 'int', found 'Num'.",
        ]
    );
}

#[test]
fn test_non_numeric_index_positions_are_reported() {
    let found = messages("interface Bar { length: string; at(index: any): void; }");
    assert_eq!(found.len(), 2, "{found:#?}");
    assert!(found[0].contains("'length' of 'Bar'") && found[0].ends_with("found 'string'."));
    assert!(found[1].contains("'parameter index' of 'Bar.at'"));
}

#[test]
fn test_split_and_substr_parameters_are_checked() {
    let found = messages(
        r#"interface String {
    split(separator: string, limit?: number): string[];
    substr(from: number, length?: number): string;
}
interface Array<T> {
    reduce<U>(callbackfn: (previous: U, current: T, currentIndex: number) => U, initial: U): U;
}
"#,
    );
    assert_eq!(
        found,
        vec![
            "'parameter limit' of 'String.split' denotes an index, length or position and must use 'int', found 'number'.",
            "'parameter from' of 'String.substr' denotes an index, length or position and must use 'int', found 'number'.",
            "'parameter length' of 'String.substr' denotes an index, length or position and must use 'int', found 'number'.",
            "'parameter currentIndex' of 'Array.reduce callback' denotes an index, length or position and must use 'int', found 'number'.",
        ]
    );
}

#[test]
fn test_target_is_only_checked_when_numeric() {
    let found = messages(
        r#"interface ObjectConstructor { assign(target: object, ...sources: any[]): any; }
interface Array<T> { copyWithin(target: number, start: int): this; }
"#,
    );
    assert_eq!(found.len(), 1, "{found:#?}");
    assert!(found[0].contains("'parameter target' of 'Array.copyWithin'"));
}

#[test]
fn test_aliased_index_signature_key_is_reported() {
    let found = messages("type Num = number;\ninterface List { [i: Num]: string; [key: string]: any; }");
    assert_eq!(found.len(), 1, "{found:#?}");
    assert!(found[0].ends_with("found 'Num'."));
}
