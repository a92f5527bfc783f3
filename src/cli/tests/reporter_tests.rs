use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};

use super::reporter::Reporter;

const SOURCE: &str = "interface Array<T> {\n    length: number;\n}\n";

fn reporter() -> Reporter {
    let mut reporter = Reporter::new(false);
    reporter.add_source("legacy.d.ts", SOURCE);
    reporter
}

#[test]
fn formats_location_code_and_snippet() {
    let start = SOURCE.find("length").expect("member in source") as u32;
    let diagnostic = Diagnostic::error("legacy.d.ts".to_string(), start, 6, "bad length".to_string(), 5040);

    let output = reporter().format_diagnostic(&diagnostic);

    assert_eq!(
        output,
        "legacy.d.ts:2:5 - error JSM5040: bad length\n 2 |     length: number;\n   |     ~~~~~~"
    );
}

#[test]
fn global_diagnostics_have_no_location() {
    let diagnostic = Diagnostic::global(diagnostic_codes::MISSING_MODE_SET, &["js"]);

    let output = reporter().format_diagnostic(&diagnostic);

    assert_eq!(output, "jsm - error JSM5002: No declaration set is installed for mode 'js'.");
}

#[test]
fn warnings_use_their_category() {
    let diagnostic =
        Diagnostic::from_code("legacy.d.ts", 0, 0, diagnostic_codes::DEPRECATED_DECLARATION_SET, &["js.legacy"]);

    let output = reporter().format_diagnostic(&diagnostic);

    assert!(output.starts_with("legacy.d.ts:1:1 - warning JSM5041: "), "{output}");
    assert!(!output.contains('~'));
}

#[test]
fn related_information_is_listed_with_its_snippet() {
    let start = SOURCE.find("Array").expect("name in source") as u32;
    let diagnostic = Diagnostic::error("legacy.d.ts".to_string(), start, 5, "conflict".to_string(), 5010)
        .with_related("legacy.d.ts".to_string(), start, 5, "first declared here".to_string());

    let output = reporter().format_diagnostic(&diagnostic);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[3], "  Related: legacy.d.ts:1:11 - first declared here");
    assert_eq!(lines[4], " 1 | interface Array<T> {");
    assert_eq!(lines[5], format!("   | {}~~~~~", " ".repeat(10)));
}

#[test]
fn gutter_widens_with_the_line_number() {
    let source = format!("{}interface Map<K, V> {{\n\tsize: number;\n}}\n", "\n".repeat(11));
    let start = source.find("size").expect("member in source") as u32;
    let mut reporter = Reporter::new(false);
    reporter.add_source("tabs.d.ts", source);
    let diagnostic = Diagnostic::error("tabs.d.ts".to_string(), start, 4, "bad size".to_string(), 5040);

    let output = reporter.format_diagnostic(&diagnostic);

    assert_eq!(
        output,
        "tabs.d.ts:13:2 - error JSM5040: bad size\n 13 |     size: number;\n    |     ~~~~"
    );
}

#[test]
fn unknown_files_fall_back_to_the_file_name() {
    let diagnostic = Diagnostic::from_code("missing/set.d.ts", 10, 3, diagnostic_codes::TYPE_EXPECTED, &[]);

    let output = Reporter::new(false).format_diagnostic(&diagnostic);

    assert_eq!(output, "missing/set.d.ts - error JSM1006: Type expected.");
}

#[test]
fn render_separates_diagnostics_with_newlines() {
    let diagnostics = vec![
        Diagnostic::global(diagnostic_codes::MISSING_BASE_SET, &[]),
        Diagnostic::global(diagnostic_codes::MISSING_MODE_SET, &["host-native"]),
    ];

    let output = reporter().render(&diagnostics);

    assert_eq!(output.lines().count(), 2);
    assert!(output.lines().all(|line| line.starts_with("jsm - error JSM500")));
}
