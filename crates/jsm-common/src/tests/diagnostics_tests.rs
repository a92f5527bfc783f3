use crate::diagnostics::{DefectKind, Diagnostic, DiagnosticCategory, diagnostic_codes};
use crate::format_message;

#[test]
fn test_format_message_fills_placeholders_in_order() {
    let text = format_message("'{0}' of '{1}' must use '{2}'", &["length", "Array", "int"]);
    assert_eq!(text, "'length' of 'Array' must use 'int'");
}

#[test]
fn test_from_code_uses_table_category() {
    let warning = Diagnostic::global(diagnostic_codes::DEPRECATED_DECLARATION_SET, &["js.legacy"]);
    assert_eq!(warning.category, DiagnosticCategory::Warning);
    assert_eq!(warning.message_text, "Declaration set 'js.legacy' is deprecated.");
    assert!(!warning.is_error());

    let error = Diagnostic::from_code("js.d.ts", 10, 4, diagnostic_codes::TYPE_EXPECTED, &[]);
    assert!(error.is_error());
    assert_eq!(error.file, "js.d.ts");
    assert_eq!((error.start, error.length), (10, 4));
}

#[test]
fn test_ambiguous_mode_message_names_sets() {
    let diag = Diagnostic::global(diagnostic_codes::AMBIGUOUS_MODE, &["'js', 'host-native'"]);
    assert!(diag.message_text.contains("'js', 'host-native'"));
    assert_eq!(diag.kind(), DefectKind::AmbiguousMode);
}

#[test]
fn test_defect_kind_families() {
    assert_eq!(DefectKind::of(diagnostic_codes::UNEXPECTED_TOKEN), DefectKind::Syntax);
    assert_eq!(DefectKind::of(diagnostic_codes::MODE_MISMATCH), DefectKind::Configuration);
    assert_eq!(
        DefectKind::of(diagnostic_codes::TYPE_PARAMETER_MISMATCH),
        DefectKind::IncompatibleMerge
    );
    assert_eq!(
        DefectKind::of(diagnostic_codes::MISSING_REQUIRED_GLOBAL),
        DefectKind::IncompleteMode
    );
    assert_eq!(
        DefectKind::of(diagnostic_codes::CAPABILITY_REACHABLE),
        DefectKind::CapabilityViolation
    );
    assert_eq!(
        DefectKind::of(diagnostic_codes::INDEX_TYPE_INCONSISTENCY),
        DefectKind::IndexInconsistency
    );
    assert_eq!(DefectKind::of(diagnostic_codes::DEPRECATED_DECLARATION_SET), DefectKind::Note);
}

#[test]
fn test_with_related_keeps_order() {
    let args = ["length", "Array", "int", "base", "string", "js"];
    let diag = Diagnostic::global(diagnostic_codes::INCOMPATIBLE_MEMBER, &args)
        .with_related("base.d.ts".to_string(), 5, 6, "Base declaration".to_string())
        .with_related("js.d.ts".to_string(), 9, 6, "Extension declaration".to_string());
    assert_eq!(diag.related_information.len(), 2);
    assert_eq!(diag.related_information[0].file, "base.d.ts");
    assert_eq!(diag.related_information[1].category, DiagnosticCategory::Message);
}
