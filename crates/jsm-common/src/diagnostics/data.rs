//! Diagnostic message table.
//!
//! Codes are stable: tooling and tests match on them. Keep the table sorted.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    // Syntax (1xxx)
    pub const EXPECTED_TOKEN: u32 = 1001;
    pub const UNEXPECTED_TOKEN: u32 = 1002;
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1003;
    pub const UNTERMINATED_COMMENT: u32 = 1004;
    pub const INVALID_CHARACTER: u32 = 1005;
    pub const TYPE_EXPECTED: u32 = 1006;
    pub const DECLARATION_EXPECTED: u32 = 1007;
    pub const MALFORMED_DIRECTIVE: u32 = 1008;
    pub const MISSING_SET_HEADER: u32 = 1009;
    pub const TYPE_NESTING_TOO_DEEP: u32 = 1010;
    pub const UNKNOWN_MODE: u32 = 1011;
    pub const TOO_MANY_ERRORS: u32 = 1012;

    // Configuration / mode selection (500x)
    pub const AMBIGUOUS_MODE: u32 = 5001;
    pub const MISSING_MODE_SET: u32 = 5002;
    pub const MODE_MISMATCH: u32 = 5003;
    pub const MISSING_BASE_SET: u32 = 5004;
    pub const DUPLICATE_BASE_SET: u32 = 5005;
    pub const UNKNOWN_DECLARATION_SET: u32 = 5006;
    pub const DUPLICATE_SET_ID: u32 = 5007;

    // Merge (501x)
    pub const INCOMPATIBLE_MEMBER: u32 = 5010;
    pub const CONFLICTING_TYPE_ALIAS: u32 = 5011;
    pub const CONFLICTING_VALUE: u32 = 5012;
    pub const DECLARATION_KIND_CONFLICT: u32 = 5013;
    pub const TYPE_PARAMETER_MISMATCH: u32 = 5014;

    // Coverage (502x)
    pub const MISSING_REQUIRED_MEMBER: u32 = 5020;
    pub const MISSING_REQUIRED_GLOBAL: u32 = 5021;

    // Capability exclusion (503x)
    pub const CAPABILITY_VIOLATION: u32 = 5030;
    pub const CAPABILITY_REACHABLE: u32 = 5031;

    // Index type consistency (504x)
    pub const INDEX_TYPE_INCONSISTENCY: u32 = 5040;
    pub const DEPRECATED_DECLARATION_SET: u32 = 5041;
}

use diagnostic_codes as c;
use DiagnosticCategory::{Error, Warning};

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage { code: c::EXPECTED_TOKEN, category: Error, message: "'{0}' expected." },
    DiagnosticMessage { code: c::UNEXPECTED_TOKEN, category: Error, message: "Unexpected token '{0}'." },
    DiagnosticMessage {
        code: c::UNTERMINATED_STRING_LITERAL,
        category: Error,
        message: "Unterminated string literal.",
    },
    DiagnosticMessage { code: c::UNTERMINATED_COMMENT, category: Error, message: "'*/' expected." },
    DiagnosticMessage { code: c::INVALID_CHARACTER, category: Error, message: "Invalid character." },
    DiagnosticMessage { code: c::TYPE_EXPECTED, category: Error, message: "Type expected." },
    DiagnosticMessage { code: c::DECLARATION_EXPECTED, category: Error, message: "Declaration expected." },
    DiagnosticMessage { code: c::MALFORMED_DIRECTIVE, category: Error, message: "Malformed directive '{0}'." },
    DiagnosticMessage {
        code: c::MISSING_SET_HEADER,
        category: Error,
        message: "File '{0}' has no '/// <set id=\"...\" />' header.",
    },
    DiagnosticMessage {
        code: c::TYPE_NESTING_TOO_DEEP,
        category: Error,
        message: "Type nesting exceeds the maximum depth of {0}.",
    },
    DiagnosticMessage { code: c::UNKNOWN_MODE, category: Error, message: "Unknown mode '{0}'. Expected one of: {1}." },
    DiagnosticMessage {
        code: c::TOO_MANY_ERRORS,
        category: Error,
        message: "Too many errors in '{0}'; the rest of the file was skipped.",
    },
    DiagnosticMessage {
        code: c::AMBIGUOUS_MODE,
        category: Error,
        message: "Ambiguous mode: declaration sets {0} are mode-specific and cannot be active together.",
    },
    DiagnosticMessage {
        code: c::MISSING_MODE_SET,
        category: Error,
        message: "No declaration set is installed for mode '{0}'.",
    },
    DiagnosticMessage {
        code: c::MODE_MISMATCH,
        category: Error,
        message: "Mode '{0}' is configured but declaration set '{1}' realizes mode '{2}'.",
    },
    DiagnosticMessage { code: c::MISSING_BASE_SET, category: Error, message: "No base declaration set is installed." },
    DiagnosticMessage {
        code: c::DUPLICATE_BASE_SET,
        category: Error,
        message: "Only one base declaration set may be active, found {0}.",
    },
    DiagnosticMessage { code: c::UNKNOWN_DECLARATION_SET, category: Error, message: "Unknown declaration set '{0}'." },
    DiagnosticMessage {
        code: c::DUPLICATE_SET_ID,
        category: Error,
        message: "Declaration set '{0}' is provided by both '{1}' and '{2}'.",
    },
    DiagnosticMessage {
        code: c::INCOMPATIBLE_MEMBER,
        category: Error,
        message: "Member '{0}' of '{1}' is declared as '{2}' in '{3}' and as incompatible '{4}' in '{5}'.",
    },
    DiagnosticMessage {
        code: c::CONFLICTING_TYPE_ALIAS,
        category: Error,
        message: "Type alias '{0}' is declared as '{1}' in '{2}' and as '{3}' in '{4}'.",
    },
    DiagnosticMessage {
        code: c::CONFLICTING_VALUE,
        category: Error,
        message: "Global '{0}' is declared with type '{1}' in '{2}' and '{3}' in '{4}'.",
    },
    DiagnosticMessage {
        code: c::DECLARATION_KIND_CONFLICT,
        category: Error,
        message: "'{0}' is declared as {1} in '{2}' and as {3} in '{4}'.",
    },
    DiagnosticMessage {
        code: c::TYPE_PARAMETER_MISMATCH,
        category: Error,
        message: "All declarations of '{0}' must have identical type parameters: {1} in '{2}', {3} in '{4}'.",
    },
    DiagnosticMessage {
        code: c::MISSING_REQUIRED_MEMBER,
        category: Error,
        message: "Mode '{0}' requires member '{1}' on '{2}', but the merged surface does not declare it.",
    },
    DiagnosticMessage {
        code: c::MISSING_REQUIRED_GLOBAL,
        category: Error,
        message: "Mode '{0}' requires global '{1}', but the merged surface does not declare it.",
    },
    DiagnosticMessage {
        code: c::CAPABILITY_VIOLATION,
        category: Error,
        message: "Capability violation: '{0}' is excluded from mode '{1}' but is declared by '{2}'.",
    },
    DiagnosticMessage {
        code: c::CAPABILITY_REACHABLE,
        category: Error,
        message: "Capability violation: '{0}' is excluded from mode '{1}' but is reachable through '{2}'.",
    },
    DiagnosticMessage {
        code: c::INDEX_TYPE_INCONSISTENCY,
        category: Error,
        message: "'{0}' of '{1}' denotes an index, length or position and must use '{2}', found '{3}'.",
    },
    DiagnosticMessage {
        code: c::DEPRECATED_DECLARATION_SET,
        category: Warning,
        message: "Declaration set '{0}' is deprecated.",
    },
];
