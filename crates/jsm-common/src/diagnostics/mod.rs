//! Diagnostic types and message lookup.
//!
//! Every authoring or configuration defect is reported as a [`Diagnostic`]
//! with a stable code from [`diagnostic_codes`]. Message templates live in
//! `data.rs` and use `{0}`, `{1}`, ... placeholders.

use serde::Serialize;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// Related information for a diagnostic (e.g., the other side of a conflict).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// An authoring-time or configuration-time defect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Related information spans (e.g., where the base member was declared)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Create a diagnostic from the message table, filling `{n}` placeholders.
    ///
    /// The category comes from the table; unknown codes become errors with the
    /// raw arguments joined as the message.
    #[must_use]
    pub fn from_code(file: impl Into<String>, start: u32, length: u32, code: u32, args: &[&str]) -> Self {
        let (category, message_text) = match get_diagnostic_message(code) {
            Some(message) => (message.category, format_message(message.message, args)),
            None => (DiagnosticCategory::Error, args.join(" ")),
        };
        Self {
            file: file.into(),
            start,
            length,
            message_text,
            category,
            code,
            related_information: Vec::new(),
        }
    }

    /// A diagnostic that is not tied to any source location.
    #[must_use]
    pub fn global(code: u32, args: &[&str]) -> Self {
        Self::from_code(String::new(), 0, 0, code, args)
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, file: String, start: u32, length: u32, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Which defect family this diagnostic belongs to.
    pub fn kind(&self) -> DefectKind {
        DefectKind::of(self.code)
    }
}

/// Families of defects, used by callers that only care about the broad cause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DefectKind {
    Syntax,
    Configuration,
    AmbiguousMode,
    IncompatibleMerge,
    IncompleteMode,
    CapabilityViolation,
    IndexInconsistency,
    Note,
}

impl DefectKind {
    pub fn of(code: u32) -> DefectKind {
        use diagnostic_codes as c;
        match code {
            1000..=1999 => DefectKind::Syntax,
            c::AMBIGUOUS_MODE => DefectKind::AmbiguousMode,
            5002..=5009 => DefectKind::Configuration,
            5010..=5019 => DefectKind::IncompatibleMerge,
            5020..=5029 => DefectKind::IncompleteMode,
            5030..=5039 => DefectKind::CapabilityViolation,
            c::INDEX_TYPE_INCONSISTENCY => DefectKind::IndexInconsistency,
            _ => DefectKind::Note,
        }
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}
