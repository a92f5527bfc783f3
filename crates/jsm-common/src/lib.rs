//! Common types and utilities for the jsm tools.
//!
//! This crate provides foundational types used across all jsm crates:
//! - Diagnostics with stable codes (`Diagnostic`, `DiagnosticCategory`, `DefectKind`)
//! - Source spans (`Span`)
//! - Position/line-map types for rendering byte offsets as line/column
//! - Centralized limits

// Diagnostics, message templates and defect classification
pub mod diagnostics;
pub use diagnostics::{
    DefectKind, Diagnostic, DiagnosticCategory, DiagnosticMessage, DiagnosticRelatedInformation,
    diagnostic_codes, format_message, get_message_template,
};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Centralized limits
pub mod limits;

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod diagnostics_tests;
#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod position_tests;
