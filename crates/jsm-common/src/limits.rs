//! Centralized limits for the reader and the merge pipeline.
//!
//! Declaration sets are authored by hand, so these only guard against
//! pathological input (runaway nesting, reference cycles that slip past the
//! visited set) rather than tuning performance.

/// Maximum nesting depth for type expressions while parsing.
///
/// `Array<Array<Array<...>>>` or deeply parenthesised unions beyond this depth
/// produce a syntax diagnostic instead of overflowing the stack.
pub const MAX_TYPE_NESTING_DEPTH: u32 = 128;

/// Maximum depth when walking type expressions during relation checks and
/// reachability scans.
pub const MAX_RELATION_DEPTH: u32 = 64;

/// Maximum number of `/// <reference set="..." />` hops followed from one root set.
pub const MAX_REFERENCE_DEPTH: usize = 32;

/// Maximum number of diagnostics reported for a single source file before the
/// parser gives up on it.
pub const MAX_DIAGNOSTICS_PER_FILE: usize = 100;
