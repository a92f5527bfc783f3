//! Mode-aware global type surfaces.
//!
//! A surface is built from declaration sets in four steps:
//!
//! 1. [`mode::select_mode`] picks the base set and the single set realising
//!    the configured [`Mode`].
//! 2. [`merge::merge_sets`] folds them into one namespace, recording
//!    conflicts.
//! 3. Validation checks the result against the mode's
//!    [`CapabilityProfile`] and the index type rules ([`audit`]).
//! 4. The [`GlobalTypeSurface`] is published as an immutable `Arc`,
//!    optionally into the process-wide [`registry`].
//!
//! [`Pipeline`] strings the steps together as a typestate.

pub mod audit;
pub mod bind;
pub mod capability;
pub mod decl;
pub mod error;
pub mod index;
pub mod merge;
pub mod mode;
pub mod pipeline;
pub mod printer;
pub mod registry;
pub mod relate;
pub mod surface;

pub use bind::{bind_source_file, parse_declaration_set};
pub use capability::{CapabilityProfile, Requirement, check_exclusions, validate_coverage};
pub use decl::{
    DeclarationSet, Declarations, InterfaceDecl, Member, MemberFlags, MemberKey, MemberKind, SetKind, TypeDecl,
    TypeExpr, ValueDecl,
};
pub use error::SurfaceError;
pub use merge::{MergeConflict, Merged, merge_interfaces, merge_sets};
pub use mode::{Mode, ModeConfig, ModeSet, Selection, select_mode};
pub use pipeline::{
    MergedSurface, ModeSelected, Pipeline, PipelineOptions, Stage, ValidatedSurface, build_surface,
};
pub use registry::{SurfaceRegistry, global, publish_global};
pub use surface::{GlobalTypeSurface, SetInfo};

#[cfg(test)]
#[path = "tests/test_support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod index_tests;

#[cfg(test)]
#[path = "tests/relate_tests.rs"]
mod relate_tests;

#[cfg(test)]
#[path = "tests/bind_tests.rs"]
mod bind_tests;

#[cfg(test)]
#[path = "tests/merge_tests.rs"]
mod merge_tests;

#[cfg(test)]
#[path = "tests/mode_tests.rs"]
mod mode_tests;

#[cfg(test)]
#[path = "tests/capability_tests.rs"]
mod capability_tests;

#[cfg(test)]
#[path = "tests/audit_tests.rs"]
mod audit_tests;

#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod printer_tests;
