//! jsm: mode-aware JavaScript global type surfaces.
//!
//! The workspace is split the same way the tools run:
//!
//! - [`jsm_common`]: diagnostics, spans, line maps and limits
//! - [`jsm_syntax`]: scanner and parser for declaration files
//! - [`jsm_surface`]: binding, merging, validation and publishing
//! - [`jsm_libs`]: the embedded reference declaration sets and profiles
//!
//! This crate re-exports the surface API and adds the `jsm` command line
//! driver with its `jsmconfig.json` loader.

pub use jsm_common::{DefectKind, Diagnostic, DiagnosticCategory, LineMap, Span, diagnostic_codes};
pub use jsm_libs::{all_sets, get_set, load_set, load_with_references, profile_for};
pub use jsm_surface::{
    CapabilityProfile, DeclarationSet, GlobalTypeSurface, Mode, ModeConfig, Pipeline, PipelineOptions, Stage,
    SurfaceError, SurfaceRegistry, build_surface, global, parse_declaration_set, publish_global,
};

// Tracing configuration (text / tree / JSON output)
pub mod tracing_config;

// Command-line driver
#[cfg(feature = "cli")]
pub mod cli;
