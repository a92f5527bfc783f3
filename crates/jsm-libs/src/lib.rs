//! Reference declaration sets for jsm.
//!
//! The `.d.ts` sources under `lib/` are embedded with `include_str!`, so the
//! tools work without any files installed next to them:
//!
//! - `base`: the minimal core every mode shares, including `type int = number`
//! - `js`: full JavaScript semantics
//! - `js.legacy`: deprecated sibling of `js` with plain `number` lengths
//! - `host-native`: the native collection surface
//!
//! [`profile_for`] returns the capability profile each mode is validated
//! against.
//!
//! ```
//! use jsm_libs::{load_with_references, profile_for};
//! use jsm_surface::{Mode, ModeConfig, PipelineOptions, build_surface};
//!
//! let sets = load_with_references("js").unwrap();
//! let surface = build_surface(
//!     &ModeConfig::new(Mode::Js),
//!     sets,
//!     &profile_for(Mode::Js),
//!     PipelineOptions::default(),
//! )
//! .unwrap()
//! .publish();
//! assert!(surface.resolve_member("Array.map").is_some());
//! ```

pub mod catalog;
pub mod profiles;

pub use catalog::{
    ALL_SETS, EmbeddedSet, all_sets, default_set_for, get_set, get_set_by_file_name, load_set, load_with_references,
    parse_set_references, resolve_with_references,
};
pub use profiles::{HOST_NATIVE_EXCLUSIONS, JS_ARRAY_MEMBERS, profile_for};

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod catalog_tests;

#[cfg(test)]
#[path = "tests/profiles_tests.rs"]
mod profiles_tests;
