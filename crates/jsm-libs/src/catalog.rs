//! The embedded declaration sets and how they are looked up, resolved and
//! loaded.

use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};
use jsm_common::limits::MAX_REFERENCE_DEPTH;
use jsm_surface::{DeclarationSet, Mode, SurfaceError, parse_declaration_set};
use once_cell::sync::OnceCell;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

/// A declaration set compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSet {
    /// Set id as declared in the header (e.g. "base", "js.legacy")
    pub id: &'static str,
    pub file_name: &'static str,
    pub content: &'static str,
}

// =============================================================================
// Embedded sets
// =============================================================================

/// Core types shared by every mode.
pub const SET_BASE: EmbeddedSet = EmbeddedSet {
    id: "base",
    file_name: "base.d.ts",
    content: include_str!("../lib/base.d.ts"),
};

/// Full JavaScript semantics.
pub const SET_JS: EmbeddedSet = EmbeddedSet {
    id: "js",
    file_name: "js.d.ts",
    content: include_str!("../lib/js.d.ts"),
};

/// Deprecated plain-`number` sibling of `js`.
pub const SET_JS_LEGACY: EmbeddedSet = EmbeddedSet {
    id: "js.legacy",
    file_name: "js.legacy.d.ts",
    content: include_str!("../lib/js.legacy.d.ts"),
};

/// Native collection surface.
pub const SET_HOST_NATIVE: EmbeddedSet = EmbeddedSet {
    id: "host-native",
    file_name: "host-native.d.ts",
    content: include_str!("../lib/host-native.d.ts"),
};

const SET_COUNT: usize = 4;

pub static ALL_SETS: [EmbeddedSet; SET_COUNT] = [SET_BASE, SET_JS, SET_JS_LEGACY, SET_HOST_NATIVE];

// Parsed on first use; indexed like `ALL_SETS`.
static PARSED: [OnceCell<Result<DeclarationSet, Vec<Diagnostic>>>; SET_COUNT] =
    [const { OnceCell::new() }; SET_COUNT];

pub fn get_set(id: &str) -> Option<&'static EmbeddedSet> {
    ALL_SETS.iter().find(|set| set.id == id)
}

pub fn get_set_by_file_name(file_name: &str) -> Option<&'static EmbeddedSet> {
    ALL_SETS.iter().find(|set| set.file_name == file_name)
}

pub fn all_sets() -> &'static [EmbeddedSet] {
    &ALL_SETS
}

/// The embedded set realising `mode` by default.
pub fn default_set_for(mode: Mode) -> Option<&'static EmbeddedSet> {
    match mode {
        Mode::Js => Some(&SET_JS),
        Mode::HostNative => Some(&SET_HOST_NATIVE),
        _ => None,
    }
}

/// Ids named by `/// <reference set="..." />` lines in the header.
pub fn parse_set_references(content: &str) -> Vec<&str> {
    let mut refs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !line.starts_with("///") {
            break;
        }
        let rest = line["///".len()..].trim_start();
        if !rest.starts_with("<reference") {
            continue;
        }
        if let Some(start) = rest.find("set=\"") {
            let value = &rest[start + 5..];
            if let Some(end) = value.find('"') {
                refs.push(&value[..end]);
            }
        }
    }
    refs
}

fn unknown_set(id: &str) -> Diagnostic {
    Diagnostic::global(diagnostic_codes::UNKNOWN_DECLARATION_SET, &[id])
}

/// `id` and everything it references, references first, each set once.
pub fn resolve_with_references(id: &str) -> Result<Vec<&'static EmbeddedSet>, Diagnostic> {
    let root = get_set(id).ok_or_else(|| unknown_set(id))?;
    let mut resolved = Vec::new();
    let mut seen = FxHashSet::default();
    visit(root, 0, &mut seen, &mut resolved)?;
    debug!(root = id, resolved = resolved.len(), "resolved set references");
    Ok(resolved)
}

fn visit(
    set: &'static EmbeddedSet,
    depth: usize,
    seen: &mut FxHashSet<&'static str>,
    resolved: &mut Vec<&'static EmbeddedSet>,
) -> Result<(), Diagnostic> {
    if !seen.insert(set.id) {
        return Ok(());
    }
    if depth >= MAX_REFERENCE_DEPTH {
        warn!(set = set.id, depth, "reference chain too deep, not following further");
        resolved.push(set);
        return Ok(());
    }
    for reference in parse_set_references(set.content) {
        let target = get_set(reference).ok_or_else(|| unknown_set(reference))?;
        visit(target, depth + 1, seen, resolved)?;
    }
    resolved.push(set);
    Ok(())
}

/// Parse and bind an embedded set. Each set is parsed at most once per
/// process; callers get their own copy.
pub fn load_set(id: &str) -> Result<DeclarationSet, SurfaceError> {
    let index = ALL_SETS
        .iter()
        .position(|set| set.id == id)
        .ok_or_else(|| SurfaceError::Configuration(vec![unknown_set(id)]))?;
    let embedded = &ALL_SETS[index];
    PARSED[index]
        .get_or_init(|| {
            debug!(set = embedded.id, bytes = embedded.content.len(), "parsing embedded set");
            parse_declaration_set(embedded.file_name, embedded.content)
        })
        .clone()
        .map_err(SurfaceError::Syntax)
}

/// [`load_set`] for `id` and everything it references, references first.
pub fn load_with_references(id: &str) -> Result<Vec<DeclarationSet>, SurfaceError> {
    let resolved = resolve_with_references(id).map_err(|d| SurfaceError::Configuration(vec![d]))?;
    resolved.iter().map(|set| load_set(set.id)).collect()
}
