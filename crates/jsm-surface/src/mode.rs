//! Modes and mode selection.
//!
//! A mode is realised by exactly one mode-specific declaration set plus the
//! base set. Sets for different modes redeclare the same interfaces with
//! different semantics, so selection refuses anything but exactly one.

use jsm_common::diagnostics::{Diagnostic, diagnostic_codes};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::decl::{DeclarationSet, SetKind};
use crate::error::SurfaceError;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Js,
    HostNative,
}

impl Mode {
    pub const ALL: &'static [Mode] = &[Mode::Js, Mode::HostNative];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Js => "js",
            Mode::HostNative => "host-native",
        }
    }

    /// `js, host-native`, for error messages.
    pub fn expected_list() -> String {
        Mode::ALL.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode '{0}'")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// The active mode-specific declaration set, tagged by the mode it realises.
#[derive(Clone, Debug)]
pub enum ModeSet {
    Js(DeclarationSet),
    HostNative(DeclarationSet),
}

impl ModeSet {
    /// Tag a set by its declared mode; `None` for base sets.
    pub fn from_set(set: DeclarationSet) -> Option<ModeSet> {
        match set.kind {
            SetKind::Base => None,
            SetKind::Mode(Mode::Js) => Some(ModeSet::Js(set)),
            SetKind::Mode(Mode::HostNative) => Some(ModeSet::HostNative(set)),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            ModeSet::Js(_) => Mode::Js,
            ModeSet::HostNative(_) => Mode::HostNative,
        }
    }

    pub fn set(&self) -> &DeclarationSet {
        match self {
            ModeSet::Js(set) | ModeSet::HostNative(set) => set,
        }
    }

    pub fn into_set(self) -> DeclarationSet {
        match self {
            ModeSet::Js(set) | ModeSet::HostNative(set) => set,
        }
    }
}

/// What a project configures: the mode it compiles for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeConfig {
    pub mode: Mode,
}

impl ModeConfig {
    pub fn new(mode: Mode) -> Self {
        ModeConfig { mode }
    }
}

/// Result of mode selection: the base set and the one set realising the mode.
#[derive(Clone, Debug)]
pub struct Selection {
    pub base: DeclarationSet,
    pub extension: ModeSet,
}

impl Selection {
    pub fn mode(&self) -> Mode {
        self.extension.mode()
    }

    /// Base first, then the mode set.
    pub fn sets(&self) -> [&DeclarationSet; 2] {
        [&self.base, self.extension.set()]
    }
}

fn quoted_ids<'a>(sets: impl Iterator<Item = &'a DeclarationSet>) -> String {
    sets.map(|set| format!("'{}'", set.id)).collect::<Vec<_>>().join(", ")
}

/// Pick the base set and the single set realising `config.mode` from the
/// installed sets.
///
/// All configuration defects are reported together: a missing or duplicated
/// base, no mode set, more than one mode set (ambiguous, regardless of which
/// modes they realise), or a single mode set for the wrong mode.
#[tracing::instrument(level = "debug", skip(installed), fields(installed = installed.len()))]
pub fn select_mode(config: &ModeConfig, installed: &[DeclarationSet]) -> Result<Selection, SurfaceError> {
    let bases: Vec<&DeclarationSet> = installed.iter().filter(|set| set.is_base()).collect();
    let mode_sets: Vec<&DeclarationSet> = installed.iter().filter(|set| !set.is_base()).collect();
    let mut diagnostics = Vec::new();

    match bases.len() {
        0 => diagnostics.push(Diagnostic::global(diagnostic_codes::MISSING_BASE_SET, &[])),
        1 => {}
        _ => {
            let ids = quoted_ids(bases.iter().copied());
            diagnostics.push(Diagnostic::global(diagnostic_codes::DUPLICATE_BASE_SET, &[&ids]));
        }
    }

    match mode_sets.as_slice() {
        [] => {
            let mode = config.mode.as_str();
            diagnostics.push(Diagnostic::global(diagnostic_codes::MISSING_MODE_SET, &[mode]));
        }
        [single] => {
            if single.mode() != Some(config.mode) {
                let realised = single.mode().map_or("base", Mode::as_str);
                diagnostics.push(Diagnostic::global(
                    diagnostic_codes::MODE_MISMATCH,
                    &[config.mode.as_str(), &single.id, realised],
                ));
            }
        }
        several => {
            let ids = quoted_ids(several.iter().copied());
            diagnostics.push(Diagnostic::global(diagnostic_codes::AMBIGUOUS_MODE, &[&ids]));
        }
    }

    if !diagnostics.is_empty() {
        return Err(SurfaceError::Configuration(diagnostics));
    }

    let (Some(base), Some(extension)) = (
        bases.first().map(|set| (*set).clone()),
        mode_sets.first().and_then(|set| ModeSet::from_set((*set).clone())),
    ) else {
        return Err(SurfaceError::Configuration(vec![Diagnostic::global(
            diagnostic_codes::MISSING_MODE_SET,
            &[config.mode.as_str()],
        )]));
    };

    debug!(mode = %config.mode, base = %base.label(), extension = %extension.set().label(), "mode selected");
    Ok(Selection { base, extension })
}
